//! Product ledger service: source of truth for current stock levels
//!
//! Stock is only mutated through `increase_stock` (replenishment) and
//! `decrease_stock` (invoice settlement). Both run on the caller's
//! transaction so the stock delta commits together with the record that
//! justifies it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Product;

/// Product ledger service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Row for product queries
#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    description: Option<String>,
    unit_price: Decimal,
    stock: i32,
    alert_stock: i32,
    category_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
            unit_price: row.unit_price,
            stock: row.stock,
            alert_stock: row.alert_stock,
            category_id: row.category_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get a product owned by the user
    pub async fn get_product(&self, user_id: Uuid, product_id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, user_id, name, description, unit_price, stock, alert_stock,
                   category_id, created_at, updated_at
            FROM products
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(product_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// List all products owned by the user
    pub async fn list_products(&self, user_id: Uuid) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, user_id, name, description, unit_price, stock, alert_stock,
                   category_id, created_at, updated_at
            FROM products
            WHERE user_id = $1
            ORDER BY name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// List products at or below their alert threshold
    pub async fn get_low_stock_products(&self, user_id: Uuid) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, user_id, name, description, unit_price, stock, alert_stock,
                   category_id, created_at, updated_at
            FROM products
            WHERE user_id = $1 AND stock <= alert_stock
            ORDER BY stock, name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Increase a product's stock on the caller's transaction
    ///
    /// Returns the new stock level.
    pub async fn increase_stock(
        conn: &mut PgConnection,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> AppResult<i32> {
        if let Err(msg) = shared::validate_quantity(quantity) {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: msg.to_string(),
                message_fr: "La quantité doit être un entier positif".to_string(),
            });
        }

        let stock = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE products
            SET stock = stock + $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING stock
            "#,
        )
        .bind(product_id)
        .bind(user_id)
        .bind(quantity)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(stock)
    }

    /// Decrease a product's stock on the caller's transaction
    ///
    /// Fails with `InsufficientStock` when the requested quantity exceeds
    /// the current stock; the ledger never goes negative.
    pub async fn decrease_stock(
        conn: &mut PgConnection,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> AppResult<i32> {
        if let Err(msg) = shared::validate_quantity(quantity) {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: msg.to_string(),
                message_fr: "La quantité doit être un entier positif".to_string(),
            });
        }

        // Conditional update keeps the non-negative invariant without a row lock
        let updated = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE products
            SET stock = stock - $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND stock >= $3
            RETURNING stock
            "#,
        )
        .bind(product_id)
        .bind(user_id)
        .bind(quantity)
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(stock) = updated {
            return Ok(stock);
        }

        // Distinguish a missing product from insufficient stock
        let current = sqlx::query_scalar::<_, i32>(
            "SELECT stock FROM products WHERE id = $1 AND user_id = $2",
        )
        .bind(product_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Err(AppError::InsufficientStock(format!(
            "requested {} but only {} in stock",
            quantity, current
        )))
    }
}
