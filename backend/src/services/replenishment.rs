//! Replenishment recorder service
//!
//! Records stock-increase events with cost and supplier metadata. The
//! audit row and the stock increment are written in a single transaction:
//! both succeed or both fail.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::product::ProductService;
use shared::models::{compute_total_cost, StockReplenishment};

/// Replenishment recorder service
#[derive(Clone)]
pub struct ReplenishmentService {
    db: PgPool,
}

/// Input for recording a replenishment
#[derive(Debug, Deserialize, Validate)]
pub struct RecordReplenishmentInput {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be a positive integer"))]
    pub quantity: i32,
    pub cost_per_unit: Option<Decimal>,
    pub supplier: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

/// Row for replenishment queries
#[derive(Debug, FromRow)]
struct ReplenishmentRow {
    id: Uuid,
    product_id: Uuid,
    user_id: Uuid,
    quantity: i32,
    cost_per_unit: Option<Decimal>,
    total_cost: Option<Decimal>,
    supplier: Option<String>,
    reference: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ReplenishmentRow> for StockReplenishment {
    fn from(row: ReplenishmentRow) -> Self {
        StockReplenishment {
            id: row.id,
            product_id: row.product_id,
            user_id: row.user_id,
            quantity: row.quantity,
            cost_per_unit: row.cost_per_unit,
            total_cost: row.total_cost,
            supplier: row.supplier,
            reference: row.reference,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

impl ReplenishmentService {
    /// Create a new ReplenishmentService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a replenishment and apply it to the product ledger
    pub async fn record_replenishment(
        &self,
        user_id: Uuid,
        input: RecordReplenishmentInput,
    ) -> AppResult<StockReplenishment> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        if let Err(msg) = shared::validate_unit_cost(input.cost_per_unit) {
            return Err(AppError::Validation {
                field: "cost_per_unit".to_string(),
                message: msg.to_string(),
                message_fr: "Le coût unitaire ne peut pas être négatif".to_string(),
            });
        }

        let total_cost = compute_total_cost(input.quantity, input.cost_per_unit);

        // Audit row and stock increment commit together
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, ReplenishmentRow>(
            r#"
            INSERT INTO stock_replenishments (
                product_id, user_id, quantity, cost_per_unit, total_cost,
                supplier, reference, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, product_id, user_id, quantity, cost_per_unit, total_cost,
                      supplier, reference, notes, created_at
            "#,
        )
        .bind(input.product_id)
        .bind(user_id)
        .bind(input.quantity)
        .bind(input.cost_per_unit)
        .bind(total_cost)
        .bind(&input.supplier)
        .bind(&input.reference)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            // Unknown product surfaces as a foreign key violation on insert
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::NotFound("Product".to_string())
            }
            _ => AppError::DatabaseError(e),
        })?;

        ProductService::increase_stock(&mut *tx, user_id, input.product_id, input.quantity).await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// List all replenishments recorded by the user, newest first
    pub async fn list_replenishments(&self, user_id: Uuid) -> AppResult<Vec<StockReplenishment>> {
        let rows = sqlx::query_as::<_, ReplenishmentRow>(
            r#"
            SELECT id, product_id, user_id, quantity, cost_per_unit, total_cost,
                   supplier, reference, notes, created_at
            FROM stock_replenishments
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(StockReplenishment::from).collect())
    }

    /// Get the replenishment history of a product, newest first
    pub async fn get_replenishments_for_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Vec<StockReplenishment>> {
        // Validate product belongs to the user
        let product_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1 AND user_id = $2)",
        )
        .bind(product_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let rows = sqlx::query_as::<_, ReplenishmentRow>(
            r#"
            SELECT id, product_id, user_id, quantity, cost_per_unit, total_cost,
                   supplier, reference, notes, created_at
            FROM stock_replenishments
            WHERE product_id = $1 AND user_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(product_id)
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(StockReplenishment::from).collect())
    }
}
