//! Invoice service: read surface and settlement
//!
//! Settlement (`mark_paid`) is the only writer: it flips the status to
//! `payee` and decrements product stock for every invoiced line inside a
//! single transaction. An insufficient stock on any line aborts the
//! whole settlement.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::product::ProductService;
use shared::models::{Invoice, InvoiceItem, InvoiceStatus};

/// Invoice service
#[derive(Clone)]
pub struct InvoiceService {
    db: PgPool,
}

/// Row for invoice queries
#[derive(Debug, FromRow)]
struct InvoiceRow {
    id: Uuid,
    user_id: Uuid,
    client_id: Uuid,
    number: String,
    status: String,
    total_ht: Decimal,
    total_tva: Decimal,
    total_ttc: Decimal,
    due_date: NaiveDate,
    paid_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl InvoiceRow {
    fn into_invoice(self) -> AppResult<Invoice> {
        let status = InvoiceStatus::from_str(&self.status)
            .map_err(|_| AppError::Internal(format!("unknown invoice status: {}", self.status)))?;

        Ok(Invoice {
            id: self.id,
            user_id: self.user_id,
            client_id: self.client_id,
            number: self.number,
            status,
            total_ht: self.total_ht,
            total_tva: self.total_tva,
            total_ttc: self.total_ttc,
            due_date: self.due_date,
            paid_at: self.paid_at,
            created_at: self.created_at,
        })
    }
}

/// Row for invoice item queries
#[derive(Debug, FromRow)]
struct InvoiceItemRow {
    id: Uuid,
    invoice_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    unit_price: Decimal,
}

impl From<InvoiceItemRow> for InvoiceItem {
    fn from(row: InvoiceItemRow) -> Self {
        InvoiceItem {
            id: row.id,
            invoice_id: row.invoice_id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

/// An invoice together with its line items
#[derive(Debug, Serialize)]
pub struct InvoiceWithItems {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
}

impl InvoiceService {
    /// Create a new InvoiceService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all invoices owned by the user, newest first
    pub async fn list_invoices(&self, user_id: Uuid) -> AppResult<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, user_id, client_id, number, status, total_ht, total_tva,
                   total_ttc, due_date, paid_at, created_at
            FROM invoices
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(InvoiceRow::into_invoice).collect()
    }

    /// Get an invoice with its line items
    pub async fn get_invoice(&self, user_id: Uuid, invoice_id: Uuid) -> AppResult<InvoiceWithItems> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, user_id, client_id, number, status, total_ht, total_tva,
                   total_ttc, due_date, paid_at, created_at
            FROM invoices
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(invoice_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice".to_string()))?;

        let items = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            SELECT id, invoice_id, product_id, quantity, unit_price
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY id
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.db)
        .await?;

        Ok(InvoiceWithItems {
            invoice: row.into_invoice()?,
            items: items.into_iter().map(InvoiceItem::from).collect(),
        })
    }

    /// Mark an invoice as paid and settle stock for its line items
    pub async fn mark_paid(&self, user_id: Uuid, invoice_id: Uuid) -> AppResult<Invoice> {
        let mut tx = self.db.begin().await?;

        // Lock the invoice row for the duration of the settlement
        let current = sqlx::query_scalar::<_, String>(
            "SELECT status FROM invoices WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(invoice_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Invoice".to_string()))?;

        let status = InvoiceStatus::from_str(&current)
            .map_err(|_| AppError::Internal(format!("unknown invoice status: {}", current)))?;

        if !status.can_be_paid() {
            return Err(AppError::InvalidStateTransition(format!(
                "invoice is already {}",
                status
            )));
        }

        let items = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            SELECT id, invoice_id, product_id, quantity, unit_price
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY id
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&mut *tx)
        .await?;

        // Any insufficient line aborts the whole settlement
        for item in &items {
            ProductService::decrease_stock(&mut *tx, user_id, item.product_id, item.quantity)
                .await?;
        }

        let row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            UPDATE invoices
            SET status = 'payee', paid_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, client_id, number, status, total_ht, total_tva,
                      total_ttc, due_date, paid_at, created_at
            "#,
        )
        .bind(invoice_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        row.into_invoice()
    }
}
