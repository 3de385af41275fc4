//! Product catalog and stock ledger models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default low-stock threshold applied when a product does not configure one
pub const DEFAULT_ALERT_STOCK: i32 = 10;

/// A product in the catalog, carrying its current stock level
///
/// `stock` is only ever mutated by a replenishment (increment) or an
/// invoice settlement (decrement) and never goes negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub stock: i32,
    /// Low-stock threshold configured per product (>= 1)
    pub alert_stock: i32,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stock condition of a product relative to its alert threshold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    /// Stock is above the alert threshold
    Normal,
    /// Stock is at or below the alert threshold but not exhausted
    Low,
    /// Stock is exhausted
    Exhausted,
}

/// Classify a product's stock level against its threshold
pub fn classify_stock_level(stock: i32, alert_stock: i32) -> StockLevel {
    if stock <= 0 {
        StockLevel::Exhausted
    } else if stock <= alert_stock {
        StockLevel::Low
    } else {
        StockLevel::Normal
    }
}
