//! Stock replenishment models
//!
//! Replenishments are the immutable audit trail of stock increases:
//! once recorded they are never updated or deleted by normal flow.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded stock-increase event with cost and supplier metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockReplenishment {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub cost_per_unit: Option<Decimal>,
    /// `quantity * cost_per_unit`, unset when no unit cost was given
    pub total_cost: Option<Decimal>,
    pub supplier: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Compute the total cost of a replenishment
pub fn compute_total_cost(quantity: i32, cost_per_unit: Option<Decimal>) -> Option<Decimal> {
    cost_per_unit.map(|cost| cost * Decimal::from(quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_cost_with_unit_cost() {
        let total = compute_total_cost(50, Some(Decimal::from(200)));
        assert_eq!(total, Some(Decimal::from(10_000)));
    }

    #[test]
    fn test_total_cost_without_unit_cost() {
        assert_eq!(compute_total_cost(50, None), None);
    }
}
