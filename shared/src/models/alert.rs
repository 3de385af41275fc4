//! Business alert models and derivation rules
//!
//! Alerts are derived on demand from the product ledger and the invoice
//! ledger. The branching rules live here as pure functions so the backend
//! service and the test suite share one implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::{classify_stock_level, StockLevel};

/// Kinds of business alerts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    LowStock,
    CriticalStock,
    OverdueInvoice,
    PaymentDue,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::LowStock => "low_stock",
            AlertType::CriticalStock => "critical_stock",
            AlertType::OverdueInvoice => "overdue_invoice",
            AlertType::PaymentDue => "payment_due",
        }
    }
}

impl std::str::FromStr for AlertType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low_stock" => Ok(AlertType::LowStock),
            "critical_stock" => Ok(AlertType::CriticalStock),
            "overdue_invoice" => Ok(AlertType::OverdueInvoice),
            "payment_due" => Ok(AlertType::PaymentDue),
            _ => Err("unknown alert type"),
        }
    }
}

/// Ordinal urgency classification, used for sorting and display
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
            AlertSeverity::Critical => "critical",
        }
    }
}

impl std::str::FromStr for AlertSeverity {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(AlertSeverity::Low),
            "medium" => Ok(AlertSeverity::Medium),
            "high" => Ok(AlertSeverity::High),
            "critical" => Ok(AlertSeverity::Critical),
            _ => Err("unknown severity"),
        }
    }
}

/// Entity kinds an alert can reference
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertEntityType {
    Product,
    Invoice,
}

impl AlertEntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertEntityType::Product => "product",
            AlertEntityType::Invoice => "invoice",
        }
    }
}

/// Typed alert metadata, one variant per trigger
///
/// Serialized to JSONB; the variants carry disjoint field sets so the
/// untagged representation round-trips unambiguously.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AlertMetadata {
    Stock {
        product_name: String,
        current_stock: i32,
    },
    Overdue {
        invoice_number: String,
        client_name: String,
        days_past_due: i64,
    },
    PaymentDue {
        invoice_number: String,
        client_name: String,
        days_until_due: i64,
    },
}

/// A derived business alert owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessAlert {
    pub id: Uuid,
    pub user_id: Uuid,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub entity_type: AlertEntityType,
    pub entity_id: Uuid,
    pub metadata: AlertMetadata,
    pub is_read: bool,
    pub is_resolved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Alert condition derived from a product's stock level, if any
///
/// Exhausted stock is the stricter case and maps to `critical`;
/// stock at or below the configured threshold maps to `medium`.
pub fn stock_alert_condition(stock: i32, alert_stock: i32) -> Option<(AlertType, AlertSeverity)> {
    match classify_stock_level(stock, alert_stock) {
        StockLevel::Exhausted => Some((AlertType::CriticalStock, AlertSeverity::Critical)),
        StockLevel::Low => Some((AlertType::LowStock, AlertSeverity::Medium)),
        StockLevel::Normal => None,
    }
}

/// Severity banding for overdue invoices, monotone in days past due
pub fn overdue_severity(days_past_due: i64) -> AlertSeverity {
    match days_past_due {
        d if d > 30 => AlertSeverity::Critical,
        d if d > 7 => AlertSeverity::High,
        _ => AlertSeverity::Medium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(AlertSeverity::Low < AlertSeverity::Medium);
        assert!(AlertSeverity::Medium < AlertSeverity::High);
        assert!(AlertSeverity::High < AlertSeverity::Critical);
    }

    #[test]
    fn test_stock_alert_condition() {
        assert_eq!(
            stock_alert_condition(0, 10),
            Some((AlertType::CriticalStock, AlertSeverity::Critical))
        );
        assert_eq!(
            stock_alert_condition(3, 10),
            Some((AlertType::LowStock, AlertSeverity::Medium))
        );
        assert_eq!(stock_alert_condition(11, 10), None);
    }

    #[test]
    fn test_overdue_severity_banding() {
        assert_eq!(overdue_severity(1), AlertSeverity::Medium);
        assert_eq!(overdue_severity(7), AlertSeverity::Medium);
        assert_eq!(overdue_severity(8), AlertSeverity::High);
        assert_eq!(overdue_severity(30), AlertSeverity::High);
        assert_eq!(overdue_severity(31), AlertSeverity::Critical);
    }

    #[test]
    fn test_alert_type_round_trip() {
        for t in [
            AlertType::LowStock,
            AlertType::CriticalStock,
            AlertType::OverdueInvoice,
            AlertType::PaymentDue,
        ] {
            assert_eq!(t.as_str().parse::<AlertType>().unwrap(), t);
        }
    }
}
