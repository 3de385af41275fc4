//! Invoicing models
//!
//! Invoices carry French accounting totals: HT (before tax), TVA
//! (value-added tax) and TTC (total including tax).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Invoice payment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Awaiting payment
    EnAttente,
    /// Fully paid
    Payee,
    /// Partially settled
    PartiellementReglee,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::EnAttente => "en_attente",
            InvoiceStatus::Payee => "payee",
            InvoiceStatus::PartiellementReglee => "partiellement_reglee",
        }
    }

    /// Whether an invoice in this status can still transition to paid
    pub fn can_be_paid(&self) -> bool {
        !matches!(self, InvoiceStatus::Payee)
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en_attente" => Ok(InvoiceStatus::EnAttente),
            "payee" => Ok(InvoiceStatus::Payee),
            "partiellement_reglee" => Ok(InvoiceStatus::PartiellementReglee),
            _ => Err("unknown invoice status"),
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An invoice issued to a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub user_id: Uuid,
    pub client_id: Uuid,
    pub number: String,
    pub status: InvoiceStatus,
    pub total_ht: Decimal,
    pub total_tva: Decimal,
    pub total_ttc: Decimal,
    pub due_date: NaiveDate,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A line item on an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Whole days elapsed since the due date; zero or negative means not overdue
pub fn days_past_due(due_date: NaiveDate, today: NaiveDate) -> i64 {
    (today - due_date).num_days()
}

/// Whole days remaining until the due date
pub fn days_until_due(due_date: NaiveDate, today: NaiveDate) -> i64 {
    (due_date - today).num_days()
}

/// Whether an invoice is overdue as of `today`
pub fn is_overdue(status: InvoiceStatus, due_date: NaiveDate, today: NaiveDate) -> bool {
    status.can_be_paid() && due_date < today
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_past_due() {
        assert_eq!(days_past_due(date(2025, 1, 10), date(2025, 1, 15)), 5);
        assert_eq!(days_past_due(date(2025, 1, 15), date(2025, 1, 15)), 0);
        assert_eq!(days_past_due(date(2025, 1, 20), date(2025, 1, 15)), -5);
    }

    #[test]
    fn test_is_overdue() {
        assert!(is_overdue(InvoiceStatus::EnAttente, date(2025, 1, 10), date(2025, 1, 15)));
        assert!(is_overdue(
            InvoiceStatus::PartiellementReglee,
            date(2025, 1, 10),
            date(2025, 1, 15)
        ));
        // Paid invoices are never overdue
        assert!(!is_overdue(InvoiceStatus::Payee, date(2025, 1, 10), date(2025, 1, 15)));
        // Due today is not overdue
        assert!(!is_overdue(InvoiceStatus::EnAttente, date(2025, 1, 15), date(2025, 1, 15)));
    }

    #[test]
    fn test_status_transitions() {
        assert!(InvoiceStatus::EnAttente.can_be_paid());
        assert!(InvoiceStatus::PartiellementReglee.can_be_paid());
        assert!(!InvoiceStatus::Payee.can_be_paid());
    }
}
