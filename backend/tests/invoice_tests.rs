//! Invoice and settlement tests
//!
//! Tests for invoice status transitions, due date arithmetic and the
//! all-or-nothing stock settlement of paid invoices.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{days_past_due, days_until_due, is_overdue, InvoiceStatus};
use shared::validate_invoice_totals;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Test which statuses accept a payment
    #[test]
    fn test_payable_statuses() {
        assert!(InvoiceStatus::EnAttente.can_be_paid());
        assert!(InvoiceStatus::PartiellementReglee.can_be_paid());
        assert!(!InvoiceStatus::Payee.can_be_paid());
    }

    /// Test status round-trips through its wire form
    #[test]
    fn test_status_string_round_trip() {
        for status in [
            InvoiceStatus::EnAttente,
            InvoiceStatus::Payee,
            InvoiceStatus::PartiellementReglee,
        ] {
            let parsed = InvoiceStatus::from_str(status.as_str()).unwrap();
            assert_eq!(parsed, status);
        }

        assert!(InvoiceStatus::from_str("annulee").is_err());
    }

    /// Test overdue day counting
    #[test]
    fn test_days_past_due() {
        assert_eq!(days_past_due(date(2025, 3, 10), date(2025, 3, 15)), 5);
        assert_eq!(days_past_due(date(2025, 3, 15), date(2025, 3, 15)), 0);
    }

    /// Test days remaining before the due date
    #[test]
    fn test_days_until_due() {
        assert_eq!(days_until_due(date(2025, 3, 20), date(2025, 3, 15)), 5);
        assert_eq!(days_until_due(date(2025, 3, 15), date(2025, 3, 15)), 0);
    }

    /// Test paid invoices are never overdue
    #[test]
    fn test_paid_never_overdue() {
        assert!(!is_overdue(InvoiceStatus::Payee, date(2024, 1, 1), date(2025, 1, 1)));
        assert!(is_overdue(InvoiceStatus::EnAttente, date(2024, 1, 1), date(2025, 1, 1)));
    }

    /// Test TTC consistency check
    #[test]
    fn test_invoice_totals_consistency() {
        assert!(validate_invoice_totals(dec("100.00"), dec("20.00"), dec("120.00")).is_ok());
        assert!(validate_invoice_totals(dec("100.00"), dec("20.00"), dec("125.00")).is_err());
    }

    /// Test settlement decrements every line or none
    #[test]
    fn test_settlement_all_or_nothing() {
        // Ledger: product -> stock
        let mut stocks = vec![("a", 10), ("b", 2)];
        // Invoice lines: (product, quantity); line "b" exceeds its stock
        let lines = [("a", 4), ("b", 5)];

        let feasible = lines.iter().all(|(product, quantity)| {
            stocks
                .iter()
                .find(|(name, _)| name == product)
                .map(|(_, stock)| quantity <= stock)
                .unwrap_or(false)
        });

        if feasible {
            for (product, quantity) in lines {
                let entry = stocks.iter_mut().find(|(name, _)| *name == product).unwrap();
                entry.1 -= quantity;
            }
        }

        // The infeasible line aborted the settlement; nothing moved
        assert!(!feasible);
        assert_eq!(stocks, vec![("a", 10), ("b", 2)]);
    }

    /// Test a feasible settlement applies every line
    #[test]
    fn test_settlement_applies_all_lines() {
        let mut stocks = vec![("a", 10), ("b", 7)];
        let lines = [("a", 4), ("b", 5)];

        let feasible = lines.iter().all(|(product, quantity)| {
            stocks
                .iter()
                .find(|(name, _)| name == product)
                .map(|(_, stock)| quantity <= stock)
                .unwrap_or(false)
        });
        assert!(feasible);

        for (product, quantity) in lines {
            let entry = stocks.iter_mut().find(|(name, _)| *name == product).unwrap();
            entry.1 -= quantity;
        }

        assert_eq!(stocks, vec![("a", 6), ("b", 2)]);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// days_past_due and days_until_due are symmetric
    #[test]
    fn prop_due_day_symmetry(offset in -365i64..365) {
        let due = date(2025, 6, 15);
        let today = due + chrono::Duration::days(offset);

        prop_assert_eq!(days_past_due(due, today), offset);
        prop_assert_eq!(days_until_due(due, today), -offset);
    }

    /// An invoice is overdue exactly when unpaid and past its date
    #[test]
    fn prop_overdue_definition(offset in -100i64..100, paid in any::<bool>()) {
        let due = date(2025, 6, 15);
        let today = due + chrono::Duration::days(offset);
        let status = if paid { InvoiceStatus::Payee } else { InvoiceStatus::EnAttente };

        prop_assert_eq!(is_overdue(status, due, today), !paid && offset > 0);
    }

    /// Totals validation accepts exactly HT + TVA = TTC
    #[test]
    fn prop_totals_validation(ht_cents in 0i64..100_000_000, tva_cents in 0i64..20_000_000) {
        let ht = Decimal::new(ht_cents, 2);
        let tva = Decimal::new(tva_cents, 2);

        prop_assert!(validate_invoice_totals(ht, tva, ht + tva).is_ok());
        prop_assert!(validate_invoice_totals(ht, tva, ht + tva + Decimal::new(1, 2)).is_err());
    }
}
