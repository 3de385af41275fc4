//! Input validation tests
//!
//! Property-based and unit tests for account and business input
//! validation: email, password, SIRET, TVA numbers and phone numbers.

use proptest::prelude::*;

use shared::{
    validate_alert_stock, validate_email, validate_french_phone, validate_french_tva_number,
    validate_password, validate_quantity, validate_siret,
};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate valid email addresses
fn email_strategy() -> impl Strategy<Value = String> {
    "[a-z]{5,10}@[a-z]{3,8}\\.(com|org|net|fr)"
}

/// Generate valid passwords (8+ chars)
fn password_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9!@#$%]{8,20}"
}

/// Generate valid French mobile and landline numbers
fn french_phone_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // National format
        "0[1-9][0-9]{8}",
        // International prefix
        "\\+33[1-9][0-9]{8}",
    ]
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Test quantity validation rejects non-positive values
    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10_000).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-5).is_err());
    }

    /// Test alert threshold validation rejects non-positive values
    #[test]
    fn test_validate_alert_stock() {
        assert!(validate_alert_stock(1).is_ok());
        assert!(validate_alert_stock(10).is_ok());
        assert!(validate_alert_stock(0).is_err());
        assert!(validate_alert_stock(-1).is_err());
    }

    /// Test email structural validation
    #[test]
    fn test_validate_email() {
        assert!(validate_email("jean.dupont@example.fr").is_ok());
        assert!(validate_email("no-at-sign.fr").is_err());
        assert!(validate_email("@example.fr").is_err());
        assert!(validate_email("jean@nodot").is_err());
    }

    /// Test SIRET checksum validation
    #[test]
    fn test_validate_siret() {
        // Valid Luhn checksum
        assert!(validate_siret("35600000000048").is_ok());

        // Wrong checksum
        assert!(validate_siret("35600000000049").is_err());

        // Wrong length
        assert!(validate_siret("3560000000004").is_err());
        assert!(validate_siret("356000000000480").is_err());

        // Non-digits
        assert!(validate_siret("3560000000004A").is_err());
    }

    /// Test French TVA number validation
    #[test]
    fn test_validate_french_tva_number() {
        assert!(validate_french_tva_number("FR40303265045").is_ok());
        assert!(validate_french_tva_number("DE40303265045").is_err());
        assert!(validate_french_tva_number("FR403032650").is_err());
    }

    /// Test French phone normalization
    #[test]
    fn test_validate_french_phone() {
        assert!(validate_french_phone("0612345678").is_ok());
        assert!(validate_french_phone("+33612345678").is_ok());
        assert!(validate_french_phone("33612345678").is_ok());

        assert!(validate_french_phone("061234567").is_err());
        assert!(validate_french_phone("1234567890").is_err());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Structurally valid emails pass validation
    #[test]
    fn prop_valid_emails_pass(email in email_strategy()) {
        prop_assert!(validate_email(&email).is_ok());
    }

    /// Passwords of eight characters or more pass validation
    #[test]
    fn prop_valid_passwords_pass(password in password_strategy()) {
        prop_assert!(validate_password(&password).is_ok());
    }

    /// Short passwords are rejected
    #[test]
    fn prop_short_passwords_fail(password in "[a-zA-Z0-9]{0,7}") {
        prop_assert!(validate_password(&password).is_err());
    }

    /// Well-formed French phone numbers pass validation
    #[test]
    fn prop_valid_french_phones_pass(phone in french_phone_strategy()) {
        prop_assert!(validate_french_phone(&phone).is_ok());
    }

    /// Positive quantities always pass, non-positive never do
    #[test]
    fn prop_quantity_sign(quantity in -1_000i32..1_000) {
        prop_assert_eq!(validate_quantity(quantity).is_ok(), quantity > 0);
    }

    /// SIRET validation rejects anything that is not 14 digits
    #[test]
    fn prop_siret_wrong_length_fails(digits in "[0-9]{1,13}") {
        prop_assert!(validate_siret(&digits).is_err());
    }
}
