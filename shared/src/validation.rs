//! Validation utilities for the Gestion Commerciale platform
//!
//! Includes France-specific validations (SIRET, TVA number, phone) for
//! compliance with local business registration rules.

use rust_decimal::Decimal;

// ============================================================================
// Stock & Replenishment Validations
// ============================================================================

/// Validate a stock movement quantity (replenishment or settlement)
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be a positive integer");
    }
    Ok(())
}

/// Validate a product's low-stock threshold
pub fn validate_alert_stock(alert_stock: i32) -> Result<(), &'static str> {
    if alert_stock < 1 {
        return Err("Alert threshold must be at least 1");
    }
    Ok(())
}

/// Validate an optional unit cost on a replenishment
pub fn validate_unit_cost(cost_per_unit: Option<Decimal>) -> Result<(), &'static str> {
    if let Some(cost) = cost_per_unit {
        if cost < Decimal::ZERO {
            return Err("Unit cost cannot be negative");
        }
    }
    Ok(())
}

// ============================================================================
// Invoice Validations
// ============================================================================

/// Validate that invoice totals are coherent: TTC = HT + TVA, all non-negative
pub fn validate_invoice_totals(
    total_ht: Decimal,
    total_tva: Decimal,
    total_ttc: Decimal,
) -> Result<(), &'static str> {
    if total_ht < Decimal::ZERO || total_tva < Decimal::ZERO {
        return Err("Invoice amounts cannot be negative");
    }
    if total_ht + total_tva != total_ttc {
        return Err("TTC total must equal HT plus TVA");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate an email address (basic structural check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() {
        return Err("Invalid email address");
    }
    let domain = parts[1];
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("Invalid email address");
    }
    Ok(())
}

/// Validate a password meets the minimum length requirement
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

// ============================================================================
// France-Specific Validations
// ============================================================================

/// Validate a French SIRET number (14 digits, Luhn checksum)
pub fn validate_siret(siret: &str) -> Result<(), &'static str> {
    let digits: Vec<u32> = siret.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 14 || siret.chars().any(|c| !c.is_ascii_digit()) {
        return Err("SIRET must be exactly 14 digits");
    }

    // Luhn: double every second digit from the right
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    if sum % 10 != 0 {
        return Err("Invalid SIRET checksum");
    }
    Ok(())
}

/// Validate a French intra-community TVA number (FR + 2 key chars + 9-digit SIREN)
pub fn validate_french_tva_number(tva: &str) -> Result<(), &'static str> {
    if !tva.is_ascii() || tva.len() != 13 || !tva.starts_with("FR") {
        return Err("TVA number must be FR followed by 11 characters");
    }
    let key = &tva[2..4];
    let siren = &tva[4..];
    if !key.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Invalid TVA key");
    }
    if siren.len() != 9 || !siren.chars().all(|c| c.is_ascii_digit()) {
        return Err("TVA number must end with a 9-digit SIREN");
    }
    Ok(())
}

/// Validate a French phone number (0X XXXXXXXX or +33X XXXXXXXX)
pub fn validate_french_phone(phone: &str) -> Result<(), &'static str> {
    let cleaned: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    let national = if let Some(rest) = cleaned.strip_prefix("+33") {
        format!("0{}", rest)
    } else if let Some(rest) = cleaned.strip_prefix("33") {
        format!("0{}", rest)
    } else {
        cleaned
    };

    if national.len() != 10 || !national.starts_with('0') {
        return Err("Invalid French phone number");
    }
    if !national.chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid French phone number");
    }
    Ok(())
}
