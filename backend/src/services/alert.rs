//! Alert derivation engine and alert store
//!
//! Derives business alerts from the product and invoice ledgers on
//! demand, and manages the read/resolved/deleted lifecycle. Generation
//! is idempotent: at most one unresolved alert exists per
//! `(user, type, entity)`, enforced by a partial unique index so that
//! concurrent runs degrade to no-ops.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use shared::models::{
    days_past_due, days_until_due, overdue_severity, stock_alert_condition, AlertEntityType,
    AlertMetadata, AlertSeverity, AlertType, BusinessAlert,
};

/// Alert derivation and persistence service
#[derive(Clone)]
pub struct AlertService {
    db: PgPool,
    retention_days: i64,
    payment_due_window_days: i64,
}

/// Filters for listing alerts
#[derive(Debug, Default, Deserialize)]
pub struct ListAlertsFilter {
    pub unread_only: Option<bool>,
    pub alert_type: Option<String>,
    pub severity: Option<String>,
}

/// Row for alert queries
#[derive(Debug, FromRow)]
struct AlertRow {
    id: Uuid,
    user_id: Uuid,
    alert_type: String,
    severity: String,
    title: String,
    message: String,
    entity_type: String,
    entity_id: Uuid,
    metadata: serde_json::Value,
    is_read: bool,
    is_resolved: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AlertRow {
    fn into_alert(self) -> AppResult<BusinessAlert> {
        let alert_type = AlertType::from_str(&self.alert_type)
            .map_err(|_| AppError::Internal(format!("unknown alert type: {}", self.alert_type)))?;
        let severity = AlertSeverity::from_str(&self.severity)
            .map_err(|_| AppError::Internal(format!("unknown severity: {}", self.severity)))?;
        let entity_type = match self.entity_type.as_str() {
            "product" => AlertEntityType::Product,
            "invoice" => AlertEntityType::Invoice,
            other => {
                return Err(AppError::Internal(format!("unknown entity type: {}", other)));
            }
        };
        let metadata: AlertMetadata = serde_json::from_value(self.metadata)
            .map_err(|e| AppError::Internal(format!("malformed alert metadata: {}", e)))?;

        Ok(BusinessAlert {
            id: self.id,
            user_id: self.user_id,
            alert_type,
            severity,
            title: self.title,
            message: self.message,
            entity_type,
            entity_id: self.entity_id,
            metadata,
            is_read: self.is_read,
            is_resolved: self.is_resolved,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row for the stock generation pass
#[derive(Debug, FromRow)]
struct StockScanRow {
    id: Uuid,
    name: String,
    stock: i32,
    alert_stock: i32,
}

/// Row for the invoice generation passes
#[derive(Debug, FromRow)]
struct InvoiceScanRow {
    id: Uuid,
    number: String,
    client_name: String,
    due_date: NaiveDate,
}

impl AlertService {
    /// Create a new AlertService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            retention_days: config.alerts.retention_days,
            payment_due_window_days: config.alerts.payment_due_window_days,
        }
    }

    // ========================================================================
    // Derivation passes
    // ========================================================================

    /// Scan the product ledger and derive stock alerts
    ///
    /// Returns the number of alerts created; products that already carry
    /// an unresolved alert of the same type are skipped.
    pub async fn generate_stock_alerts(&self, user_id: Uuid) -> AppResult<i64> {
        let products = sqlx::query_as::<_, StockScanRow>(
            "SELECT id, name, stock, alert_stock FROM products WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        let mut created = 0;
        for product in products {
            let Some((alert_type, severity)) =
                stock_alert_condition(product.stock, product.alert_stock)
            else {
                continue;
            };

            let (title, message) = stock_alert_content(&product.name, product.stock, alert_type);
            let metadata = AlertMetadata::Stock {
                product_name: product.name.clone(),
                current_stock: product.stock,
            };

            created += self
                .insert_alert(
                    user_id,
                    alert_type,
                    severity,
                    &title,
                    &message,
                    AlertEntityType::Product,
                    product.id,
                    &metadata,
                )
                .await?;
        }

        Ok(created)
    }

    /// Scan unpaid invoices past their due date and derive overdue alerts
    pub async fn generate_overdue_alerts(&self, user_id: Uuid) -> AppResult<i64> {
        let today = Utc::now().date_naive();

        let invoices = sqlx::query_as::<_, InvoiceScanRow>(
            r#"
            SELECT i.id, i.number, c.name AS client_name, i.due_date
            FROM invoices i
            JOIN clients c ON c.id = i.client_id
            WHERE i.user_id = $1 AND i.status <> 'payee' AND i.due_date < $2
            "#,
        )
        .bind(user_id)
        .bind(today)
        .fetch_all(&self.db)
        .await?;

        let mut created = 0;
        for invoice in invoices {
            let days = days_past_due(invoice.due_date, today);
            let severity = overdue_severity(days);
            let (title, message) = overdue_alert_content(&invoice.number, &invoice.client_name, days);
            let metadata = AlertMetadata::Overdue {
                invoice_number: invoice.number.clone(),
                client_name: invoice.client_name.clone(),
                days_past_due: days,
            };

            created += self
                .insert_alert(
                    user_id,
                    AlertType::OverdueInvoice,
                    severity,
                    &title,
                    &message,
                    AlertEntityType::Invoice,
                    invoice.id,
                    &metadata,
                )
                .await?;
        }

        Ok(created)
    }

    /// Scan unpaid invoices approaching their due date
    pub async fn generate_payment_due_alerts(&self, user_id: Uuid) -> AppResult<i64> {
        let today = Utc::now().date_naive();
        let horizon = today + chrono::Duration::days(self.payment_due_window_days);

        let invoices = sqlx::query_as::<_, InvoiceScanRow>(
            r#"
            SELECT i.id, i.number, c.name AS client_name, i.due_date
            FROM invoices i
            JOIN clients c ON c.id = i.client_id
            WHERE i.user_id = $1 AND i.status <> 'payee'
              AND i.due_date >= $2 AND i.due_date <= $3
            "#,
        )
        .bind(user_id)
        .bind(today)
        .bind(horizon)
        .fetch_all(&self.db)
        .await?;

        let mut created = 0;
        for invoice in invoices {
            let days = days_until_due(invoice.due_date, today);
            let (title, message) =
                payment_due_alert_content(&invoice.number, &invoice.client_name, days);
            let metadata = AlertMetadata::PaymentDue {
                invoice_number: invoice.number.clone(),
                client_name: invoice.client_name.clone(),
                days_until_due: days,
            };

            created += self
                .insert_alert(
                    user_id,
                    AlertType::PaymentDue,
                    AlertSeverity::Low,
                    &title,
                    &message,
                    AlertEntityType::Invoice,
                    invoice.id,
                    &metadata,
                )
                .await?;
        }

        Ok(created)
    }

    /// Insert an alert unless an unresolved one already exists for the
    /// same entity and type; returns 1 when a row was created
    #[allow(clippy::too_many_arguments)]
    async fn insert_alert(
        &self,
        user_id: Uuid,
        alert_type: AlertType,
        severity: AlertSeverity,
        title: &str,
        message: &str,
        entity_type: AlertEntityType,
        entity_id: Uuid,
        metadata: &AlertMetadata,
    ) -> AppResult<i64> {
        let metadata_json = serde_json::to_value(metadata)
            .map_err(|e| AppError::Internal(format!("alert metadata serialization: {}", e)))?;

        let result = sqlx::query(
            r#"
            INSERT INTO business_alerts (
                user_id, alert_type, severity, title, message,
                entity_type, entity_id, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id, alert_type, entity_type, entity_id)
                WHERE NOT is_resolved
                DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(alert_type.as_str())
        .bind(severity.as_str())
        .bind(title)
        .bind(message)
        .bind(entity_type.as_str())
        .bind(entity_id)
        .bind(metadata_json)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() as i64)
    }

    // ========================================================================
    // Alert store
    // ========================================================================

    /// List alerts for a user, newest first
    pub async fn list_alerts(
        &self,
        user_id: Uuid,
        filter: ListAlertsFilter,
    ) -> AppResult<Vec<BusinessAlert>> {
        // Validate filters up front so typos surface as 400s, not empty lists
        let alert_type = match &filter.alert_type {
            Some(raw) => Some(AlertType::from_str(raw).map_err(|_| {
                AppError::Validation {
                    field: "alert_type".to_string(),
                    message: format!("unknown alert type: {}", raw),
                    message_fr: format!("Type d'alerte inconnu : {}", raw),
                }
            })?),
            None => None,
        };
        let severity = match &filter.severity {
            Some(raw) => Some(AlertSeverity::from_str(raw).map_err(|_| {
                AppError::Validation {
                    field: "severity".to_string(),
                    message: format!("unknown severity: {}", raw),
                    message_fr: format!("Sévérité inconnue : {}", raw),
                }
            })?),
            None => None,
        };

        let rows = sqlx::query_as::<_, AlertRow>(
            r#"
            SELECT id, user_id, alert_type, severity, title, message, entity_type,
                   entity_id, metadata, is_read, is_resolved, created_at, updated_at
            FROM business_alerts
            WHERE user_id = $1
              AND ($2::bool IS NOT TRUE OR is_read = false)
              AND ($3::text IS NULL OR alert_type = $3)
              AND ($4::text IS NULL OR severity = $4)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(filter.unread_only)
        .bind(alert_type.map(|t| t.as_str()))
        .bind(severity.map(|s| s.as_str()))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(AlertRow::into_alert).collect()
    }

    /// Get a single alert owned by the user
    pub async fn get_alert(&self, user_id: Uuid, alert_id: Uuid) -> AppResult<BusinessAlert> {
        let row = sqlx::query_as::<_, AlertRow>(
            r#"
            SELECT id, user_id, alert_type, severity, title, message, entity_type,
                   entity_id, metadata, is_read, is_resolved, created_at, updated_at
            FROM business_alerts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(alert_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Alert".to_string()))?;

        row.into_alert()
    }

    /// Count unread alerts for a user
    pub async fn unread_count(&self, user_id: Uuid) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM business_alerts WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    /// Mark a single alert as read
    pub async fn mark_as_read(&self, user_id: Uuid, alert_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE business_alerts SET is_read = true, updated_at = NOW() WHERE id = $1 AND user_id = $2",
        )
        .bind(alert_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Alert".to_string()));
        }

        Ok(())
    }

    /// Resolve an alert; resolving implies it has been read
    pub async fn resolve(&self, user_id: Uuid, alert_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE business_alerts
            SET is_resolved = true, is_read = true, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(alert_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Alert".to_string()));
        }

        Ok(())
    }

    /// Delete an alert
    pub async fn delete_alert(&self, user_id: Uuid, alert_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM business_alerts WHERE id = $1 AND user_id = $2")
            .bind(alert_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Alert".to_string()));
        }

        Ok(())
    }

    /// Mark every unread alert of the user as read, returning the count
    pub async fn mark_all_as_read(&self, user_id: Uuid) -> AppResult<i64> {
        let result = sqlx::query(
            "UPDATE business_alerts SET is_read = true, updated_at = NOW() WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() as i64)
    }

    /// Delete resolved alerts older than the retention window
    pub async fn cleanup(&self, user_id: Uuid) -> AppResult<i64> {
        let result = sqlx::query(
            r#"
            DELETE FROM business_alerts
            WHERE user_id = $1
              AND is_resolved = true
              AND updated_at < NOW() - make_interval(days => $2::int)
            "#,
        )
        .bind(user_id)
        .bind(self.retention_days as i32)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() as i64)
    }
}

// ============================================================================
// Alert content
// ============================================================================

/// Title and message for a stock alert
fn stock_alert_content(product_name: &str, stock: i32, alert_type: AlertType) -> (String, String) {
    match alert_type {
        AlertType::CriticalStock => (
            "Rupture de stock".to_string(),
            format!("Le produit « {} » est en rupture de stock", product_name),
        ),
        _ => (
            "Stock faible".to_string(),
            format!(
                "Le produit « {} » est presque épuisé ({} restants)",
                product_name, stock
            ),
        ),
    }
}

/// Title and message for an overdue invoice alert
fn overdue_alert_content(number: &str, client_name: &str, days: i64) -> (String, String) {
    (
        "Facture en retard".to_string(),
        format!(
            "La facture {} de {} est en retard de {} jour(s)",
            number, client_name, days
        ),
    )
}

/// Title and message for an upcoming payment alert
fn payment_due_alert_content(number: &str, client_name: &str, days: i64) -> (String, String) {
    (
        "Échéance proche".to_string(),
        format!(
            "La facture {} de {} arrive à échéance dans {} jour(s)",
            number, client_name, days
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_alert_content_critical() {
        let (title, message) = stock_alert_content("Clavier", 0, AlertType::CriticalStock);
        assert_eq!(title, "Rupture de stock");
        assert!(message.contains("Clavier"));
    }

    #[test]
    fn test_stock_alert_content_low() {
        let (title, message) = stock_alert_content("Souris", 3, AlertType::LowStock);
        assert_eq!(title, "Stock faible");
        assert!(message.contains("3 restants"));
    }

    #[test]
    fn test_overdue_alert_content() {
        let (_, message) = overdue_alert_content("FAC-2025-001", "Dupont SARL", 5);
        assert!(message.contains("FAC-2025-001"));
        assert!(message.contains("5 jour(s)"));
    }
}
