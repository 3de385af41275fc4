//! HTTP handlers for alert endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::alert::{AlertService, ListAlertsFilter};
use crate::AppState;
use shared::models::BusinessAlert;

// ============================================================================
// Alert store
// ============================================================================

/// List alerts, optionally filtered by read state, type and severity
pub async fn list_alerts(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<ListAlertsFilter>,
) -> AppResult<Json<Vec<BusinessAlert>>> {
    let service = AlertService::new(state.db, &state.config);
    let alerts = service.list_alerts(current_user.0.user_id, filter).await?;
    Ok(Json(alerts))
}

/// Get a single alert
pub async fn get_alert(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(alert_id): Path<Uuid>,
) -> AppResult<Json<BusinessAlert>> {
    let service = AlertService::new(state.db, &state.config);
    let alert = service.get_alert(current_user.0.user_id, alert_id).await?;
    Ok(Json(alert))
}

/// Unread count response
#[derive(Debug, serde::Serialize)]
pub struct UnreadCountResponse {
    pub count: i64,
}

/// Get the number of unread alerts
pub async fn get_unread_count(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<UnreadCountResponse>> {
    let service = AlertService::new(state.db, &state.config);
    let count = service.unread_count(current_user.0.user_id).await?;
    Ok(Json(UnreadCountResponse { count }))
}

/// Mark an alert as read
pub async fn mark_as_read(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(alert_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = AlertService::new(state.db, &state.config);
    service.mark_as_read(current_user.0.user_id, alert_id).await?;
    Ok(Json(()))
}

/// Resolve an alert
pub async fn resolve_alert(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(alert_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = AlertService::new(state.db, &state.config);
    service.resolve(current_user.0.user_id, alert_id).await?;
    Ok(Json(()))
}

/// Delete an alert
pub async fn delete_alert(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(alert_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = AlertService::new(state.db, &state.config);
    service.delete_alert(current_user.0.user_id, alert_id).await?;
    Ok(Json(()))
}

/// Mark all read response
#[derive(Debug, serde::Serialize)]
pub struct MarkAllReadResponse {
    pub marked_count: i64,
}

/// Mark all unread alerts as read
pub async fn mark_all_as_read(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<MarkAllReadResponse>> {
    let service = AlertService::new(state.db, &state.config);
    let count = service.mark_all_as_read(current_user.0.user_id).await?;
    Ok(Json(MarkAllReadResponse { marked_count: count }))
}

/// Cleanup response
#[derive(Debug, serde::Serialize)]
pub struct CleanupResponse {
    pub deleted_count: i64,
}

/// Delete resolved alerts older than the retention window
pub async fn cleanup_alerts(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<CleanupResponse>> {
    let service = AlertService::new(state.db, &state.config);
    let count = service.cleanup(current_user.0.user_id).await?;
    Ok(Json(CleanupResponse { deleted_count: count }))
}

// ============================================================================
// Derivation triggers
// ============================================================================

/// Derivation response
#[derive(Debug, serde::Serialize)]
pub struct GenerateResponse {
    pub created: i64,
    pub message: String,
}

/// Derive stock alerts from the product ledger
pub async fn generate_stock_alerts(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<GenerateResponse>> {
    let service = AlertService::new(state.db, &state.config);
    let created = service.generate_stock_alerts(current_user.0.user_id).await?;
    Ok(Json(GenerateResponse {
        created,
        message: format!("{} alerte(s) de stock créée(s)", created),
    }))
}

/// Derive overdue invoice alerts
pub async fn generate_overdue_alerts(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<GenerateResponse>> {
    let service = AlertService::new(state.db, &state.config);
    let created = service
        .generate_overdue_alerts(current_user.0.user_id)
        .await?;
    Ok(Json(GenerateResponse {
        created,
        message: format!("{} alerte(s) de retard créée(s)", created),
    }))
}

/// Derive payment due alerts
pub async fn generate_payment_due_alerts(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<GenerateResponse>> {
    let service = AlertService::new(state.db, &state.config);
    let created = service
        .generate_payment_due_alerts(current_user.0.user_id)
        .await?;
    Ok(Json(GenerateResponse {
        created,
        message: format!("{} alerte(s) d'échéance créée(s)", created),
    }))
}

/// Run every derivation pass
pub async fn generate_all_alerts(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<GenerateResponse>> {
    let service = AlertService::new(state.db, &state.config);
    let user_id = current_user.0.user_id;

    let mut created = service.generate_stock_alerts(user_id).await?;
    created += service.generate_overdue_alerts(user_id).await?;
    created += service.generate_payment_due_alerts(user_id).await?;

    Ok(Json(GenerateResponse {
        created,
        message: format!("{} alerte(s) créée(s)", created),
    }))
}
