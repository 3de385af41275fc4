//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

const SERVICE_NAME: &str = "gestion-commerciale";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub environment: String,
    pub database: String,
    pub alert_retention_days: i64,
}

/// Health check endpoint handler
///
/// Reports connectivity to Postgres along with the running environment
/// and the active alert retention window.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
    {
        Ok(_) => "connected".to_string(),
        Err(_) => "disconnected".to_string(),
    };

    let status = if database == "connected" {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        database,
        alert_retention_days: state.config.alerts.retention_days,
    })
}
