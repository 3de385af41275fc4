//! HTTP handlers for the replenishment recorder endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::replenishment::{RecordReplenishmentInput, ReplenishmentService};
use crate::AppState;
use shared::models::StockReplenishment;

/// Record a replenishment for a product
pub async fn record_replenishment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordReplenishmentInput>,
) -> AppResult<(StatusCode, Json<StockReplenishment>)> {
    let service = ReplenishmentService::new(state.db);
    let replenishment = service
        .record_replenishment(current_user.0.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(replenishment)))
}

/// List all replenishments of the current user
pub async fn list_replenishments(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<StockReplenishment>>> {
    let service = ReplenishmentService::new(state.db);
    let replenishments = service.list_replenishments(current_user.0.user_id).await?;
    Ok(Json(replenishments))
}

/// Get the replenishment history of a product
pub async fn get_product_replenishments(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<StockReplenishment>>> {
    let service = ReplenishmentService::new(state.db);
    let replenishments = service
        .get_replenishments_for_product(current_user.0.user_id, product_id)
        .await?;
    Ok(Json(replenishments))
}
