//! HTTP handlers for the product ledger endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::ProductService;
use crate::AppState;
use shared::models::Product;

/// List all products of the current user
pub async fn list_products(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db);
    let products = service.list_products(current_user.0.user_id).await?;
    Ok(Json(products))
}

/// Get a single product
pub async fn get_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service
        .get_product(current_user.0.user_id, product_id)
        .await?;
    Ok(Json(product))
}

/// List products at or below their alert threshold
pub async fn list_low_stock_products(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db);
    let products = service
        .get_low_stock_products(current_user.0.user_id)
        .await?;
    Ok(Json(products))
}
