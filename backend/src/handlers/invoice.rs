//! HTTP handlers for invoice endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::invoice::{InvoiceService, InvoiceWithItems};
use crate::AppState;
use shared::models::Invoice;

/// List all invoices of the current user
pub async fn list_invoices(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Invoice>>> {
    let service = InvoiceService::new(state.db);
    let invoices = service.list_invoices(current_user.0.user_id).await?;
    Ok(Json(invoices))
}

/// Get an invoice with its line items
pub async fn get_invoice(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(invoice_id): Path<Uuid>,
) -> AppResult<Json<InvoiceWithItems>> {
    let service = InvoiceService::new(state.db);
    let invoice = service
        .get_invoice(current_user.0.user_id, invoice_id)
        .await?;
    Ok(Json(invoice))
}

/// Mark an invoice as paid, settling stock for its line items
pub async fn pay_invoice(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(invoice_id): Path<Uuid>,
) -> AppResult<Json<Invoice>> {
    let service = InvoiceService::new(state.db);
    let invoice = service.mark_paid(current_user.0.user_id, invoice_id).await?;
    Ok(Json(invoice))
}
