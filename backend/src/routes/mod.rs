//! Route definitions for the Gestion Commerciale API

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
///
/// The state is threaded into the auth middleware so token verification
/// uses the same configured secret the auth service signs with.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public except /me)
        .nest("/auth", auth_routes(state.clone()))
        // Protected routes - product ledger
        .nest("/products", product_routes(state.clone()))
        // Protected routes - replenishment recorder
        .nest("/stock-replenishments", replenishment_routes(state.clone()))
        // Protected routes - invoices and settlement
        .nest("/invoices", invoice_routes(state.clone()))
        // Protected routes - alerts
        .nest("/alerts", alert_routes(state))
}

/// Authentication routes (public except /me)
fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .nest("/me", me_routes(state))
}

fn me_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Product ledger routes (protected)
fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products))
        .route("/low-stock", get(handlers::list_low_stock_products))
        .route("/:product_id", get(handlers::get_product))
        .route(
            "/:product_id/replenishments",
            get(handlers::get_product_replenishments),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Replenishment recorder routes (protected)
fn replenishment_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_replenishments).post(handlers::record_replenishment),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Invoice routes (protected)
fn invoice_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_invoices))
        .route("/:invoice_id", get(handlers::get_invoice))
        .route("/:invoice_id/pay", post(handlers::pay_invoice))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Alert routes (protected)
fn alert_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Store
        .route("/", get(handlers::list_alerts))
        .route("/unread-count", get(handlers::get_unread_count))
        .route("/mark-all-read", post(handlers::mark_all_as_read))
        .route("/cleanup", delete(handlers::cleanup_alerts))
        // Derivation triggers
        .route("/generate", post(handlers::generate_all_alerts))
        .route("/generate/stock", post(handlers::generate_stock_alerts))
        .route("/generate/overdue", post(handlers::generate_overdue_alerts))
        .route(
            "/generate/payment-due",
            post(handlers::generate_payment_due_alerts),
        )
        // Per-alert lifecycle
        .route(
            "/:alert_id",
            get(handlers::get_alert).delete(handlers::delete_alert),
        )
        .route("/:alert_id/read", post(handlers::mark_as_read))
        .route("/:alert_id/resolve", post(handlers::resolve_alert))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
