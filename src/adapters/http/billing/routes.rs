//! Axum router configuration for billing endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{create_checkout, revenue_summary, stripe_webhook};

/// Payment provider routes, nested under `/api/stripe`.
///
/// # Routes
/// - `POST /webhook` - Signed provider webhooks (no session auth)
/// - `POST /checkout` - Start a hosted checkout
pub fn stripe_routes() -> Router<AppState> {
    Router::new()
        .route("/webhook", post(stripe_webhook))
        .route("/checkout", post(create_checkout))
}

/// Revenue dashboard routes, nested under `/dashboard`.
pub fn revenue_routes() -> Router<AppState> {
    Router::new().route("/revenue", get(revenue_summary))
}
