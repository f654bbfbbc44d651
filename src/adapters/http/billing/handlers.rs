//! HTTP handlers for the billing endpoints.

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::{GetRevenueSummaryQuery, ReconcileWebhookCommand};

use super::super::error::ApiError;
use super::super::state::AppState;
use super::dto::{CheckoutRequest, CheckoutResponse, WebhookAck};

const STRIPE_SIGNATURE: &str = "stripe-signature";

// ════════════════════════════════════════════════════════════════════════════════
// Webhooks
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/stripe/webhook
///
/// The body is taken as raw bytes; the signature covers them exactly.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(STRIPE_SIGNATURE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = ReconcileWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    let outcome = state.webhook_handler().handle(cmd).await?;
    tracing::debug!(outcome = ?outcome, "Webhook reconciled");

    Ok(Json(WebhookAck::received()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Checkout
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/stripe/checkout
pub async fn create_checkout(
    State(state): State<AppState>,
    body: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected checkout body");
        ApiError::bad_request("Invalid request body")
    })?;

    let session = state.checkout_handler().handle(request.into()).await?;

    Ok(Json(CheckoutResponse::from(session)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Revenue
// ════════════════════════════════════════════════════════════════════════════════

/// GET /dashboard/revenue
///
/// Reached only through the route gate, which requires a session cookie.
pub async fn revenue_summary(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .revenue_handler()
        .handle(GetRevenueSummaryQuery::now())
        .await?;

    Ok(Json(summary))
}
