//! Top-level router assembly.

use axum::routing::get;
use axum::{middleware, Router};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderName, HeaderValue, Method};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use super::account::{auth_routes, terminal_routes};
use super::billing::{revenue_routes, stripe_routes};
use super::downloads::download_routes;
use super::middleware::route_gate;
use super::state::AppState;

/// Builds the application router.
///
/// # Routes
/// - `/api/stripe/*` - Webhooks and checkout
/// - `/api/auth/*` - Browser session and API token issue
/// - `/api/terminal/*` - Terminal API (API key or bearer)
/// - `/api/download/:platform` - Installer redirects
/// - `/dashboard/revenue` - Revenue summary (cookie required)
/// - `/health` - Liveness probe
///
/// Requests pass through CORS (when origins are configured), tracing and the
/// timeout before reaching the route gate.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/stripe", stripe_routes())
        .nest("/api/auth", auth_routes())
        .nest("/api/terminal", terminal_routes())
        .nest("/api/download", download_routes())
        .nest("/dashboard", revenue_routes())
        .layer(middleware::from_fn_with_state(state.clone(), route_gate))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(server.request_timeout())),
        );

    match cors_layer(&server.cors_origins_list()) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

async fn health() -> &'static str {
    "ok"
}

/// CORS for the configured origins. Credentials are allowed so the session
/// cookie travels with cross-origin requests.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([
                CONTENT_TYPE,
                AUTHORIZATION,
                HeaderName::from_static("x-api-key"),
            ])
            .allow_credentials(true),
    )
}
