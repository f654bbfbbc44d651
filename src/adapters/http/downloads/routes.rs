//! Axum router configuration for downloads.

use axum::{routing::get, Router};

use super::super::state::AppState;
use super::handlers::download;

/// Download routes, nested under `/api/download`.
pub fn download_routes() -> Router<AppState> {
    Router::new().route("/:platform", get(download))
}
