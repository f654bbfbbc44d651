//! Axum router configuration for authentication endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{auth_status, issue_api_token, login, logout, terminal_me};

/// Session routes, nested under `/api/auth`.
///
/// # Routes
/// - `POST /` - Log in and set the session cookie
/// - `GET /` - Report whether the cookie is a valid session
/// - `DELETE /` - Clear the session cookie
/// - `POST /token` - Issue a terminal API bearer token
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(login).get(auth_status).delete(logout))
        .route("/token", post(issue_api_token))
}

/// Terminal API routes, nested under `/api/terminal`.
pub fn terminal_routes() -> Router<AppState> {
    Router::new().route("/me", get(terminal_me))
}
