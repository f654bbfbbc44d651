//! Route gate middleware.
//!
//! Runs in front of every route. Reads the session cookie, verifies it with
//! the cookie `SessionVerifier`, and applies the path rules from
//! `domain::account::route_gate`:
//!
//! ```text
//! signed in  + /login, /register            → 307 /dashboard
//! signed out + /dashboard, /settings, ...   → 307 /login, cookie cleared
//! otherwise                                 → handler
//! ```
//!
//! Terminal API requests that carry their own credentials (`X-Api-Key` or a
//! bearer token) skip the cookie requirement; their handlers authenticate
//! them and answer 401 themselves.

use axum::extract::{OriginalUri, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::domain::account::route_gate::{self, GateDecision, DASHBOARD_PATH, LOGIN_PATH};

use super::super::account::api_credentials;
use super::super::cookies::CookiePolicy;
use super::super::state::AppState;

const TERMINAL_API_PREFIX: &str = "/api/terminal";

pub async fn route_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    if path.starts_with(TERMINAL_API_PREFIX) && carries_api_credentials(&request) {
        return next.run(request).await;
    }

    let authenticated = match state.cookies.read(request.headers()) {
        Some(token) => match state.cookie_verifier.verify(&token).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "Session cookie rejected by route gate");
                false
            }
        },
        None => false,
    };

    match route_gate::decide(&path, authenticated) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::RedirectToDashboard => Redirect::temporary(DASHBOARD_PATH).into_response(),
        GateDecision::RedirectToLogin => {
            tracing::debug!(path = %path, "Unauthenticated request to protected path");
            let mut response = Redirect::temporary(LOGIN_PATH).into_response();
            CookiePolicy::append(response.headers_mut(), &state.cookies.cleared());
            response
        }
    }
}

fn carries_api_credentials(request: &Request) -> bool {
    let query = api_credentials(request.headers());
    query.api_key.is_some() || query.bearer_token.is_some()
}
