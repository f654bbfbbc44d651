//! HTTP handlers for the authentication endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::{AuthenticateApiRequestQuery, GetAuthStatusQuery, LoginCommand};
use crate::domain::account::UserProfile;

use super::super::cookies::CookiePolicy;
use super::super::error::ApiError;
use super::super::state::AppState;
use super::dto::{AuthStatusResponse, CredentialsRequest, LogoutResponse, TokenResponse, UserResponse};

const API_KEY_HEADER: &str = "x-api-key";

// ════════════════════════════════════════════════════════════════════════════════
// Browser session
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/auth
///
/// Sets the session cookie and returns the user profile.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd: LoginCommand = body.map(|Json(req)| req.into()).unwrap_or_default();

    let result = state.login_handler().handle(cmd).await?;

    let mut headers = HeaderMap::new();
    CookiePolicy::append(
        &mut headers,
        &state.cookies.session(&result.token, result.max_age_secs),
    );

    Ok((
        headers,
        Json(UserResponse {
            user: result.profile,
        }),
    ))
}

/// GET /api/auth
///
/// Never fails; any problem with the cookie reads as signed out.
pub async fn auth_status(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let query = GetAuthStatusQuery {
        token: state.cookies.read(&headers),
    };
    let status = state.auth_status_handler().handle(query).await;

    Json(AuthStatusResponse::from(status))
}

/// DELETE /api/auth
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    CookiePolicy::append(&mut headers, &state.cookies.cleared());

    (headers, Json(LogoutResponse { success: true }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Terminal API
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/auth/token
pub async fn issue_api_token(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected token request body");
        ApiError::bad_request("Invalid request body")
    })?;

    let issued = state.api_token_handler().handle(request.into()).await?;

    Ok((
        StatusCode::OK,
        Json(TokenResponse {
            token: issued.token,
            user: issued.profile,
        }),
    ))
}

/// GET /api/terminal/me
///
/// Accepts an `X-Api-Key` header or an `Authorization: Bearer` token.
pub async fn terminal_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let query = api_credentials(&headers);

    let caller = state
        .api_auth_handler()
        .handle(query)
        .await
        .ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;

    let subscription = state.subscriptions.find_by_user(&caller.user.id).await?;
    let profile = UserProfile::new(&caller.user, subscription.as_ref().map(|s| &s.status));

    tracing::debug!(user_id = %caller.user.id, via = ?caller.via, "Terminal caller resolved");

    Ok(Json(UserResponse { user: profile }))
}

/// Extracts the terminal API credentials a request carries, if any.
pub fn api_credentials(headers: &HeaderMap) -> AuthenticateApiRequestQuery {
    AuthenticateApiRequestQuery {
        api_key: header_value(headers, API_KEY_HEADER).map(str::to_string),
        bearer_token: header_value(headers, AUTHORIZATION.as_str())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string()),
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_api_key_and_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("rw_key"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));

        let query = api_credentials(&headers);
        assert_eq!(query.api_key.as_deref(), Some("rw_key"));
        assert_eq!(query.bearer_token.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn non_bearer_authorization_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));

        let query = api_credentials(&headers);
        assert!(query.bearer_token.is_none());
        assert!(query.api_key.is_none());
    }
}
