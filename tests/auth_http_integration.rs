//! Integration tests for the session, API token and route gate endpoints.

mod common;

use axum::http::{header, StatusCode};
use serde_json::json;

use common::*;
use rinawarp_site::domain::account::ApiKey;
use rinawarp_site::domain::foundation::{Timestamp, UserId};

// =============================================================================
// Cookie Login
// =============================================================================

#[tokio::test]
async fn login_cookie_authenticates_status_request() {
    let app = test_app();

    let response = send(
        &app,
        json_request("POST", "/api/auth", json!({ "email": EMAIL, "password": PASSWORD })),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let set_cookie = response.header(header::SET_COOKIE).unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=86400"));
    assert_eq!(response.json()["user"]["subscriptionStatus"], "inactive");

    let cookie = response.session_cookie().unwrap();
    let status = send(&app, get_with_header("/api/auth", "cookie", &cookie)).await;

    assert_eq!(status.status, StatusCode::OK);
    let body = status.json();
    assert_eq!(body["isAuthenticated"], true);
    assert_eq!(body["user"]["email"], EMAIL);
}

#[tokio::test]
async fn wrong_password_is_401_without_cookie() {
    let app = test_app();

    let response = send(
        &app,
        json_request("POST", "/api/auth", json!({ "email": EMAIL, "password": "nope nope" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json(), json!({ "error": "Invalid email or password" }));
    assert!(response.header(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn unknown_email_matches_wrong_password() {
    let app = test_app();

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/auth",
            json!({ "email": "nobody@example.com", "password": PASSWORD }),
        ),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["error"], "Invalid email or password");
}

#[tokio::test]
async fn missing_password_is_400() {
    let app = test_app();

    let response = send(&app, json_request("POST", "/api/auth", json!({ "email": EMAIL }))).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Email and password are required");
}

#[tokio::test]
async fn status_without_cookie_is_anonymous() {
    let app = test_app();

    let response = send(&app, get("/api/auth")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({ "isAuthenticated": false }));
}

#[tokio::test]
async fn status_with_forged_cookie_is_anonymous() {
    let app = test_app();

    let response = send(
        &app,
        get_with_header("/api/auth", "cookie", "rinawarp_auth=forged.token.value"),
    )
    .await;

    assert_eq!(response.json()["isAuthenticated"], false);
}

#[tokio::test]
async fn logout_clears_cookie() {
    let app = test_app();

    let response = send(
        &app,
        axum::http::Request::builder()
            .method("DELETE")
            .uri("/api/auth")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({ "success": true }));
    let set_cookie = response.header(header::SET_COOKIE).unwrap();
    assert!(set_cookie.starts_with("rinawarp_auth=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

// =============================================================================
// Terminal API
// =============================================================================

#[tokio::test]
async fn issued_token_authenticates_terminal_api() {
    let app = test_app();

    let issued = send(
        &app,
        json_request("POST", "/api/auth/token", json!({ "email": EMAIL, "password": PASSWORD })),
    )
    .await;
    assert_eq!(issued.status, StatusCode::OK);
    let token = issued.json()["token"].as_str().unwrap().to_string();
    assert_eq!(app.store.sessions().len(), 1);

    let me = send(
        &app,
        get_with_header("/api/terminal/me", "authorization", &format!("Bearer {}", token)),
    )
    .await;

    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.json()["user"]["id"], USER_ID);
}

#[tokio::test]
async fn browser_session_token_is_rejected_as_bearer() {
    let app = test_app();
    let cookie = login(&app).await;
    let (_, cookie_token) = cookie.split_once('=').unwrap();

    let me = send(
        &app,
        get_with_header("/api/terminal/me", "authorization", &format!("Bearer {}", cookie_token)),
    )
    .await;

    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    assert_eq!(me.json()["error"], "Unauthorized");
}

#[tokio::test]
async fn api_token_does_not_pass_dashboard_gate() {
    let app = test_app();
    let issued = send(
        &app,
        json_request("POST", "/api/auth/token", json!({ "email": EMAIL, "password": PASSWORD })),
    )
    .await;
    let token = issued.json()["token"].as_str().unwrap().to_string();

    let response = send(
        &app,
        get_with_header("/dashboard/revenue", "cookie", &format!("{}={}", COOKIE_NAME, token)),
    )
    .await;

    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header(header::LOCATION).as_deref(), Some("/login"));
}

#[tokio::test]
async fn short_password_token_request_is_400() {
    let app = test_app();

    let response = send(
        &app,
        json_request("POST", "/api/auth/token", json!({ "email": EMAIL, "password": "short" })),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.store.sessions().is_empty());
}

#[tokio::test]
async fn api_key_authenticates_terminal_api() {
    let app = test_app();
    app.store.insert_api_key(ApiKey {
        id: "key_1".to_string(),
        key: "rw_live_key".to_string(),
        user_id: UserId::new(USER_ID).unwrap(),
        expires_at: None,
        last_used: None,
    });

    let me = send(&app, get_with_header("/api/terminal/me", "x-api-key", "rw_live_key")).await;

    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.json()["user"]["email"], EMAIL);
    assert!(app.store.api_key("rw_live_key").unwrap().last_used.is_some());
}

#[tokio::test]
async fn expired_api_key_is_401() {
    let app = test_app();
    app.store.insert_api_key(ApiKey {
        id: "key_old".to_string(),
        key: "rw_old_key".to_string(),
        user_id: UserId::new(USER_ID).unwrap(),
        expires_at: Some(Timestamp::from_unix_secs(1_000)),
        last_used: None,
    });

    let me = send(&app, get_with_header("/api/terminal/me", "x-api-key", "rw_old_key")).await;

    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    assert_eq!(me.json()["error"], "Unauthorized");
}

// =============================================================================
// Route Gate
// =============================================================================

#[tokio::test]
async fn anonymous_terminal_request_is_sent_to_login() {
    let app = test_app();

    let response = send(&app, get("/api/terminal/me")).await;

    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header(header::LOCATION).as_deref(), Some("/login"));
}

#[tokio::test]
async fn revenue_requires_session_cookie() {
    let app = test_app();

    let response = send(&app, get("/dashboard/revenue")).await;

    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header(header::LOCATION).as_deref(), Some("/login"));
    assert!(response
        .header(header::SET_COOKIE)
        .unwrap()
        .contains("Max-Age=0"));
}

#[tokio::test]
async fn signed_in_user_reaches_revenue() {
    let app = test_app();
    let cookie = login(&app).await;

    let response = send(&app, get_with_header("/dashboard/revenue", "cookie", &cookie)).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["mrr"], 0);
    assert_eq!(body["activeSubscriptions"], 0);
    assert_eq!(body["revenueGrowth"], 0.0);
}

#[tokio::test]
async fn signed_in_user_is_bounced_from_login_page() {
    let app = test_app();
    let cookie = login(&app).await;

    let response = send(&app, get_with_header("/login", "cookie", &cookie)).await;

    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header(header::LOCATION).as_deref(), Some("/dashboard"));
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app();

    let response = send(&app, get("/health")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "ok");
}
