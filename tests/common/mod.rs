//! Shared test infrastructure for the HTTP integration tests.
//!
//! Builds the full router over in-memory adapters and a mock payment
//! provider, then drives it with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use rinawarp_site::adapters::auth::JwtCodec;
use rinawarp_site::adapters::http::{build_router, AppState, CookiePolicy};
use rinawarp_site::adapters::memory::InMemoryStore;
use rinawarp_site::adapters::stripe::MockPaymentProvider;
use rinawarp_site::config::ServerConfig;
use rinawarp_site::domain::account::{PasswordHasher, TokenAudience};
use rinawarp_site::domain::billing::{
    sign_payload, BillingInterval, PlanId, PriceCatalog, StripeWebhookVerifier,
};
use rinawarp_site::domain::release::DownloadCatalog;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const WEBHOOK_SECRET: &str = "whsec_integration";
pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "correct horse battery";
pub const USER_ID: &str = "user_1";
pub const CUSTOMER_ID: &str = "cus_1";
pub const COOKIE_NAME: &str = "rinawarp_auth";

// =============================================================================
// Test Application
// =============================================================================

pub struct TestApp {
    pub router: Router,
    pub store: InMemoryStore,
    pub provider: Arc<MockPaymentProvider>,
}

/// Cheap scrypt parameters so tests stay fast.
pub fn hasher() -> PasswordHasher {
    PasswordHasher::with_params(4, 8, 1)
}

pub fn prices() -> PriceCatalog {
    PriceCatalog::new()
        .with_price(PlanId::Pro, BillingInterval::Monthly, "price_pro_m")
        .with_price(PlanId::Pro, BillingInterval::Yearly, "price_abc")
        .with_price(PlanId::Turbo, BillingInterval::Monthly, "price_turbo_m")
}

pub fn test_app() -> TestApp {
    test_app_with_downloads(DownloadCatalog::default())
}

pub fn test_app_with_downloads(downloads: DownloadCatalog) -> TestApp {
    let store = InMemoryStore::new();
    let hash = hasher().hash(PASSWORD).expect("hash test password");
    store.add_user(USER_ID, EMAIL, &hash, Some(CUSTOMER_ID));

    let provider = Arc::new(MockPaymentProvider::new());
    let jwt = Arc::new(JwtCodec::new(JWT_SECRET, TokenAudience::Cookie));

    let state = AppState {
        users: Arc::new(store.clone()),
        subscriptions: Arc::new(store.clone()),
        billing_store: Arc::new(store.clone()),
        revenue: Arc::new(store.clone()),
        api_keys: Arc::new(store.clone()),
        sessions: Arc::new(store.clone()),
        payment_provider: provider.clone(),
        webhook_verifier: Arc::new(StripeWebhookVerifier::new(WEBHOOK_SECRET)),
        token_signer: jwt.clone(),
        cookie_verifier: jwt.clone(),
        bearer_verifier: Arc::new(JwtCodec::new(JWT_SECRET, TokenAudience::Api)),
        analytics: None,
        prices: Arc::new(prices()),
        downloads: Arc::new(downloads),
        password_hasher: hasher(),
        app_url: "https://rinawarptech.com".to_string(),
        session_ttl_hours: 24,
        cookies: CookiePolicy::new(COOKIE_NAME, false),
    };

    TestApp {
        router: build_router(state, &ServerConfig::default()),
        store,
        provider,
    }
}

// =============================================================================
// Request Helpers
// =============================================================================

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    pub fn header(&self, name: header::HeaderName) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// The `name=value` part of the session `Set-Cookie` header.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&format!("{}=", COOKIE_NAME)))
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }
}

pub async fn send(app: &TestApp, request: Request<Body>) -> TestResponse {
    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec();

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_header(uri: &str, name: &str, value: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(name, value)
        .body(Body::empty())
        .unwrap()
}

/// Logs in with the seeded credentials and returns the session cookie pair.
pub async fn login(app: &TestApp) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/auth",
            serde_json::json!({ "email": EMAIL, "password": PASSWORD }),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    response.session_cookie().expect("login sets a cookie")
}

// =============================================================================
// Webhook Helpers
// =============================================================================

pub fn subscription_object(status: &str) -> Value {
    serde_json::json!({
        "id": "sub_1",
        "customer": CUSTOMER_ID,
        "status": status,
        "current_period_start": 1_700_000_000,
        "current_period_end": 1_702_592_000,
        "currency": "usd",
        "metadata": { "planId": "pro" },
        "items": { "data": [{
            "price": { "id": "price_pro_m", "metadata": { "plan": "pro" } },
            "plan": { "interval": "month", "amount": 1500 }
        }]}
    })
}

pub fn event_body(event_id: &str, event_type: &str, object: Value) -> String {
    serde_json::json!({
        "id": event_id,
        "type": event_type,
        "created": chrono::Utc::now().timestamp(),
        "livemode": false,
        "data": { "object": object }
    })
    .to_string()
}

pub fn webhook_request(body: &str, signature: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/stripe/webhook")
        .header("stripe-signature", signature)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn signed_webhook(body: &str) -> Request<Body> {
    let signature = sign_payload(WEBHOOK_SECRET, chrono::Utc::now().timestamp(), body);
    webhook_request(body, &signature)
}
