//! Shared application state for the HTTP adapters.

use std::sync::Arc;

use crate::application::handlers::{
    AuthenticateApiRequestHandler, CreateCheckoutHandler, GetAuthStatusHandler,
    GetRevenueSummaryHandler, IssueApiTokenHandler, LoginHandler, ReconcileWebhookHandler,
    ResolveDownloadHandler,
};
use crate::domain::account::PasswordHasher;
use crate::domain::billing::{PriceCatalog, StripeWebhookVerifier};
use crate::domain::release::DownloadCatalog;
use crate::ports::{
    AnalyticsSink, ApiKeyRepository, BillingStore, PaymentProvider, RevenueReader, SessionStore,
    SessionVerifier, SubscriptionReader, TokenSigner, UserRepository,
};

use super::cookies::CookiePolicy;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Dependencies shared by every route.
///
/// Cloned per request; everything heavy sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub subscriptions: Arc<dyn SubscriptionReader>,
    pub billing_store: Arc<dyn BillingStore>,
    pub revenue: Arc<dyn RevenueReader>,
    pub api_keys: Arc<dyn ApiKeyRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub webhook_verifier: Arc<StripeWebhookVerifier>,
    pub token_signer: Arc<dyn TokenSigner>,
    /// Verifies browser session cookies. Always the signed-token strategy.
    pub cookie_verifier: Arc<dyn SessionVerifier>,
    /// Verifies terminal API bearer tokens.
    pub bearer_verifier: Arc<dyn SessionVerifier>,
    pub analytics: Option<Arc<dyn AnalyticsSink>>,
    pub prices: Arc<PriceCatalog>,
    pub downloads: Arc<DownloadCatalog>,
    pub password_hasher: PasswordHasher,
    pub app_url: String,
    pub session_ttl_hours: i64,
    pub cookies: CookiePolicy,
}

impl AppState {
    /// Create handlers on demand from the shared state.
    pub fn webhook_handler(&self) -> ReconcileWebhookHandler {
        ReconcileWebhookHandler::new(
            self.webhook_verifier.clone(),
            self.users.clone(),
            self.subscriptions.clone(),
            self.billing_store.clone(),
            self.payment_provider.clone(),
        )
    }

    pub fn checkout_handler(&self) -> CreateCheckoutHandler {
        CreateCheckoutHandler::new(
            self.payment_provider.clone(),
            self.prices.as_ref().clone(),
            self.app_url.clone(),
        )
    }

    pub fn revenue_handler(&self) -> GetRevenueSummaryHandler {
        GetRevenueSummaryHandler::new(self.revenue.clone())
    }

    pub fn login_handler(&self) -> LoginHandler {
        LoginHandler::new(
            self.users.clone(),
            self.subscriptions.clone(),
            self.token_signer.clone(),
            self.password_hasher,
            self.session_ttl_hours,
        )
    }

    pub fn auth_status_handler(&self) -> GetAuthStatusHandler {
        GetAuthStatusHandler::new(
            self.cookie_verifier.clone(),
            self.users.clone(),
            self.subscriptions.clone(),
        )
    }

    pub fn api_token_handler(&self) -> IssueApiTokenHandler {
        IssueApiTokenHandler::new(
            self.users.clone(),
            self.subscriptions.clone(),
            self.sessions.clone(),
            self.token_signer.clone(),
            self.password_hasher,
            self.session_ttl_hours,
        )
    }

    pub fn api_auth_handler(&self) -> AuthenticateApiRequestHandler {
        AuthenticateApiRequestHandler::new(
            self.api_keys.clone(),
            self.users.clone(),
            self.bearer_verifier.clone(),
        )
    }

    pub fn download_handler(&self) -> ResolveDownloadHandler {
        ResolveDownloadHandler::new(self.downloads.as_ref().clone(), self.analytics.clone())
    }
}
