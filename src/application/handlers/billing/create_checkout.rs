//! CreateCheckoutHandler - Command handler for starting a hosted subscription checkout.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::billing::{BillingInterval, PlanId, PriceCatalog};
use crate::domain::foundation::UserId;
use crate::ports::{CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentProvider};

/// Command to start a checkout. Fields arrive unvalidated from the request body.
#[derive(Debug, Clone, Default)]
pub struct CreateCheckoutCommand {
    pub plan_id: Option<String>,
    pub interval: Option<String>,
    pub user_id: Option<String>,
}

/// Errors returned to the caller. Messages are the public response bodies.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("User ID is required")]
    MissingUserId,

    #[error("Invalid plan selected")]
    InvalidPlan,

    #[error("Invalid billing interval")]
    InvalidInterval,

    #[error("Something went wrong")]
    Provider(#[source] PaymentError),
}

impl CheckoutError {
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CheckoutError::Provider(_))
    }
}

/// Handler for starting checkout sessions.
///
/// Validation runs in a fixed order: user, plan, then interval together with
/// its configured price. Nothing is written locally; the subscription is
/// created when the provider's webhook arrives.
pub struct CreateCheckoutHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    catalog: PriceCatalog,
    app_url: String,
}

impl CreateCheckoutHandler {
    pub fn new(
        payment_provider: Arc<dyn PaymentProvider>,
        catalog: PriceCatalog,
        app_url: impl Into<String>,
    ) -> Self {
        Self {
            payment_provider,
            catalog,
            app_url: app_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn handle(&self, cmd: CreateCheckoutCommand) -> Result<CheckoutSession, CheckoutError> {
        let user_id = cmd
            .user_id
            .as_deref()
            .and_then(|id| UserId::new(id).ok())
            .ok_or(CheckoutError::MissingUserId)?;

        let plan: PlanId = cmd
            .plan_id
            .as_deref()
            .and_then(|p| p.parse().ok())
            .ok_or(CheckoutError::InvalidPlan)?;

        let interval: BillingInterval = match cmd.interval.as_deref() {
            None | Some("") => BillingInterval::default(),
            Some(raw) => raw.parse().map_err(|_| CheckoutError::InvalidInterval)?,
        };

        let price_id = self
            .catalog
            .price_for(plan, interval)
            .ok_or(CheckoutError::InvalidInterval)?
            .to_string();

        let request = CreateCheckoutRequest {
            user_id: user_id.clone(),
            plan,
            interval,
            price_id,
            success_url: format!(
                "{}/thank-you?type=subscription&session_id={{CHECKOUT_SESSION_ID}}",
                self.app_url
            ),
            cancel_url: format!("{}/pricing", self.app_url),
        };

        let session = self
            .payment_provider
            .create_checkout_session(request)
            .await
            .map_err(|e| {
                tracing::error!(
                    user_id = %user_id,
                    plan = plan.as_str(),
                    error = %e,
                    "Checkout session creation failed"
                );
                CheckoutError::Provider(e)
            })?;

        tracing::info!(
            user_id = %user_id,
            plan = plan.as_str(),
            interval = interval.as_str(),
            session_id = %session.id,
            "Checkout session created"
        );

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockPaymentProvider;

    fn catalog() -> PriceCatalog {
        PriceCatalog::new()
            .with_price(PlanId::Pro, BillingInterval::Monthly, "price_pro_m")
            .with_price(PlanId::Pro, BillingInterval::Yearly, "price_abc")
    }

    fn handler(provider: &MockPaymentProvider) -> CreateCheckoutHandler {
        CreateCheckoutHandler::new(Arc::new(provider.clone()), catalog(), "https://rinawarptech.com/")
    }

    fn cmd(plan: Option<&str>, interval: Option<&str>, user: Option<&str>) -> CreateCheckoutCommand {
        CreateCheckoutCommand {
            plan_id: plan.map(str::to_string),
            interval: interval.map(str::to_string),
            user_id: user.map(str::to_string),
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Validation
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_user_is_rejected_first() {
        let provider = MockPaymentProvider::default();
        let err = handler(&provider)
            .handle(cmd(Some("unknown"), Some("weekly"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::MissingUserId));
        assert_eq!(err.to_string(), "User ID is required");
    }

    #[tokio::test]
    async fn empty_user_is_rejected() {
        let provider = MockPaymentProvider::default();
        let err = handler(&provider)
            .handle(cmd(Some("pro"), None, Some("")))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::MissingUserId));
    }

    #[tokio::test]
    async fn unknown_plan_is_rejected() {
        let provider = MockPaymentProvider::default();
        let err = handler(&provider)
            .handle(cmd(Some("unknown"), Some("monthly"), Some("u1")))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid plan selected");
        assert!(err.is_client_error());
        assert!(provider.checkout_requests().is_empty());
    }

    #[tokio::test]
    async fn unknown_interval_is_rejected() {
        let provider = MockPaymentProvider::default();
        let err = handler(&provider)
            .handle(cmd(Some("pro"), Some("weekly"), Some("u1")))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid billing interval");
    }

    #[tokio::test]
    async fn unconfigured_price_is_rejected_not_defaulted() {
        let provider = MockPaymentProvider::default();
        let err = handler(&provider)
            .handle(cmd(Some("turbo"), Some("monthly"), Some("u1")))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidInterval));
        assert!(provider.checkout_requests().is_empty());
    }

    // ══════════════════════════════════════════════════════════════
    // Session creation
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn yearly_pro_uses_configured_price() {
        let provider = MockPaymentProvider::default();
        let session = handler(&provider)
            .handle(cmd(Some("pro"), Some("yearly"), Some("u1")))
            .await
            .unwrap();

        assert!(session.id.starts_with("cs_test_"));
        let requests = provider.checkout_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].price_id, "price_abc");
        assert_eq!(requests[0].user_id.as_str(), "u1");
        assert_eq!(
            requests[0].success_url,
            "https://rinawarptech.com/thank-you?type=subscription&session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(requests[0].cancel_url, "https://rinawarptech.com/pricing");
    }

    #[tokio::test]
    async fn interval_defaults_to_monthly() {
        let provider = MockPaymentProvider::default();
        handler(&provider)
            .handle(cmd(Some("pro"), None, Some("u1")))
            .await
            .unwrap();
        assert_eq!(provider.checkout_requests()[0].price_id, "price_pro_m");
    }

    #[tokio::test]
    async fn provider_failure_is_generic() {
        let provider = MockPaymentProvider::default();
        provider.fail_next(PaymentError::network("connection reset"));

        let err = handler(&provider)
            .handle(cmd(Some("pro"), None, Some("u1")))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Something went wrong");
        assert!(!err.is_client_error());
    }
}
