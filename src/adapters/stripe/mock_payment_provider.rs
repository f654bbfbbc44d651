//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Subscriptions seeded from raw Stripe JSON
//! - Error injection
//! - Recording of checkout requests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::billing::{StripeSubscription, SubscriptionSnapshot};
use crate::ports::{CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentProvider};

/// Mock payment provider for testing.
#[derive(Default, Clone)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Subscriptions by provider ID, as the Stripe API would return them.
    subscriptions: HashMap<String, serde_json::Value>,

    /// Error to return on the next call.
    next_error: Option<PaymentError>,

    /// Checkout requests received, in order.
    checkout_requests: Vec<CreateCheckoutRequest>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a subscription object; its `id` field is the lookup key.
    pub fn put_subscription(&self, object: serde_json::Value) {
        let id = object
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        self.lock().subscriptions.insert(id, object);
    }

    /// Fails the next call with `error`.
    pub fn fail_next(&self, error: PaymentError) {
        self.lock().next_error = Some(error);
    }

    pub fn checkout_requests(&self) -> Vec<CreateCheckoutRequest> {
        self.lock().checkout_requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A poisoned lock only means another test thread panicked.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let mut state = self.lock();
        if let Some(err) = state.next_error.take() {
            return Err(err);
        }

        state.checkout_requests.push(request);
        let n = state.checkout_requests.len();
        Ok(CheckoutSession {
            id: format!("cs_test_{}", n),
            url: Some(format!("https://checkout.stripe.com/c/pay/cs_test_{}", n)),
        })
    }

    async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<SubscriptionSnapshot, PaymentError> {
        let mut state = self.lock();
        if let Some(err) = state.next_error.take() {
            return Err(err);
        }

        let object = state
            .subscriptions
            .get(subscription_id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found("Subscription"))?;
        let subscription: StripeSubscription =
            serde_json::from_value(object).map_err(|e| PaymentError::provider(e.to_string()))?;
        Ok(subscription.into())
    }
}
