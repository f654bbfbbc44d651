//! Stripe webhook event types.
//!
//! Defines the structures for parsing Stripe webhook payloads and the
//! subscription objects returned by the Stripe API. Only fields relevant to
//! reconciliation are captured.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::events::{ChargePayment, CheckoutCompleted, InvoicePayment, ProviderEvent, VerifiedEvent};
use super::plan::{BillingInterval, FALLBACK_PLAN_ID};
use super::status::SubscriptionStatus;
use super::subscription::SubscriptionSnapshot;
use super::webhook_errors::WebhookError;
use crate::domain::foundation::Timestamp;

/// Stripe webhook event envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    pub created: i64,

    /// Object containing event-specific data.
    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,
}

impl StripeEvent {
    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }

    fn object<T: serde::de::DeserializeOwned>(&self) -> Result<T, WebhookError> {
        self.deserialize_object()
            .map_err(|e| WebhookError::ParseError(format!("{}: {}", self.event_type, e)))
    }

    /// Decodes the payload into the closed set of handled events.
    pub fn into_verified(self) -> Result<VerifiedEvent, WebhookError> {
        let kind = match self.event_type.as_str() {
            "customer.subscription.created" => {
                ProviderEvent::SubscriptionCreated(self.object::<StripeSubscription>()?.into())
            }
            "customer.subscription.updated" => {
                ProviderEvent::SubscriptionUpdated(self.object::<StripeSubscription>()?.into())
            }
            "customer.subscription.deleted" => {
                ProviderEvent::SubscriptionDeleted(self.object::<StripeSubscription>()?.into())
            }
            "checkout.session.completed" => {
                ProviderEvent::CheckoutCompleted(self.object::<StripeCheckoutSession>()?.into())
            }
            "invoice.payment_succeeded" => {
                ProviderEvent::InvoicePaid(self.object::<StripeInvoice>()?.into())
            }
            "invoice.payment_failed" => {
                ProviderEvent::InvoicePaymentFailed(self.object::<StripeInvoice>()?.into())
            }
            "charge.succeeded" => ProviderEvent::ChargeSucceeded(self.object::<StripeCharge>()?.into()),
            _ => ProviderEvent::Unrecognized,
        };

        Ok(VerifiedEvent {
            id: self.id,
            event_type: self.event_type,
            created: Timestamp::from_unix_secs(self.created),
            livemode: self.livemode,
            kind,
        })
    }
}

/// Stripe list wrapper (`{"object": "list", "data": [...]}`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeList<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Default for StripeList<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

/// Subscription object, as embedded in events or returned by the API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeSubscription {
    pub id: String,
    pub customer: String,
    pub status: String,
    #[serde(default)]
    pub current_period_start: Option<i64>,
    #[serde(default)]
    pub current_period_end: Option<i64>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub items: StripeList<StripeSubscriptionItem>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeSubscriptionItem {
    pub price: StripePrice,
    /// Legacy plan object, still sent alongside `price`.
    #[serde(default)]
    pub plan: Option<StripePlan>,
    #[serde(default)]
    pub current_period_start: Option<i64>,
    #[serde(default)]
    pub current_period_end: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePrice {
    pub id: String,
    #[serde(default)]
    pub unit_amount: Option<i64>,
    #[serde(default)]
    pub recurring: Option<StripeRecurring>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeRecurring {
    pub interval: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePlan {
    pub interval: String,
    #[serde(default)]
    pub amount: Option<i64>,
}

impl From<StripeSubscription> for SubscriptionSnapshot {
    fn from(sub: StripeSubscription) -> Self {
        let item = sub.items.data.into_iter().next();

        let price_id = item.as_ref().map(|i| i.price.id.clone());
        let plan_id = item
            .as_ref()
            .and_then(|i| i.price.metadata.get("plan"))
            .filter(|p| !p.is_empty())
            .cloned()
            .unwrap_or_else(|| FALLBACK_PLAN_ID.to_string());
        let interval = item.as_ref().and_then(|i| {
            i.plan
                .as_ref()
                .map(|p| p.interval.as_str())
                .or_else(|| i.price.recurring.as_ref().map(|r| r.interval.as_str()))
                .and_then(BillingInterval::from_provider)
        });
        let amount = item
            .as_ref()
            .and_then(|i| i.plan.as_ref().and_then(|p| p.amount).or(i.price.unit_amount));
        let period_start = sub
            .current_period_start
            .or_else(|| item.as_ref().and_then(|i| i.current_period_start))
            .unwrap_or_default();
        let period_end = sub
            .current_period_end
            .or_else(|| item.as_ref().and_then(|i| i.current_period_end))
            .unwrap_or_default();

        SubscriptionSnapshot {
            id: sub.id,
            customer_id: sub.customer,
            status: SubscriptionStatus::parse(&sub.status),
            price_id,
            plan_id,
            interval,
            amount,
            currency: sub.currency,
            metadata_plan_id: sub.metadata.get("planId").cloned(),
            current_period_start: Timestamp::from_unix_secs(period_start),
            current_period_end: Timestamp::from_unix_secs(period_end),
            cancel_at_period_end: sub.cancel_at_period_end,
        }
    }
}

/// Checkout session object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCheckoutSession {
    pub id: String,
    pub mode: String,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub subscription: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl From<StripeCheckoutSession> for CheckoutCompleted {
    fn from(mut session: StripeCheckoutSession) -> Self {
        CheckoutCompleted {
            session_id: session.id,
            mode: session.mode,
            customer_id: session.customer,
            subscription_id: session.subscription,
            user_id: session.metadata.remove("userId").filter(|id| !id.trim().is_empty()),
        }
    }
}

/// Invoice object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeInvoice {
    pub id: String,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub subscription: Option<String>,
    #[serde(default)]
    pub amount_paid: i64,
    pub currency: String,
}

impl From<StripeInvoice> for InvoicePayment {
    fn from(invoice: StripeInvoice) -> Self {
        InvoicePayment {
            invoice_id: invoice.id,
            customer_id: invoice.customer,
            subscription_id: invoice.subscription,
            amount_paid: invoice.amount_paid,
            currency: invoice.currency,
        }
    }
}

/// Charge object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCharge {
    pub id: String,
    #[serde(default)]
    pub customer: Option<String>,
    pub amount: i64,
    pub currency: String,
}

impl From<StripeCharge> for ChargePayment {
    fn from(charge: StripeCharge) -> Self {
        ChargePayment {
            charge_id: charge.id,
            customer_id: charge.customer,
            amount: charge.amount,
            currency: charge.currency,
        }
    }
}

/// Builder for creating test StripeEvent instances.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
    livemode: bool,
}

#[cfg(test)]
impl Default for StripeEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "checkout.session.completed".to_string(),
            created: 1_704_067_200,
            object: serde_json::json!({}),
            livemode: false,
        }
    }
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: StripeEventData {
                object: self.object,
            },
            livemode: self.livemode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn subscription_object(status: &str) -> serde_json::Value {
        json!({
            "id": "sub_1",
            "customer": "cus_1",
            "status": status,
            "current_period_start": 1_700_000_000,
            "current_period_end": 1_702_592_000,
            "currency": "usd",
            "metadata": { "planId": "turbo" },
            "items": { "object": "list", "data": [{
                "price": { "id": "price_turbo_y", "unit_amount": 29000, "metadata": { "plan": "turbo" } },
                "plan": { "interval": "year", "amount": 29000 }
            }]}
        })
    }

    // ══════════════════════════════════════════════════════════════
    // Envelope
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn deserialize_minimal_event() {
        let json = r#"{
            "id": "evt_1234567890",
            "type": "checkout.session.completed",
            "created": 1704067200,
            "data": { "object": {} }
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, "evt_1234567890");
        assert!(!event.livemode);
    }

    #[test]
    fn unrecognized_type_is_not_an_error() {
        let verified = StripeEventBuilder::new()
            .event_type("customer.created")
            .build()
            .into_verified()
            .unwrap();
        assert_eq!(verified.kind, ProviderEvent::Unrecognized);
        assert_eq!(verified.event_type, "customer.created");
    }

    // ══════════════════════════════════════════════════════════════
    // Subscription Objects
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn subscription_snapshot_reads_first_item() {
        let verified = StripeEventBuilder::new()
            .event_type("customer.subscription.updated")
            .object(subscription_object("active"))
            .build()
            .into_verified()
            .unwrap();

        let ProviderEvent::SubscriptionUpdated(snapshot) = verified.kind else {
            panic!("expected subscription update");
        };
        assert_eq!(snapshot.plan_id, "turbo");
        assert_eq!(snapshot.price_id.as_deref(), Some("price_turbo_y"));
        assert_eq!(snapshot.interval, Some(BillingInterval::Yearly));
        assert_eq!(snapshot.amount, Some(29000));
        assert_eq!(snapshot.metadata_plan_id.as_deref(), Some("turbo"));
        assert_eq!(snapshot.current_period_end.as_unix_secs(), 1_702_592_000);
    }

    #[test]
    fn missing_plan_metadata_defaults_to_free() {
        let mut object = subscription_object("trialing");
        object["items"]["data"][0]["price"]["metadata"] = json!({});

        let sub: StripeSubscription = serde_json::from_value(object).unwrap();
        let snapshot = SubscriptionSnapshot::from(sub);

        assert_eq!(snapshot.plan_id, "free");
        assert_eq!(snapshot.status, SubscriptionStatus::Trialing);
    }

    #[test]
    fn canceled_spelling_normalizes_in_snapshot() {
        let sub: StripeSubscription = serde_json::from_value(subscription_object("canceled")).unwrap();
        assert_eq!(SubscriptionSnapshot::from(sub).status, SubscriptionStatus::Cancelled);
    }

    #[test]
    fn malformed_subscription_is_parse_error() {
        let result = StripeEventBuilder::new()
            .event_type("customer.subscription.created")
            .object(json!({ "id": "sub_1" }))
            .build()
            .into_verified();
        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Checkout, Invoice and Charge Objects
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn checkout_session_extracts_user_id() {
        let verified = StripeEventBuilder::new()
            .object(json!({
                "id": "cs_1",
                "mode": "subscription",
                "customer": "cus_1",
                "subscription": "sub_1",
                "metadata": { "userId": "user_9", "planId": "pro" }
            }))
            .build()
            .into_verified()
            .unwrap();

        let ProviderEvent::CheckoutCompleted(checkout) = verified.kind else {
            panic!("expected checkout");
        };
        assert!(checkout.is_subscription());
        assert_eq!(checkout.user_id.as_deref(), Some("user_9"));
    }

    #[test]
    fn blank_user_id_metadata_is_absent() {
        let session: StripeCheckoutSession = serde_json::from_value(json!({
            "id": "cs_1",
            "mode": "subscription",
            "metadata": { "userId": "  " }
        }))
        .unwrap();
        assert!(CheckoutCompleted::from(session).user_id.is_none());
    }

    #[test]
    fn only_payment_succeeded_counts_as_invoice_paid() {
        let invoice = |event_type: &str| {
            StripeEventBuilder::new()
                .event_type(event_type)
                .object(json!({
                    "id": "in_1",
                    "customer": "cus_1",
                    "subscription": "sub_1",
                    "amount_paid": 1500,
                    "currency": "usd"
                }))
                .build()
                .into_verified()
                .unwrap()
        };

        assert!(matches!(
            invoice("invoice.payment_succeeded").kind,
            ProviderEvent::InvoicePaid(_)
        ));
        // Stripe sends both for the same invoice; one revenue row per invoice.
        assert_eq!(invoice("invoice.paid").kind, ProviderEvent::Unrecognized);
    }

    #[test]
    fn charge_maps_amount_and_currency() {
        let verified = StripeEventBuilder::new()
            .event_type("charge.succeeded")
            .object(json!({ "id": "ch_1", "customer": null, "amount": 900, "currency": "eur" }))
            .build()
            .into_verified()
            .unwrap();

        let ProviderEvent::ChargeSucceeded(charge) = verified.kind else {
            panic!("expected charge");
        };
        assert_eq!(charge.amount, 900);
        assert!(charge.customer_id.is_none());
    }
}
