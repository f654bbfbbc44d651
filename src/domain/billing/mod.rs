//! Billing domain - plans, subscriptions, provider events and ledgers.

mod catalog;
mod events;
mod ledger;
mod plan;
mod revenue;
mod status;
mod stripe_event;
mod subscription;
mod webhook_errors;
mod webhook_verifier;

pub use catalog::PriceCatalog;
pub use events::{ChargePayment, CheckoutCompleted, InvoicePayment, ProviderEvent, VerifiedEvent};
pub use ledger::{ChargeEntry, RevenueEntry, SubscriptionEventRecord};
pub use plan::{BillingInterval, PlanId, FALLBACK_PLAN_ID};
pub use revenue::{monthly_recurring_revenue, revenue_growth, RevenueSummary};
pub use status::SubscriptionStatus;
pub use stripe_event::{
    StripeCharge, StripeCheckoutSession, StripeEvent, StripeEventData, StripeInvoice, StripeList,
    StripePlan, StripePrice, StripeRecurring, StripeSubscription, StripeSubscriptionItem,
};
pub use subscription::{Subscription, SubscriptionSnapshot};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{sign_payload, SignatureHeader, StripeWebhookVerifier, DEFAULT_TOLERANCE_SECS};

#[cfg(test)]
pub(crate) use subscription::test_snapshot;
