//! Verified provider events the reconciler understands.

use super::subscription::SubscriptionSnapshot;
use crate::domain::foundation::Timestamp;

/// A completed hosted checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutCompleted {
    pub session_id: String,
    /// `subscription`, `payment` or `setup`.
    pub mode: String,
    pub customer_id: Option<String>,
    pub subscription_id: Option<String>,
    /// Local user id carried in session metadata.
    pub user_id: Option<String>,
}

impl CheckoutCompleted {
    pub fn is_subscription(&self) -> bool {
        self.mode == "subscription"
    }
}

/// A paid or failed invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoicePayment {
    pub invoice_id: String,
    pub customer_id: Option<String>,
    pub subscription_id: Option<String>,
    pub amount_paid: i64,
    pub currency: String,
}

/// A successful charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargePayment {
    pub charge_id: String,
    pub customer_id: Option<String>,
    pub amount: i64,
    pub currency: String,
}

/// Closed set of handled event kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    SubscriptionCreated(SubscriptionSnapshot),
    SubscriptionUpdated(SubscriptionSnapshot),
    SubscriptionDeleted(SubscriptionSnapshot),
    CheckoutCompleted(CheckoutCompleted),
    /// `invoice.payment_succeeded`.
    InvoicePaid(InvoicePayment),
    InvoicePaymentFailed(InvoicePayment),
    ChargeSucceeded(ChargePayment),
    /// Acknowledged and ignored.
    Unrecognized,
}

/// Event after signature verification and payload decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedEvent {
    pub id: String,
    /// Raw type tag, recorded verbatim in audit rows.
    pub event_type: String,
    pub created: Timestamp,
    pub livemode: bool,
    pub kind: ProviderEvent,
}
