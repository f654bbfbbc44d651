//! Local subscription projection.
//!
//! The payment provider owns subscription state. A `Subscription` is the
//! locally cached copy, one per user, overwritten whenever the provider
//! reports newer values.

use serde::{Deserialize, Serialize};

use super::plan::BillingInterval;
use super::status::SubscriptionStatus;
use crate::domain::foundation::{Timestamp, UserId};

/// Provider-reported state of a subscription at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionSnapshot {
    pub id: String,
    pub customer_id: String,
    pub status: SubscriptionStatus,
    pub price_id: Option<String>,
    /// Plan from the price metadata, `free` when absent.
    pub plan_id: String,
    pub interval: Option<BillingInterval>,
    /// Per-period amount in minor currency units.
    pub amount: Option<i64>,
    pub currency: Option<String>,
    /// Plan id stamped onto the subscription at checkout.
    pub metadata_plan_id: Option<String>,
    pub current_period_start: Timestamp,
    pub current_period_end: Timestamp,
    pub cancel_at_period_end: bool,
}

/// Locally cached subscription, unique per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub user_id: UserId,
    pub stripe_subscription_id: String,
    pub stripe_price_id: Option<String>,
    pub stripe_customer_id: String,
    pub status: SubscriptionStatus,
    pub plan_id: String,
    pub interval: Option<BillingInterval>,
    pub current_period_start: Timestamp,
    pub current_period_end: Timestamp,
    pub cancel_at_period_end: bool,
}

impl Subscription {
    /// Creates the projection for a user from a provider snapshot.
    pub fn from_snapshot(user_id: UserId, snapshot: &SubscriptionSnapshot) -> Self {
        Self {
            user_id,
            stripe_subscription_id: snapshot.id.clone(),
            stripe_price_id: snapshot.price_id.clone(),
            stripe_customer_id: snapshot.customer_id.clone(),
            status: snapshot.status.clone(),
            plan_id: snapshot.plan_id.clone(),
            interval: snapshot.interval,
            current_period_start: snapshot.current_period_start,
            current_period_end: snapshot.current_period_end,
            cancel_at_period_end: snapshot.cancel_at_period_end,
        }
    }

    /// Overwrites the provider-owned fields from a newer copy.
    ///
    /// Status, price, plan and period bounds take the incoming values; the
    /// subscription id, customer id, interval and cancel flag are kept.
    pub fn sync_from(&mut self, incoming: &Subscription) {
        self.status = incoming.status.clone();
        self.stripe_price_id = incoming.stripe_price_id.clone();
        self.plan_id = incoming.plan_id.clone();
        self.current_period_start = incoming.current_period_start;
        self.current_period_end = incoming.current_period_end;
    }

    /// Marks the subscription cancelled after the provider deleted it.
    pub fn cancel(&mut self) {
        self.status = SubscriptionStatus::Cancelled;
        self.cancel_at_period_end = true;
    }

    /// Records a failed renewal payment.
    ///
    /// Returns false, leaving the row untouched, when already cancelled.
    pub fn mark_past_due(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = SubscriptionStatus::PastDue;
        true
    }

    /// Applies the provider's state after a successful invoice payment.
    pub fn refresh_after_payment(&mut self, status: SubscriptionStatus, current_period_end: Timestamp) {
        self.status = status;
        self.current_period_end = current_period_end;
    }
}

#[cfg(test)]
pub(crate) fn test_snapshot(status: SubscriptionStatus) -> SubscriptionSnapshot {
    SubscriptionSnapshot {
        id: "sub_123".to_string(),
        customer_id: "cus_123".to_string(),
        status,
        price_id: Some("price_pro_monthly".to_string()),
        plan_id: "pro".to_string(),
        interval: Some(BillingInterval::Monthly),
        amount: Some(1500),
        currency: Some("usd".to_string()),
        metadata_plan_id: Some("pro".to_string()),
        current_period_start: Timestamp::from_unix_secs(1_700_000_000),
        current_period_end: Timestamp::from_unix_secs(1_702_592_000),
        cancel_at_period_end: false,
    }
}
