//! Append-only billing ledgers.
//!
//! Rows are immutable facts. Redelivered events may append duplicates;
//! reporting tolerates them.

use serde::{Deserialize, Serialize};

use super::plan::BillingInterval;
use super::subscription::SubscriptionSnapshot;
use crate::domain::foundation::Timestamp;

/// Audit row for a processed subscription lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionEventRecord {
    pub event_type: String,
    pub customer_id: String,
    pub subscription_id: String,
    pub status: String,
    pub plan_id: Option<String>,
    pub amount: Option<i64>,
    pub interval: Option<BillingInterval>,
    pub currency: Option<String>,
    pub occurred_at: Timestamp,
}

impl SubscriptionEventRecord {
    /// Builds the audit row from the provider's view of the subscription.
    pub fn from_snapshot(
        event_type: impl Into<String>,
        snapshot: &SubscriptionSnapshot,
        occurred_at: Timestamp,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            customer_id: snapshot.customer_id.clone(),
            subscription_id: snapshot.id.clone(),
            status: snapshot.status.as_str().to_string(),
            plan_id: snapshot.metadata_plan_id.clone(),
            amount: snapshot.amount,
            interval: snapshot.interval,
            currency: snapshot.currency.clone(),
            occurred_at,
        }
    }
}

/// Revenue row for a paid invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueEntry {
    pub customer_id: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub invoice_id: String,
    pub subscription_id: Option<String>,
    pub occurred_at: Timestamp,
}

/// Row for a successful one-off charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeEntry {
    pub customer_id: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub charge_id: String,
    pub occurred_at: Timestamp,
}
