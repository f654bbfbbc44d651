//! Billing persistence ports.
//!
//! Webhook reconciliation reads what it needs through `SubscriptionReader`
//! and `UserRepository`, computes a `BillingBatch`, then hands the batch to
//! `BillingStore::commit`, which applies every write in one transaction.

use async_trait::async_trait;

use crate::domain::billing::{
    ChargeEntry, RevenueEntry, Subscription, SubscriptionEventRecord, SubscriptionStatus,
};
use crate::domain::foundation::{DomainError, Timestamp, UserId};

/// A single state change produced by reconciliation.
///
/// Writes that touch an existing subscription name only the columns they
/// change, so concurrent deliveries for the same user never restore each
/// other's stale values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingWrite {
    /// Record the provider customer on the user.
    LinkCustomer { user_id: UserId, customer_id: String },
    /// Upsert the full subscription row, keyed by user id.
    PutSubscription(Subscription),
    /// Insert the row, or apply `Subscription::sync_from` to the existing one.
    SyncSubscription(Subscription),
    /// Mark cancelled with cancel-at-period-end set.
    CancelSubscription { user_id: UserId },
    /// Set `past_due` unless the subscription is already cancelled.
    MarkPastDue { user_id: UserId },
    /// Overwrite status and period end after a paid invoice.
    RefreshSubscription {
        user_id: UserId,
        status: SubscriptionStatus,
        current_period_end: Timestamp,
    },
    AppendSubscriptionEvent(SubscriptionEventRecord),
    AppendRevenue(RevenueEntry),
    AppendCharge(ChargeEntry),
}

/// Ordered writes committed together or not at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillingBatch {
    writes: Vec<BillingWrite>,
}

impl BillingBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, write: BillingWrite) {
        self.writes.push(write);
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn writes(&self) -> &[BillingWrite] {
        &self.writes
    }

    pub fn into_writes(self) -> Vec<BillingWrite> {
        self.writes
    }
}

/// Read access to the subscription projection.
#[async_trait]
pub trait SubscriptionReader: Send + Sync {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Subscription>, DomainError>;
}

/// Transactional write side for billing state.
#[async_trait]
pub trait BillingStore: Send + Sync {
    /// Applies every write in order inside a single transaction.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` / `SubscriptionNotFound` if a targeted write matches
    ///   no row; nothing is persisted.
    /// - `DatabaseError` if any write fails; nothing is persisted.
    async fn commit(&self, batch: BillingBatch) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billing_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn BillingStore, _reader: &dyn SubscriptionReader) {}
    }

    #[test]
    fn batch_preserves_order() {
        let user_id = UserId::new("user_1").unwrap();
        let mut batch = BillingBatch::new();
        assert!(batch.is_empty());

        batch.push(BillingWrite::LinkCustomer {
            user_id: user_id.clone(),
            customer_id: "cus_1".to_string(),
        });
        batch.push(BillingWrite::LinkCustomer {
            user_id,
            customer_id: "cus_2".to_string(),
        });

        assert_eq!(batch.len(), 2);
        assert!(matches!(
            &batch.writes()[1],
            BillingWrite::LinkCustomer { customer_id, .. } if customer_id == "cus_2"
        ));
    }
}
