//! Revenue read model port.

use async_trait::async_trait;

use crate::domain::billing::SubscriptionEventRecord;
use crate::domain::foundation::{DomainError, Timestamp};

#[async_trait]
pub trait RevenueReader: Send + Sync {
    /// All `customer.subscription.created` audit rows.
    async fn subscription_created_events(&self) -> Result<Vec<SubscriptionEventRecord>, DomainError>;

    /// Sum of revenue rows with `from <= occurred_at < to`, in minor units.
    async fn revenue_between(&self, from: Timestamp, to: Timestamp) -> Result<i64, DomainError>;
}
