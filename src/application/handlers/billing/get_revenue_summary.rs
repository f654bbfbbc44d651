//! GetRevenueSummaryHandler - Query handler for the revenue dashboard.

use std::sync::Arc;

use crate::domain::billing::RevenueSummary;
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::RevenueReader;

/// Query for the revenue summary as of `as_of`.
#[derive(Debug, Clone, Copy)]
pub struct GetRevenueSummaryQuery {
    pub as_of: Timestamp,
}

impl GetRevenueSummaryQuery {
    pub fn now() -> Self {
        Self {
            as_of: Timestamp::now(),
        }
    }
}

/// Handler computing MRR and month-over-month revenue from the ledgers.
pub struct GetRevenueSummaryHandler {
    reader: Arc<dyn RevenueReader>,
}

impl GetRevenueSummaryHandler {
    pub fn new(reader: Arc<dyn RevenueReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: GetRevenueSummaryQuery) -> Result<RevenueSummary, DomainError> {
        let this_month = query.as_of.start_of_month();
        let next_month = query.as_of.start_of_next_month();
        let last_month = query.as_of.start_of_previous_month();

        let created = self.reader.subscription_created_events().await?;
        let current = self.reader.revenue_between(this_month, next_month).await?;
        let previous = self.reader.revenue_between(last_month, this_month).await?;

        Ok(RevenueSummary::compute(&created, current, previous))
    }
}
