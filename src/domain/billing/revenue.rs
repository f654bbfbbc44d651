//! Revenue figures derived from the billing ledgers.

use serde::Serialize;
use std::collections::HashSet;

use super::ledger::SubscriptionEventRecord;
use super::plan::BillingInterval;

/// Event type whose audit rows carry the committed recurring amount.
const SUBSCRIPTION_CREATED: &str = "customer.subscription.created";

/// Summary served to the revenue dashboard. Amounts are in minor units.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    pub mrr: i64,
    pub current_month_revenue: i64,
    pub last_month_revenue: i64,
    /// Month-over-month change in percent.
    pub revenue_growth: f64,
    pub active_subscriptions: usize,
}

impl RevenueSummary {
    pub fn compute(
        created_events: &[SubscriptionEventRecord],
        current_month_revenue: i64,
        last_month_revenue: i64,
    ) -> Self {
        let (mrr, active_subscriptions) = monthly_recurring_revenue(created_events);
        Self {
            mrr,
            current_month_revenue,
            last_month_revenue,
            revenue_growth: revenue_growth(current_month_revenue, last_month_revenue),
            active_subscriptions,
        }
    }
}

/// Sums the most recent active `created` row per subscription.
///
/// Yearly amounts contribute a twelfth. Returns the MRR and the number of
/// subscriptions counted.
pub fn monthly_recurring_revenue(events: &[SubscriptionEventRecord]) -> (i64, usize) {
    let mut latest_first: Vec<&SubscriptionEventRecord> = events
        .iter()
        .filter(|e| e.event_type == SUBSCRIPTION_CREATED && e.status == "active")
        .collect();
    latest_first.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));

    let mut seen = HashSet::new();
    let mut mrr = 0;
    for event in latest_first {
        if !seen.insert(event.subscription_id.as_str()) {
            continue;
        }
        let amount = event.amount.unwrap_or(0);
        mrr += match event.interval {
            Some(BillingInterval::Yearly) => amount / 12,
            _ => amount,
        };
    }
    (mrr, seen.len())
}

/// Percentage change from last month, zero when last month had no revenue.
pub fn revenue_growth(current: i64, last: i64) -> f64 {
    if last == 0 {
        return 0.0;
    }
    (current - last) as f64 / last as f64 * 100.0
}
