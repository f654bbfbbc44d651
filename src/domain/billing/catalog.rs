//! Provider price ids per plan and interval.

use std::collections::HashMap;

use super::plan::{BillingInterval, PlanId};

/// Maps each sellable plan/interval pair to its provider price id.
///
/// Pairs without a configured price cannot be purchased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceCatalog {
    prices: HashMap<(PlanId, BillingInterval), String>,
}

impl PriceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a price. Blank ids are treated as unconfigured.
    pub fn with_price(mut self, plan: PlanId, interval: BillingInterval, price_id: impl Into<String>) -> Self {
        let price_id = price_id.into();
        if !price_id.trim().is_empty() {
            self.prices.insert((plan, interval), price_id);
        }
        self
    }

    pub fn price_for(&self, plan: PlanId, interval: BillingInterval) -> Option<&str> {
        self.prices.get(&(plan, interval)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
