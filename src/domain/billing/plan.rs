//! Purchasable plans and billing intervals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Plan identifier used when no plan metadata is attached to a price.
pub const FALLBACK_PLAN_ID: &str = "free";

/// Paid plans offered through checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    Pro,
    Turbo,
    Business,
}

impl PlanId {
    pub const ALL: [PlanId; 3] = [PlanId::Pro, PlanId::Turbo, PlanId::Business];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanId::Pro => "pro",
            PlanId::Turbo => "turbo",
            PlanId::Business => "business",
        }
    }

    /// Marketing name shown on the pricing page.
    pub fn display_name(&self) -> &'static str {
        match self {
            PlanId::Pro => "Pro Plan",
            PlanId::Turbo => "Turbo Plan",
            PlanId::Business => "Business Plan",
        }
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pro" => Ok(PlanId::Pro),
            "turbo" => Ok(PlanId::Turbo),
            "business" => Ok(PlanId::Business),
            other => Err(ValidationError::unsupported("plan_id", other)),
        }
    }
}

/// How often a subscription bills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    #[default]
    Monthly,
    Yearly,
}

impl BillingInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingInterval::Monthly => "monthly",
            BillingInterval::Yearly => "yearly",
        }
    }

    /// Parses the provider's recurring interval (`month` / `year`).
    ///
    /// Returns `None` for intervals no plan is sold on (`day`, `week`).
    pub fn from_provider(interval: &str) -> Option<Self> {
        match interval {
            "month" | "monthly" => Some(BillingInterval::Monthly),
            "year" | "yearly" => Some(BillingInterval::Yearly),
            _ => None,
        }
    }

    /// Number of billing periods per year.
    pub fn periods_per_year(&self) -> i64 {
        match self {
            BillingInterval::Monthly => 12,
            BillingInterval::Yearly => 1,
        }
    }
}

impl fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingInterval {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(BillingInterval::Monthly),
            "yearly" => Ok(BillingInterval::Yearly),
            other => Err(ValidationError::unsupported("interval", other)),
        }
    }
}
