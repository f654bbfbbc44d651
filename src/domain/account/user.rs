//! Site user accounts.

use serde::{Deserialize, Serialize};

use crate::domain::billing::SubscriptionStatus;
use crate::domain::foundation::UserId;

/// Status reported for users without a subscription row.
pub const NO_SUBSCRIPTION_STATUS: &str = "inactive";

/// A registered user. Accounts are created at signup, outside this service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// `hex(salt):hex(key)` scrypt hash.
    pub password_hash: String,
    pub name: Option<String>,
    /// Payment-provider customer, linked at first checkout.
    pub stripe_customer_id: Option<String>,
}

/// Public view of a user returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub subscription_status: String,
}

impl UserProfile {
    pub fn new(user: &User, status: Option<&SubscriptionStatus>) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            subscription_status: status
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| NO_SUBSCRIPTION_STATUS.to_string()),
        }
    }
}
