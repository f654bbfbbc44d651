//! Payment configuration

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;
use crate::domain::billing::{BillingInterval, PlanId, PriceCatalog, DEFAULT_TOLERANCE_SECS};

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    pub stripe_api_key: SecretString,

    /// Webhook signing secret (`whsec_...`)
    pub stripe_webhook_secret: SecretString,

    /// Public site origin used for checkout redirect URLs
    #[serde(default = "default_app_url")]
    pub app_url: String,

    /// Maximum age of a webhook signature timestamp, in seconds
    #[serde(default = "default_webhook_tolerance")]
    pub webhook_tolerance_secs: i64,

    /// Outbound Stripe API timeout, in seconds
    #[serde(default = "default_api_timeout")]
    pub api_timeout_secs: u64,

    pub pro_monthly_price_id: Option<String>,
    pub pro_yearly_price_id: Option<String>,
    pub turbo_monthly_price_id: Option<String>,
    pub turbo_yearly_price_id: Option<String>,
    pub business_monthly_price_id: Option<String>,
    pub business_yearly_price_id: Option<String>,
}

impl PaymentConfig {
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            stripe_api_key: SecretString::new(api_key.into()),
            stripe_webhook_secret: SecretString::new(webhook_secret.into()),
            app_url: default_app_url(),
            webhook_tolerance_secs: default_webhook_tolerance(),
            api_timeout_secs: default_api_timeout(),
            pro_monthly_price_id: None,
            pro_yearly_price_id: None,
            turbo_monthly_price_id: None,
            turbo_yearly_price_id: None,
            business_monthly_price_id: None,
            business_yearly_price_id: None,
        }
    }

    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_test_")
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    /// Configured prices. Unset or blank ids are left out.
    pub fn price_catalog(&self) -> PriceCatalog {
        let entries = [
            (PlanId::Pro, BillingInterval::Monthly, &self.pro_monthly_price_id),
            (PlanId::Pro, BillingInterval::Yearly, &self.pro_yearly_price_id),
            (PlanId::Turbo, BillingInterval::Monthly, &self.turbo_monthly_price_id),
            (PlanId::Turbo, BillingInterval::Yearly, &self.turbo_yearly_price_id),
            (PlanId::Business, BillingInterval::Monthly, &self.business_monthly_price_id),
            (PlanId::Business, BillingInterval::Yearly, &self.business_yearly_price_id),
        ];

        entries
            .into_iter()
            .fold(PriceCatalog::new(), |catalog, (plan, interval, price)| match price {
                Some(price) => catalog.with_price(plan, interval, price.clone()),
                None => catalog,
            })
    }

    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        let api_key = self.stripe_api_key.expose_secret();
        let webhook_secret = self.stripe_webhook_secret.expose_secret();

        if api_key.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__STRIPE_API_KEY"));
        }
        if webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__STRIPE_WEBHOOK_SECRET"));
        }
        if !api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }
        if !self.app_url.starts_with("http://") && !self.app_url.starts_with("https://") {
            return Err(ValidationError::InvalidAppUrl);
        }
        if environment == Environment::Production && !self.app_url.starts_with("https://") {
            return Err(ValidationError::AppUrlMustBeHttps);
        }
        if self.webhook_tolerance_secs <= 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

fn default_app_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_webhook_tolerance() -> i64 {
    DEFAULT_TOLERANCE_SECS
}

fn default_api_timeout() -> u64 {
    30
}
