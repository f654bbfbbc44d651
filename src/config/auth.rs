//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Session token configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret for session tokens
    pub jwt_secret: SecretString,

    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Verification strategy for terminal API bearer tokens
    #[serde(default)]
    pub bearer_strategy: BearerStrategy,
}

/// How bearer tokens on the terminal API are verified.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BearerStrategy {
    /// Signature and expiry only
    #[default]
    Signed,
    /// Must also match a live persisted session
    Stored,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: SecretString::new(jwt_secret.into()),
            session_ttl_hours: default_session_ttl_hours(),
            cookie_name: default_cookie_name(),
            bearer_strategy: BearerStrategy::default(),
        }
    }

    pub fn session_ttl_secs(&self) -> i64 {
        self.session_ttl_hours * 3600
    }

    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if environment == Environment::Production && secret.len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(ValidationError::JwtSecretTooShort);
        }
        if !(1..=720).contains(&self.session_ttl_hours) {
            return Err(ValidationError::InvalidSessionTtl);
        }
        let cookie_ok = !self.cookie_name.is_empty()
            && self
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !cookie_ok {
            return Err(ValidationError::InvalidCookieName);
        }
        Ok(())
    }
}

fn default_session_ttl_hours() -> i64 {
    24
}

fn default_cookie_name() -> String {
    "rinawarp_auth".to_string()
}
