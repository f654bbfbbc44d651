//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `RINAWARP__` prefix and
//! `__` between nesting levels.
//!
//! # Example
//!
//! ```no_run
//! use rinawarp_site::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! println!("Listening on {}", config.server.socket_addr()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod auth;
mod database;
mod downloads;
mod error;
mod payment;
mod server;

pub use auth::{AuthConfig, BearerStrategy};
pub use database::DatabaseConfig;
pub use downloads::DownloadsConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub auth: AuthConfig,

    pub payment: PaymentConfig,

    #[serde(default)]
    pub downloads: DownloadsConfig,
}

impl AppConfig {
    /// Load and validate configuration from the environment.
    ///
    /// - `RINAWARP__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `RINAWARP__PAYMENT__PRO_YEARLY_PRICE_ID=price_...` -> `payment.pro_yearly_price_id`
    ///
    /// A `.env` file is read first when present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("RINAWARP")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Semantic checks across all sections; reports the first failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(self.server.environment)?;
        self.payment.validate(self.server.environment)?;
        self.downloads.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
