//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresBillingStore` - Transactional batch commits and subscription reads
//! - `PostgresRevenueReader` - Ledger aggregates for the revenue dashboard
//! - `PostgresAccountStore` - Users, API keys and persisted sessions

mod account_store;
mod billing_store;
mod revenue_reader;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::domain::foundation::DomainError;

pub use account_store::PostgresAccountStore;
pub use billing_store::PostgresBillingStore;
pub use revenue_reader::PostgresRevenueReader;

/// Opens a connection pool sized from configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await
}

/// Applies the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}

/// Maps a sqlx error to a `DatabaseError` with context.
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::database(format!("{}: {}", context, e))
}
