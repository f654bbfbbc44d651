//! RinaWarp site server.

use std::sync::Arc;

use secrecy::ExposeSecret;
use thiserror::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rinawarp_site::adapters::analytics::HttpAnalyticsSink;
use rinawarp_site::adapters::auth::{JwtCodec, StoredSessionVerifier};
use rinawarp_site::adapters::http::{build_router, AppState, CookiePolicy};
use rinawarp_site::adapters::postgres::{
    self, PostgresAccountStore, PostgresBillingStore, PostgresRevenueReader,
};
use rinawarp_site::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use rinawarp_site::config::{AppConfig, BearerStrategy, LogFormat, ValidationError};
use rinawarp_site::domain::account::{PasswordHasher, TokenAudience};
use rinawarp_site::domain::billing::StripeWebhookVerifier;
use rinawarp_site::ports::{AnalyticsError, AnalyticsSink, PaymentError, SessionVerifier};

#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("payment provider client: {0}")]
    Payment(#[from] PaymentError),

    #[error("analytics client: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server terminated");
        std::process::exit(1);
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    match config.server.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init(),
    }
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    let pool = postgres::connect(&config.database).await?;
    if config.database.run_migrations {
        postgres::run_migrations(&pool).await?;
    }

    let accounts = Arc::new(PostgresAccountStore::new(pool.clone()));
    let billing = Arc::new(PostgresBillingStore::new(pool.clone()));
    let revenue = Arc::new(PostgresRevenueReader::new(pool));

    let jwt_secret = config.auth.jwt_secret.expose_secret();
    let jwt = Arc::new(JwtCodec::new(jwt_secret, TokenAudience::Cookie));
    let api_jwt = Arc::new(JwtCodec::new(jwt_secret, TokenAudience::Api));
    let bearer_verifier: Arc<dyn SessionVerifier> = match config.auth.bearer_strategy {
        BearerStrategy::Signed => api_jwt as Arc<dyn SessionVerifier>,
        BearerStrategy::Stored => Arc::new(StoredSessionVerifier::new(api_jwt, accounts.clone())),
    };

    let payment_provider = Arc::new(StripePaymentAdapter::new(
        StripeConfig::new(config.payment.stripe_api_key.clone())
            .with_timeout(config.payment.api_timeout()),
    )?);
    let webhook_verifier = Arc::new(
        StripeWebhookVerifier::new(config.payment.stripe_webhook_secret.expose_secret().clone())
            .with_tolerance(config.payment.webhook_tolerance_secs),
    );

    let analytics: Option<Arc<dyn AnalyticsSink>> = match config.downloads.analytics() {
        Some((url, key)) => {
            let sink = HttpAnalyticsSink::new(url, key.clone(), config.downloads.analytics_timeout())?;
            Some(Arc::new(sink) as Arc<dyn AnalyticsSink>)
        }
        None => None,
    };

    let state = AppState {
        users: accounts.clone(),
        subscriptions: billing.clone(),
        billing_store: billing,
        revenue,
        api_keys: accounts.clone(),
        sessions: accounts,
        payment_provider,
        webhook_verifier,
        token_signer: jwt.clone(),
        cookie_verifier: jwt,
        bearer_verifier,
        analytics,
        prices: Arc::new(config.payment.price_catalog()),
        downloads: Arc::new(config.downloads.catalog()),
        password_hasher: PasswordHasher::default(),
        app_url: config.payment.app_url.clone(),
        session_ttl_hours: config.auth.session_ttl_hours,
        cookies: CookiePolicy::new(config.auth.cookie_name.clone(), config.is_production()),
    };

    let app = build_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        stripe_test_mode = config.payment.is_test_mode(),
        "RinaWarp site listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
