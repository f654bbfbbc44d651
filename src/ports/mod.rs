//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Billing Ports
//!
//! - `PaymentProvider` - Hosted checkout and subscription retrieval
//! - `SubscriptionReader` / `BillingStore` - Projection reads, atomic batch writes
//! - `RevenueReader` - Ledger aggregates for reporting
//!
//! ## Account Ports
//!
//! - `UserRepository`, `ApiKeyRepository`, `SessionStore` - Credential store
//! - `TokenSigner` / `SessionVerifier` - Session token issue and verification
//!
//! ## Analytics
//!
//! - `AnalyticsSink` - Best-effort event delivery

mod account_store;
mod analytics_sink;
mod billing_store;
mod payment_provider;
mod revenue_reader;
mod session_verifier;

pub use account_store::{ApiKeyRepository, SessionStore, UserRepository};
pub use analytics_sink::{AnalyticsError, AnalyticsSink, DownloadEvent};
pub use billing_store::{BillingBatch, BillingStore, BillingWrite, SubscriptionReader};
pub use payment_provider::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider,
};
pub use revenue_reader::RevenueReader;
pub use session_verifier::{SessionVerifier, TokenSigner};
