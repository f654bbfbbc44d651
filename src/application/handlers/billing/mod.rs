//! Billing handlers.
//!
//! ## Commands
//! - Starting hosted checkout sessions
//! - Reconciling provider webhooks into local subscription state
//!
//! ## Queries
//! - Revenue summary for the dashboard

mod create_checkout;
mod get_revenue_summary;
mod reconcile_webhook;

// Commands
pub use create_checkout::{CheckoutError, CreateCheckoutCommand, CreateCheckoutHandler};
pub use reconcile_webhook::{ReconcileOutcome, ReconcileWebhookCommand, ReconcileWebhookHandler};

// Queries
pub use get_revenue_summary::{GetRevenueSummaryHandler, GetRevenueSummaryQuery};
