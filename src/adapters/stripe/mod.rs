//! Stripe adapters.
//!
//! - `StripePaymentAdapter` - REST API client implementing `PaymentProvider`
//! - `MockPaymentProvider` - In-process provider for tests

mod mock_payment_provider;
mod stripe_adapter;

pub use mock_payment_provider::MockPaymentProvider;
pub use stripe_adapter::{checkout_form_params, StripeConfig, StripePaymentAdapter};
