//! HTTP adapter for billing endpoints.
//!
//! - `POST /api/stripe/webhook` - Reconcile a signed provider event
//! - `POST /api/stripe/checkout` - Create a hosted checkout session
//! - `GET /dashboard/revenue` - Revenue summary for the dashboard

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{revenue_routes, stripe_routes};
