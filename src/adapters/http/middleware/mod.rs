//! HTTP middleware for axum.
//!
//! - `route_gate` - Cookie-based access control for pages and protected APIs

pub mod route_gate;

pub use route_gate::route_gate;
