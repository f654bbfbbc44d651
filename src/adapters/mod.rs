//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `analytics` - Download analytics sink (HTTP)
//! - `auth` - Session token signing and verification
//! - `http` - axum routes, middleware and application state
//! - `memory` - In-memory stores for tests and local runs
//! - `postgres` - PostgreSQL repositories
//! - `stripe` - Payment provider client and mock

pub mod analytics;
pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
