//! HTTP adapter for authentication endpoints.
//!
//! - `POST /api/auth` - Credential login, sets the session cookie
//! - `GET /api/auth` - Session status
//! - `DELETE /api/auth` - Logout
//! - `POST /api/auth/token` - Terminal API token
//! - `GET /api/terminal/me` - Terminal caller profile

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::api_credentials;
pub use routes::{auth_routes, terminal_routes};
