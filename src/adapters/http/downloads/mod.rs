//! HTTP adapter for installer downloads.
//!
//! - `GET /api/download/:platform` - Redirect to the installer for a platform

pub mod handlers;
pub mod routes;

pub use routes::download_routes;
