//! HTTP adapters - REST API implementations.
//!
//! Each area has its own adapter module with DTOs, handlers and routes.
//! `build_router` assembles them behind the route gate.

pub mod account;
pub mod billing;
pub mod cookies;
pub mod downloads;
pub mod error;
pub mod middleware;
pub mod router;
pub mod state;

pub use cookies::CookiePolicy;
pub use error::{ApiError, ErrorBody};
pub use router::build_router;
pub use state::AppState;
