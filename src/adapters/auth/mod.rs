//! Authentication adapters.
//!
//! Implementations of the `TokenSigner` and `SessionVerifier` ports:
//!
//! - `jwt` - HS256 codec; the signed-token (stateless) strategy
//! - `stored_session` - Signed token that must also match a persisted session

mod jwt;
mod stored_session;

pub use jwt::JwtCodec;
pub use stored_session::StoredSessionVerifier;
