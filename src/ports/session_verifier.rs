//! Session token ports.
//!
//! `TokenSigner` mints signed session tokens. `SessionVerifier` turns a raw
//! token back into an authenticated user. Two verifier strategies exist:
//! signed-token (stateless, signature and expiry only) and stored-session
//! (the token must also match a live persisted session).

use async_trait::async_trait;

use crate::domain::account::SessionClaims;
use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Signs session claims into a compact token.
pub trait TokenSigner: Send + Sync {
    fn sign(&self, claims: &SessionClaims) -> Result<String, AuthError>;
}

/// Verifies a session token and extracts the caller.
///
/// # Contract
///
/// Implementations must:
/// - Return `AuthError::InvalidToken` for malformed or badly signed tokens
///   and for tokens without a subject
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Return `AuthError::StoreUnavailable` for transient backing-store errors
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Verify a raw token (without any `Bearer ` prefix).
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
