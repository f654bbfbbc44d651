//! Authentication types for the domain layer.
//!
//! These types describe who is calling, independent of how they proved it
//! (session cookie, bearer token or API key). Verifier adapters populate
//! them through the `SessionVerifier` port.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::UserId;

/// Authenticated caller resolved from a verified credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// The account identifier.
    pub id: UserId,

    /// Email address bound into the credential.
    pub email: String,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

/// How the caller authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    SessionCookie,
    BearerToken,
    ApiKey,
}

/// Authentication errors that can occur during credential verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid token")]
    InvalidToken,

    /// The token signature is valid but it has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The token verified but no live persisted session backs it.
    #[error("Session not found")]
    SessionNotFound,

    /// Email/password pair did not match an account.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The credential verified but its user no longer exists.
    #[error("User not found")]
    UserNotFound,

    /// A backing store could not be reached.
    #[error("Auth store unavailable: {0}")]
    StoreUnavailable(String),

    /// Token could not be produced.
    #[error("Token signing failed: {0}")]
    Signing(String),
}

impl AuthError {
    /// Returns true if this error indicates the caller should log in again.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken
                | AuthError::TokenExpired
                | AuthError::SessionNotFound
                | AuthError::UserNotFound
        )
    }
}
