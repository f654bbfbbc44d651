//! Credential store ports: users, API keys and persisted sessions.

use async_trait::async_trait;

use crate::domain::account::{ApiKey, Session, User};
use crate::domain::foundation::{DomainError, Timestamp, UserId};

/// Read access to user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Resolves the user linked to a payment-provider customer.
    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Option<User>, DomainError>;
}

#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    async fn find_by_key(&self, key: &str) -> Result<Option<ApiKey>, DomainError>;

    async fn touch_last_used(&self, id: &str, at: Timestamp) -> Result<(), DomainError>;
}

/// Persisted sessions backing API bearer tokens.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), DomainError>;

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, DomainError>;
}
