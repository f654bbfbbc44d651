//! IssueApiTokenHandler - Command handler for terminal API token issuance.

use std::sync::Arc;

use thiserror::Error;

use super::credential_check::{check_credentials, load_profile};
use crate::domain::account::{
    Credentials, PasswordHasher, Session, SessionClaims, TokenAudience, UserProfile,
};
use crate::domain::foundation::{AuthError, DomainError, Timestamp};
use crate::ports::{SessionStore, SubscriptionReader, TokenSigner, UserRepository};

#[derive(Debug, Clone, Default)]
pub struct IssueApiTokenCommand {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiTokenIssued {
    pub token: String,
    pub profile: UserProfile,
}

#[derive(Debug, Error)]
pub enum ApiTokenError {
    /// Input failed validation; carries the field message.
    #[error("{0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Internal server error")]
    Internal(String),
}

impl From<DomainError> for ApiTokenError {
    fn from(err: DomainError) -> Self {
        ApiTokenError::Internal(err.to_string())
    }
}

impl From<AuthError> for ApiTokenError {
    fn from(err: AuthError) -> Self {
        ApiTokenError::Internal(err.to_string())
    }
}

/// Issues a bearer token with a `sub` claim and persists a matching session.
pub struct IssueApiTokenHandler {
    users: Arc<dyn UserRepository>,
    subscriptions: Arc<dyn SubscriptionReader>,
    sessions: Arc<dyn SessionStore>,
    signer: Arc<dyn TokenSigner>,
    hasher: PasswordHasher,
    ttl_hours: i64,
}

impl IssueApiTokenHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        subscriptions: Arc<dyn SubscriptionReader>,
        sessions: Arc<dyn SessionStore>,
        signer: Arc<dyn TokenSigner>,
        hasher: PasswordHasher,
        ttl_hours: i64,
    ) -> Self {
        Self {
            users,
            subscriptions,
            sessions,
            signer,
            hasher,
            ttl_hours,
        }
    }

    pub async fn handle(&self, cmd: IssueApiTokenCommand) -> Result<ApiTokenIssued, ApiTokenError> {
        let credentials = Credentials::for_api_token(cmd.email, cmd.password)
            .map_err(|e| ApiTokenError::Validation(e.to_string()))?;

        let user = check_credentials(&self.users, self.hasher, &credentials)
            .await?
            .ok_or(ApiTokenError::InvalidCredentials)?;

        let claims = SessionClaims::issue(
            TokenAudience::Api,
            &user.id,
            user.email.clone(),
            Timestamp::now(),
            self.ttl_hours,
        );
        let token = self.signer.sign(&claims)?;

        let session = Session::new(user.id.clone(), token.clone(), claims.expires_at());
        self.sessions.create(&session).await?;

        let profile = load_profile(&self.subscriptions, &user).await?;

        tracing::info!(user_id = %user.id, session_id = %session.id, "API token issued");

        Ok(ApiTokenIssued { token, profile })
    }
}
