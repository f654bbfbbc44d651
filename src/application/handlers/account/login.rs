//! LoginHandler - Command handler for browser email/password login.

use std::sync::Arc;

use thiserror::Error;

use super::credential_check::{check_credentials, load_profile};
use crate::domain::account::{Credentials, PasswordHasher, SessionClaims, TokenAudience, UserProfile};
use crate::domain::foundation::{AuthError, DomainError, Timestamp};
use crate::ports::{SubscriptionReader, TokenSigner, UserRepository};

#[derive(Debug, Clone, Default)]
pub struct LoginCommand {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Successful login: the cookie token and the profile to return.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub profile: UserProfile,
    /// Cookie lifetime, matching the token expiry.
    pub max_age_secs: i64,
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Internal server error")]
    Internal(String),
}

impl From<DomainError> for LoginError {
    fn from(err: DomainError) -> Self {
        LoginError::Internal(err.to_string())
    }
}

impl From<AuthError> for LoginError {
    fn from(err: AuthError) -> Self {
        LoginError::Internal(err.to_string())
    }
}

/// Handler for cookie logins. The token is stateless; nothing is persisted.
pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    subscriptions: Arc<dyn SubscriptionReader>,
    signer: Arc<dyn TokenSigner>,
    hasher: PasswordHasher,
    ttl_hours: i64,
}

impl LoginHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        subscriptions: Arc<dyn SubscriptionReader>,
        signer: Arc<dyn TokenSigner>,
        hasher: PasswordHasher,
        ttl_hours: i64,
    ) -> Self {
        Self {
            users,
            subscriptions,
            signer,
            hasher,
            ttl_hours,
        }
    }

    pub async fn handle(&self, cmd: LoginCommand) -> Result<LoginResult, LoginError> {
        let credentials = Credentials::for_login(cmd.email, cmd.password)
            .map_err(|_| LoginError::MissingCredentials)?;

        let user = check_credentials(&self.users, self.hasher, &credentials)
            .await?
            .ok_or(LoginError::InvalidCredentials)?;

        let claims = SessionClaims::issue(
            TokenAudience::Cookie,
            &user.id,
            user.email.clone(),
            Timestamp::now(),
            self.ttl_hours,
        );
        let token = self.signer.sign(&claims)?;
        let profile = load_profile(&self.subscriptions, &user).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginResult {
            token,
            profile,
            max_age_secs: self.ttl_hours * 3600,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::JwtCodec;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::account::credential_check::fixtures::*;
    use crate::domain::billing::{test_snapshot, Subscription, SubscriptionStatus};
    use crate::domain::foundation::UserId;
    use crate::ports::SessionVerifier;

    fn codec() -> JwtCodec {
        JwtCodec::new("a-test-secret-that-is-long-enough-000", TokenAudience::Cookie)
    }

    fn handler(store: &InMemoryStore) -> LoginHandler {
        LoginHandler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(codec()),
            fast_hasher(),
            24,
        )
    }

    fn cmd(email: Option<&str>, password: Option<&str>) -> LoginCommand {
        LoginCommand {
            email: email.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn correct_credentials_issue_verifiable_token() {
        let store = seeded_store();

        let result = handler(&store)
            .handle(cmd(Some(EMAIL), Some(PASSWORD)))
            .await
            .unwrap();

        assert_eq!(result.max_age_secs, 86_400);
        assert_eq!(result.profile.subscription_status, "inactive");
        let user = codec().verify(&result.token).await.unwrap();
        assert_eq!(user.id.as_str(), "user_1");
        assert_eq!(user.email, EMAIL);
    }

    #[tokio::test]
    async fn profile_reports_subscription_status() {
        let store = seeded_store();
        let uid = UserId::new("user_1").unwrap();
        store.insert_subscription(Subscription::from_snapshot(
            uid,
            &test_snapshot(SubscriptionStatus::PastDue),
        ));

        let result = handler(&store)
            .handle(cmd(Some(EMAIL), Some(PASSWORD)))
            .await
            .unwrap();
        assert_eq!(result.profile.subscription_status, "past_due");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let store = seeded_store();
        let err = handler(&store)
            .handle(cmd(Some(EMAIL), Some("wrong password")))
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::InvalidCredentials));
        assert_eq!(err.to_string(), "Invalid email or password");
    }

    #[tokio::test]
    async fn unknown_email_is_rejected_the_same_way() {
        let store = seeded_store();
        let err = handler(&store)
            .handle(cmd(Some("nobody@example.com"), Some(PASSWORD)))
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::InvalidCredentials));
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let store = seeded_store();
        let err = handler(&store).handle(cmd(Some(EMAIL), None)).await.unwrap_err();
        assert_eq!(err.to_string(), "Email and password are required");
    }

    #[tokio::test]
    async fn malformed_stored_hash_is_invalid_credentials() {
        let store = InMemoryStore::new();
        store.add_user("user_2", "bob@example.com", "not-a-hash", None);

        let err = handler(&store)
            .handle(cmd(Some("bob@example.com"), Some(PASSWORD)))
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::InvalidCredentials));
    }
}
