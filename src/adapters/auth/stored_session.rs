//! Stored-session verification strategy.
//!
//! A token is accepted only when it verifies as a signed token AND matches a
//! live persisted session for the same user.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp};
use crate::ports::{SessionStore, SessionVerifier};

pub struct StoredSessionVerifier {
    signed: Arc<dyn SessionVerifier>,
    sessions: Arc<dyn SessionStore>,
}

impl StoredSessionVerifier {
    pub fn new(signed: Arc<dyn SessionVerifier>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { signed, sessions }
    }
}

#[async_trait]
impl SessionVerifier for StoredSessionVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let caller = self.signed.verify(token).await?;

        let session = self
            .sessions
            .find_by_token(token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Session lookup failed");
                AuthError::StoreUnavailable(e.to_string())
            })?
            .ok_or(AuthError::SessionNotFound)?;

        if session.user_id != caller.id {
            tracing::warn!(session_id = %session.id, "Session belongs to a different user");
            return Err(AuthError::InvalidToken);
        }
        if !session.is_live_at(Timestamp::now()) {
            return Err(AuthError::TokenExpired);
        }

        Ok(caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::JwtCodec;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::account::{Session, SessionClaims, TokenAudience};
    use crate::domain::foundation::UserId;
    use crate::ports::TokenSigner;

    const SECRET: &str = "a-test-secret-that-is-long-enough-000";

    fn uid() -> UserId {
        UserId::new("user_1").unwrap()
    }

    fn token() -> (String, SessionClaims) {
        let claims = SessionClaims::issue(TokenAudience::Api, &uid(), "a@b.co", Timestamp::now(), 24);
        (JwtCodec::new(SECRET, TokenAudience::Api).sign(&claims).unwrap(), claims)
    }

    fn verifier(store: &InMemoryStore) -> StoredSessionVerifier {
        StoredSessionVerifier::new(
            Arc::new(JwtCodec::new(SECRET, TokenAudience::Api)),
            Arc::new(store.clone()),
        )
    }

    #[tokio::test]
    async fn persisted_live_session_is_accepted() {
        let store = InMemoryStore::new();
        let (token, claims) = token();
        store
            .create(&Session::new(uid(), token.clone(), claims.expires_at()))
            .await
            .unwrap();

        let caller = verifier(&store).verify(&token).await.unwrap();
        assert_eq!(caller.id, uid());
    }

    #[tokio::test]
    async fn signed_token_without_session_is_rejected() {
        let store = InMemoryStore::new();
        let (token, _) = token();

        assert_eq!(
            verifier(&store).verify(&token).await,
            Err(AuthError::SessionNotFound)
        );
    }

    #[tokio::test]
    async fn expired_session_row_is_rejected() {
        let store = InMemoryStore::new();
        let (token, _) = token();
        store
            .create(&Session::new(uid(), token.clone(), Timestamp::from_unix_secs(1_000)))
            .await
            .unwrap();

        assert_eq!(verifier(&store).verify(&token).await, Err(AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn session_for_other_user_is_rejected() {
        let store = InMemoryStore::new();
        let (token, claims) = token();
        store
            .create(&Session::new(
                UserId::new("user_2").unwrap(),
                token.clone(),
                claims.expires_at(),
            ))
            .await
            .unwrap();

        assert_eq!(verifier(&store).verify(&token).await, Err(AuthError::InvalidToken));
    }
}
