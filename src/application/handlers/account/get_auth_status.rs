//! GetAuthStatusHandler - Query handler for the browser session status.

use std::sync::Arc;

use super::credential_check::load_profile;
use crate::domain::account::UserProfile;
use crate::ports::{SessionVerifier, SubscriptionReader, UserRepository};

/// Query carrying the raw cookie token, if any.
#[derive(Debug, Clone, Default)]
pub struct GetAuthStatusQuery {
    pub token: Option<String>,
}

/// Session status. Every failure collapses into `Anonymous`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated(UserProfile),
    Anonymous,
}

impl AuthStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthStatus::Authenticated(_))
    }
}

pub struct GetAuthStatusHandler {
    verifier: Arc<dyn SessionVerifier>,
    users: Arc<dyn UserRepository>,
    subscriptions: Arc<dyn SubscriptionReader>,
}

impl GetAuthStatusHandler {
    pub fn new(
        verifier: Arc<dyn SessionVerifier>,
        users: Arc<dyn UserRepository>,
        subscriptions: Arc<dyn SubscriptionReader>,
    ) -> Self {
        Self {
            verifier,
            users,
            subscriptions,
        }
    }

    pub async fn handle(&self, query: GetAuthStatusQuery) -> AuthStatus {
        let Some(token) = query.token.filter(|t| !t.is_empty()) else {
            return AuthStatus::Anonymous;
        };

        let caller = match self.verifier.verify(&token).await {
            Ok(caller) => caller,
            Err(e) => {
                tracing::debug!(error = %e, "Session cookie rejected");
                return AuthStatus::Anonymous;
            }
        };

        let user = match self.users.find_by_id(&caller.id).await {
            Ok(Some(user)) => user,
            Ok(None) => return AuthStatus::Anonymous,
            Err(e) => {
                tracing::error!(user_id = %caller.id, error = %e, "User lookup failed");
                return AuthStatus::Anonymous;
            }
        };

        match load_profile(&self.subscriptions, &user).await {
            Ok(profile) => AuthStatus::Authenticated(profile),
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Subscription lookup failed");
                AuthStatus::Anonymous
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::JwtCodec;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::account::credential_check::fixtures::*;
    use crate::domain::account::{SessionClaims, TokenAudience};
    use crate::domain::foundation::{Timestamp, UserId};
    use crate::ports::TokenSigner;

    const SECRET: &str = "a-test-secret-that-is-long-enough-000";

    fn handler(store: &InMemoryStore) -> GetAuthStatusHandler {
        GetAuthStatusHandler::new(
            Arc::new(JwtCodec::new(SECRET, TokenAudience::Cookie)),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        )
    }

    fn token_for(user: &str, issued_at: Timestamp) -> String {
        let claims = SessionClaims::issue(
            TokenAudience::Cookie,
            &UserId::new(user).unwrap(),
            EMAIL,
            issued_at,
            24,
        );
        JwtCodec::new(SECRET, TokenAudience::Cookie).sign(&claims).unwrap()
    }

    #[tokio::test]
    async fn valid_cookie_is_authenticated() {
        let store = seeded_store();
        let status = handler(&store)
            .handle(GetAuthStatusQuery {
                token: Some(token_for("user_1", Timestamp::now())),
            })
            .await;

        match status {
            AuthStatus::Authenticated(profile) => assert_eq!(profile.id, "user_1"),
            AuthStatus::Anonymous => panic!("expected authenticated"),
        }
    }

    #[tokio::test]
    async fn missing_cookie_is_anonymous() {
        let store = seeded_store();
        assert_eq!(
            handler(&store).handle(GetAuthStatusQuery::default()).await,
            AuthStatus::Anonymous
        );
    }

    #[tokio::test]
    async fn garbage_token_is_anonymous() {
        let store = seeded_store();
        let status = handler(&store)
            .handle(GetAuthStatusQuery {
                token: Some("garbage".to_string()),
            })
            .await;
        assert!(!status.is_authenticated());
    }

    #[tokio::test]
    async fn expired_token_is_anonymous() {
        let store = seeded_store();
        let two_days_ago = Timestamp::from_unix_secs(Timestamp::now().as_unix_secs() - 48 * 3600);
        let status = handler(&store)
            .handle(GetAuthStatusQuery {
                token: Some(token_for("user_1", two_days_ago)),
            })
            .await;
        assert!(!status.is_authenticated());
    }

    #[tokio::test]
    async fn deleted_user_is_anonymous() {
        let store = seeded_store();
        let status = handler(&store)
            .handle(GetAuthStatusQuery {
                token: Some(token_for("user_gone", Timestamp::now())),
            })
            .await;
        assert!(!status.is_authenticated());
    }
}
