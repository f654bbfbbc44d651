//! AuthenticateApiRequestHandler - Resolves the caller of a terminal API request.

use std::sync::Arc;

use crate::domain::account::User;
use crate::domain::foundation::{CredentialKind, Timestamp, UserId};
use crate::ports::{ApiKeyRepository, SessionVerifier, UserRepository};

/// Raw credentials taken from the request headers.
#[derive(Debug, Clone, Default)]
pub struct AuthenticateApiRequestQuery {
    /// `X-Api-Key` header.
    pub api_key: Option<String>,
    /// Token from `Authorization: Bearer <token>`.
    pub bearer_token: Option<String>,
}

/// Caller resolved from an API credential.
#[derive(Debug, Clone)]
pub struct ApiCaller {
    pub user: User,
    pub via: CredentialKind,
}

/// Tries the API key first, then the bearer token.
///
/// Returns `None` when no credential resolves to a user. Store and verifier
/// failures are logged and also resolve to `None`; callers decide how to
/// respond.
pub struct AuthenticateApiRequestHandler {
    api_keys: Arc<dyn ApiKeyRepository>,
    users: Arc<dyn UserRepository>,
    verifier: Arc<dyn SessionVerifier>,
}

impl AuthenticateApiRequestHandler {
    pub fn new(
        api_keys: Arc<dyn ApiKeyRepository>,
        users: Arc<dyn UserRepository>,
        verifier: Arc<dyn SessionVerifier>,
    ) -> Self {
        Self {
            api_keys,
            users,
            verifier,
        }
    }

    pub async fn handle(&self, query: AuthenticateApiRequestQuery) -> Option<ApiCaller> {
        let now = Timestamp::now();

        if let Some(key) = query.api_key.as_deref().filter(|k| !k.is_empty()) {
            if let Some(user) = self.by_api_key(key, now).await {
                return Some(ApiCaller {
                    user,
                    via: CredentialKind::ApiKey,
                });
            }
        }

        let token = query.bearer_token.as_deref().filter(|t| !t.is_empty())?;
        let user = self.by_bearer(token).await?;
        Some(ApiCaller {
            user,
            via: CredentialKind::BearerToken,
        })
    }

    async fn by_api_key(&self, key: &str, now: Timestamp) -> Option<User> {
        let api_key = match self.api_keys.find_by_key(key).await {
            Ok(Some(api_key)) if api_key.is_valid_at(now) => api_key,
            Ok(_) => return None,
            Err(e) => {
                tracing::error!(error = %e, "API key lookup failed");
                return None;
            }
        };

        if let Err(e) = self.api_keys.touch_last_used(&api_key.id, now).await {
            tracing::warn!(api_key_id = %api_key.id, error = %e, "Failed to record API key use");
        }

        self.load_user(&api_key.user_id).await
    }

    async fn by_bearer(&self, token: &str) -> Option<User> {
        match self.verifier.verify(token).await {
            Ok(caller) => self.load_user(&caller.id).await,
            Err(e) => {
                tracing::debug!(error = %e, "Bearer token rejected");
                None
            }
        }
    }

    async fn load_user(&self, id: &UserId) -> Option<User> {
        match self.users.find_by_id(id).await {
            Ok(user) => user,
            Err(e) => {
                tracing::error!(user_id = %id, error = %e, "User lookup failed");
                None
            }
        }
    }
}
