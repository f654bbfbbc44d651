//! Shared helpers for the account handlers.

use std::sync::Arc;

use crate::domain::account::{Credentials, PasswordHasher, User, UserProfile};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{SubscriptionReader, UserRepository};

/// Looks up a user by email and checks the password.
///
/// Returns `Ok(None)` for an unknown email, a wrong password, or a stored
/// hash that cannot be parsed. Key derivation runs on the blocking pool.
pub(super) async fn check_credentials(
    users: &Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    credentials: &Credentials,
) -> Result<Option<User>, DomainError> {
    let Some(user) = users.find_by_email(&credentials.email).await? else {
        return Ok(None);
    };

    let hash = user.password_hash.clone();
    let password = credentials.password.clone();
    let verified = tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
        .await
        .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;

    match verified {
        Ok(true) => Ok(Some(user)),
        Ok(false) => Ok(None),
        Err(e) => {
            tracing::warn!(user_id = %user.id, error = %e, "Stored password hash rejected");
            Ok(None)
        }
    }
}

/// Builds the public profile, including the current subscription status.
pub(super) async fn load_profile(
    subscriptions: &Arc<dyn SubscriptionReader>,
    user: &User,
) -> Result<UserProfile, DomainError> {
    let subscription = subscriptions.find_by_user(&user.id).await?;
    Ok(UserProfile::new(user, subscription.as_ref().map(|s| &s.status)))
}
