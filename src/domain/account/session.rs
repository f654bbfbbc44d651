//! Signed session tokens and their persisted counterpart.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, Timestamp, UserId};

/// Which entry point a token was minted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAudience {
    /// Browser cookie: `{userId, email}`.
    Cookie,
    /// Terminal API bearer: `{sub, email}`.
    Api,
}

/// JWT claims for both token flavors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn issue(
        audience: TokenAudience,
        user_id: &UserId,
        email: impl Into<String>,
        issued_at: Timestamp,
        ttl_hours: i64,
    ) -> Self {
        let (sub, user_id) = match audience {
            TokenAudience::Cookie => (None, Some(user_id.to_string())),
            TokenAudience::Api => (Some(user_id.to_string()), None),
        };
        Self {
            sub,
            user_id,
            email: email.into(),
            iat: issued_at.as_unix_secs(),
            exp: issued_at.plus_hours(ttl_hours).as_unix_secs(),
        }
    }

    /// The user the token was issued to, read only from the claim the
    /// given audience uses. A token minted for the other audience has none.
    pub fn subject_for(&self, audience: TokenAudience) -> Option<&str> {
        let claim = match audience {
            TokenAudience::Cookie => self.user_id.as_deref(),
            TokenAudience::Api => self.sub.as_deref(),
        };
        claim.filter(|s| !s.trim().is_empty())
    }

    pub fn expires_at(&self) -> Timestamp {
        Timestamp::from_unix_secs(self.exp)
    }
}

/// Persisted session backing an API bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub token: String,
    pub expires_at: Timestamp,
}

impl Session {
    pub fn new(user_id: UserId, token: impl Into<String>, expires_at: Timestamp) -> Self {
        Self {
            id: SessionId::new(),
            user_id,
            token: token.into(),
            expires_at,
        }
    }

    pub fn is_live_at(&self, now: Timestamp) -> bool {
        self.expires_at.is_after(&now)
    }
}
