//! Long-lived API keys for the terminal client.

use crate::domain::foundation::{Timestamp, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub id: String,
    pub key: String,
    pub user_id: UserId,
    pub expires_at: Option<Timestamp>,
    pub last_used: Option<Timestamp>,
}

impl ApiKey {
    /// A key without an expiry never expires.
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        match self.expires_at {
            None => true,
            Some(expires_at) => expires_at.is_after(&now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(expires_at: Option<Timestamp>) -> ApiKey {
        ApiKey {
            id: "key_1".to_string(),
            key: "rw_live_abc".to_string(),
            user_id: UserId::new("user_1").unwrap(),
            expires_at,
            last_used: None,
        }
    }

    #[test]
    fn key_without_expiry_is_valid() {
        assert!(key(None).is_valid_at(Timestamp::now()));
    }

    #[test]
    fn expired_key_is_invalid() {
        let now = Timestamp::from_unix_secs(1_000);
        assert!(!key(Some(Timestamp::from_unix_secs(999))).is_valid_at(now));
        assert!(!key(Some(now)).is_valid_at(now));
        assert!(key(Some(Timestamp::from_unix_secs(1_001))).is_valid_at(now));
    }
}
