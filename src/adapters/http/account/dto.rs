//! HTTP DTOs for the authentication endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{AuthStatus, IssueApiTokenCommand, LoginCommand};
use crate::domain::account::UserProfile;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/auth` and `POST /api/auth/token`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl From<CredentialsRequest> for LoginCommand {
    fn from(req: CredentialsRequest) -> Self {
        LoginCommand {
            email: req.email,
            password: req.password,
        }
    }
}

impl From<CredentialsRequest> for IssueApiTokenCommand {
    fn from(req: CredentialsRequest) -> Self {
        IssueApiTokenCommand {
            email: req.email,
            password: req.password,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatusResponse {
    pub is_authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl From<AuthStatus> for AuthStatusResponse {
    fn from(status: AuthStatus) -> Self {
        match status {
            AuthStatus::Authenticated(profile) => Self {
                is_authenticated: true,
                user: Some(profile),
            },
            AuthStatus::Anonymous => Self {
                is_authenticated: false,
                user: None,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: UserProfile,
}
