//! Email/password input validation.

use crate::domain::foundation::ValidationError;

/// Minimum password length accepted by the API token endpoint.
pub const MIN_API_PASSWORD_LEN: usize = 8;

/// Email/password pair submitted to a login endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Browser login: both fields must be present.
    pub fn for_login(email: Option<String>, password: Option<String>) -> Result<Self, ValidationError> {
        let email = email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ValidationError::empty_field("email"))?;
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ValidationError::empty_field("password"))?;
        Ok(Self { email, password })
    }

    /// API token request: a plausible email and a minimum-length password.
    pub fn for_api_token(email: Option<String>, password: Option<String>) -> Result<Self, ValidationError> {
        let creds = Self::for_login(email, password)?;
        let well_formed = creds
            .email
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && !domain.is_empty())
            .unwrap_or(false);
        if !well_formed {
            return Err(ValidationError::invalid_format("email", "must be an email address"));
        }
        if creds.password.chars().count() < MIN_API_PASSWORD_LEN {
            return Err(ValidationError::invalid_format(
                "password",
                "must be at least 8 characters",
            ));
        }
        Ok(creds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn login_requires_both_fields() {
        assert!(Credentials::for_login(None, some("pw")).is_err());
        assert!(Credentials::for_login(some("a@b.co"), some("")).is_err());
        assert!(Credentials::for_login(some("a@b.co"), some("pw")).is_ok());
    }

    #[test]
    fn api_token_validates_email_and_length() {
        assert!(Credentials::for_api_token(some("not-an-email"), some("longenough")).is_err());
        assert!(Credentials::for_api_token(some("a@b.co"), some("short")).is_err());
        assert!(Credentials::for_api_token(some("a@b.co"), some("longenough")).is_ok());
    }

    #[test]
    fn debug_redacts_password() {
        let creds = Credentials::for_login(some("a@b.co"), some("hunter2")).unwrap();
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
