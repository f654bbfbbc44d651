//! Session cookie encoding and extraction.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};

/// How the session cookie is named and flagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePolicy {
    pub name: String,
    /// Adds `Secure`; enabled in production.
    pub secure: bool,
}

impl CookiePolicy {
    pub fn new(name: impl Into<String>, secure: bool) -> Self {
        Self {
            name: name.into(),
            secure,
        }
    }

    /// `Set-Cookie` value carrying a session token.
    pub fn session(&self, token: &str, max_age_secs: i64) -> String {
        self.render(token, max_age_secs)
    }

    /// `Set-Cookie` value that removes the session cookie.
    pub fn cleared(&self) -> String {
        self.render("", 0)
    }

    fn render(&self, value: &str, max_age_secs: i64) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
            self.name, value, max_age_secs
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Reads the session token from the request's `Cookie` headers.
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .map(|(_, value)| value.to_string())
            .filter(|value| !value.is_empty())
    }

    /// Appends a `Set-Cookie` header, skipping values that are not valid
    /// header text.
    pub fn append(headers: &mut HeaderMap, cookie: &str) {
        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                headers.append(SET_COOKIE, value);
            }
            Err(e) => tracing::error!(error = %e, "Refusing to emit malformed Set-Cookie"),
        }
    }
}
