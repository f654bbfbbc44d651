//! Path-based access decisions for pages and protected APIs.

/// Prefixes that require a valid session.
pub const PROTECTED_PREFIXES: [&str; 4] = ["/dashboard", "/settings", "/billing", "/api/terminal"];

/// Pages that only make sense when signed out.
pub const AUTH_PAGE_PREFIXES: [&str; 2] = ["/login", "/register"];

pub const DASHBOARD_PATH: &str = "/dashboard";
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToDashboard,
    /// Also clears the session cookie.
    RedirectToLogin,
}

/// Decides whether a request for `path` proceeds.
///
/// Prefixes match on the raw path, so `/dashboard/revenue` is protected.
pub fn decide(path: &str, authenticated: bool) -> GateDecision {
    if authenticated && AUTH_PAGE_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return GateDecision::RedirectToDashboard;
    }

    if !authenticated && is_protected(path) {
        return GateDecision::RedirectToLogin;
    }

    GateDecision::Allow
}

pub fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES.iter().any(|p| path.starts_with(p))
}
