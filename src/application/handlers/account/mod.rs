//! Account handlers.
//!
//! ## Commands
//! - Browser login (cookie token)
//! - Terminal API token issuance (persisted session)
//!
//! ## Queries
//! - Browser session status
//! - Terminal API caller resolution

mod authenticate_api_request;
mod credential_check;
mod get_auth_status;
mod issue_api_token;
mod login;

// Commands
pub use issue_api_token::{ApiTokenError, ApiTokenIssued, IssueApiTokenCommand, IssueApiTokenHandler};
pub use login::{LoginCommand, LoginError, LoginHandler, LoginResult};

// Queries
pub use authenticate_api_request::{ApiCaller, AuthenticateApiRequestHandler, AuthenticateApiRequestQuery};
pub use get_auth_status::{AuthStatus, GetAuthStatusHandler, GetAuthStatusQuery};
