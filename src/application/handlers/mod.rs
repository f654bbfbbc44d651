//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod account;
pub mod billing;
pub mod downloads;

pub use account::{
    ApiCaller, ApiTokenError, ApiTokenIssued, AuthStatus, AuthenticateApiRequestHandler,
    AuthenticateApiRequestQuery, GetAuthStatusHandler, GetAuthStatusQuery, IssueApiTokenCommand,
    IssueApiTokenHandler, LoginCommand, LoginError, LoginHandler, LoginResult,
};
pub use billing::{
    CheckoutError, CreateCheckoutCommand, CreateCheckoutHandler, GetRevenueSummaryHandler,
    GetRevenueSummaryQuery, ReconcileOutcome, ReconcileWebhookCommand, ReconcileWebhookHandler,
};
pub use downloads::{DownloadError, ResolveDownloadCommand, ResolveDownloadHandler, ResolvedDownload};
