//! Account domain - users, credentials, sessions and access rules.

mod api_key;
mod credentials;
mod password;
pub mod route_gate;
mod session;
mod user;

pub use api_key::ApiKey;
pub use credentials::{Credentials, MIN_API_PASSWORD_LEN};
pub use password::{PasswordError, PasswordHasher};
pub use route_gate::GateDecision;
pub use session::{Session, SessionClaims, TokenAudience};
pub use user::{User, UserProfile, NO_SUBSCRIPTION_STATUS};
