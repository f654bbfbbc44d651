//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, auth types, errors)
//! - `billing` - Plans, subscription projection, provider events, ledgers and revenue
//! - `account` - Users, passwords, sessions, API keys and route gating
//! - `release` - Installer platforms and download URLs

pub mod account;
pub mod billing;
pub mod foundation;
pub mod release;
