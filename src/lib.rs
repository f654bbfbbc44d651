//! RinaWarp Site - account, checkout and subscription back end
//!
//! This crate serves the RinaWarp terminal website: credential login and
//! session cookies, terminal API authentication, hosted checkout, payment
//! provider webhook reconciliation, installer downloads and revenue
//! reporting.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
