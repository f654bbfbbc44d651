//! Best-effort analytics port.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Download event posted to the analytics endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadEvent {
    /// Always `download`.
    pub event: &'static str,
    pub platform: String,
    pub version: String,
    pub user_agent: Option<String>,
    /// RFC 3339.
    pub timestamp: String,
    pub referer: Option<String>,
}

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("analytics request failed: {0}")]
    Transport(String),

    #[error("analytics endpoint returned {0}")]
    Rejected(u16),
}

/// Records product analytics. Failures must never affect the caller's
/// response; callers log and continue.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn record_download(&self, event: &DownloadEvent) -> Result<(), AnalyticsError>;
}
