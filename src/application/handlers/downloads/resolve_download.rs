//! ResolveDownloadHandler - Maps a platform to its installer URL.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::Timestamp;
use crate::domain::release::{DownloadCatalog, Platform};
use crate::ports::{AnalyticsSink, DownloadEvent};

#[derive(Debug, Clone, Default)]
pub struct ResolveDownloadCommand {
    pub platform: String,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDownload {
    pub platform: Platform,
    pub url: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DownloadError {
    #[error("Platform not supported")]
    UnsupportedPlatform,

    #[error("Download URL not configured")]
    NotConfigured(Platform),
}

/// Resolves installer downloads and records a best-effort analytics event.
///
/// The analytics sink is optional; when present, its failures are logged and
/// never change the result.
pub struct ResolveDownloadHandler {
    catalog: DownloadCatalog,
    analytics: Option<Arc<dyn AnalyticsSink>>,
}

impl ResolveDownloadHandler {
    pub fn new(catalog: DownloadCatalog, analytics: Option<Arc<dyn AnalyticsSink>>) -> Self {
        Self { catalog, analytics }
    }

    pub async fn handle(&self, cmd: ResolveDownloadCommand) -> Result<ResolvedDownload, DownloadError> {
        let platform: Platform = cmd
            .platform
            .parse()
            .map_err(|_| DownloadError::UnsupportedPlatform)?;

        let url = match self.catalog.url_for(platform) {
            Some(url) => url.to_string(),
            None => {
                tracing::error!(platform = %platform, "Download URL not configured");
                return Err(DownloadError::NotConfigured(platform));
            }
        };

        if let Some(sink) = &self.analytics {
            let event = DownloadEvent {
                event: "download",
                platform: platform.as_str().to_string(),
                version: self.catalog.version().to_string(),
                user_agent: cmd.user_agent,
                timestamp: Timestamp::now().to_rfc3339(),
                referer: cmd.referer,
            };
            if let Err(e) = sink.record_download(&event).await {
                tracing::warn!(platform = %platform, error = %e, "Failed to track download");
            }
        }

        tracing::info!(platform = %platform, "Download redirect");
        Ok(ResolvedDownload { platform, url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::AnalyticsError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementation
    // ════════════════════════════════════════════════════════════════════════════

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<DownloadEvent>>,
        fail: bool,
    }

    #[async_trait]
    impl AnalyticsSink for RecordingSink {
        async fn record_download(&self, event: &DownloadEvent) -> Result<(), AnalyticsError> {
            self.events.lock().unwrap().push(event.clone());
            if self.fail {
                return Err(AnalyticsError::Rejected(503));
            }
            Ok(())
        }
    }

    fn cmd(platform: &str) -> ResolveDownloadCommand {
        ResolveDownloadCommand {
            platform: platform.to_string(),
            user_agent: Some("curl/8.0".to_string()),
            referer: None,
        }
    }

    #[tokio::test]
    async fn resolves_platform_case_insensitively() {
        let handler = ResolveDownloadHandler::new(DownloadCatalog::default(), None);
        let resolved = handler.handle(cmd("Windows")).await.unwrap();
        assert_eq!(resolved.platform, Platform::Windows);
        assert_eq!(resolved.url, "https://downloads.rinawarptech.com/RinaWarp-1.0.0.exe");
    }

    #[tokio::test]
    async fn unknown_platform_is_rejected() {
        let handler = ResolveDownloadHandler::new(DownloadCatalog::default(), None);
        let err = handler.handle(cmd("beos")).await.unwrap_err();
        assert_eq!(err.to_string(), "Platform not supported");
    }

    #[tokio::test]
    async fn blank_url_is_not_configured() {
        let catalog = DownloadCatalog::default().with_url(Platform::Linux, " ");
        let handler = ResolveDownloadHandler::new(catalog, None);
        let err = handler.handle(cmd("linux")).await.unwrap_err();
        assert_eq!(err, DownloadError::NotConfigured(Platform::Linux));
        assert_eq!(err.to_string(), "Download URL not configured");
    }

    #[tokio::test]
    async fn records_download_event() {
        let sink = Arc::new(RecordingSink::default());
        let handler = ResolveDownloadHandler::new(DownloadCatalog::default(), Some(sink.clone()));

        handler.handle(cmd("macos")).await.unwrap();

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "download");
        assert_eq!(events[0].platform, "macos");
        assert_eq!(events[0].version, "1.0.0");
        assert_eq!(events[0].user_agent.as_deref(), Some("curl/8.0"));
    }

    #[tokio::test]
    async fn analytics_failure_does_not_block() {
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        let handler = ResolveDownloadHandler::new(DownloadCatalog::default(), Some(sink));

        assert!(handler.handle(cmd("linux")).await.is_ok());
    }
}
