//! HTTP analytics sink.
//!
//! Posts each event as JSON with a bearer key. Delivery is best effort;
//! callers log failures and move on.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{AnalyticsError, AnalyticsSink, DownloadEvent};

pub struct HttpAnalyticsSink {
    endpoint: String,
    api_key: SecretString,
    http_client: reqwest::Client,
}

impl HttpAnalyticsSink {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, AnalyticsError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnalyticsError::Transport(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            api_key,
            http_client,
        })
    }
}

#[async_trait]
impl AnalyticsSink for HttpAnalyticsSink {
    async fn record_download(&self, event: &DownloadEvent) -> Result<(), AnalyticsError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(event)
            .send()
            .await
            .map_err(|e| AnalyticsError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %body, "Analytics API error");
            return Err(AnalyticsError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for HttpAnalyticsSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAnalyticsSink")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
