//! Download and analytics configuration

use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::release::{DownloadCatalog, Platform, DEFAULT_RELEASE_VERSION};

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadsConfig {
    /// Release version reported to analytics
    #[serde(default = "default_version")]
    pub version: String,

    /// Per-platform overrides; unset platforms use the release bucket URL
    pub macos_url: Option<String>,
    pub windows_url: Option<String>,
    pub linux_url: Option<String>,

    /// Analytics is enabled only when both URL and key are set
    pub analytics_url: Option<String>,
    pub analytics_key: Option<SecretString>,

    #[serde(default = "default_analytics_timeout")]
    pub analytics_timeout_secs: u64,
}

impl DownloadsConfig {
    pub fn catalog(&self) -> DownloadCatalog {
        let overrides = [
            (Platform::MacOs, &self.macos_url),
            (Platform::Windows, &self.windows_url),
            (Platform::Linux, &self.linux_url),
        ];
        overrides
            .into_iter()
            .fold(DownloadCatalog::release(self.version.clone()), |catalog, (platform, url)| {
                match url {
                    Some(url) => catalog.with_url(platform, url.clone()),
                    None => catalog,
                }
            })
    }

    /// Endpoint and key when analytics is fully configured.
    pub fn analytics(&self) -> Option<(&str, &SecretString)> {
        let url = self.analytics_url.as_deref().filter(|u| !u.is_empty())?;
        let key = self.analytics_key.as_ref()?;
        Some((url, key))
    }

    pub fn analytics_timeout(&self) -> Duration {
        Duration::from_secs(self.analytics_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let urls = [
            ("DOWNLOADS__MACOS_URL", &self.macos_url),
            ("DOWNLOADS__WINDOWS_URL", &self.windows_url),
            ("DOWNLOADS__LINUX_URL", &self.linux_url),
            ("DOWNLOADS__ANALYTICS_URL", &self.analytics_url),
        ];
        for (name, url) in urls {
            if let Some(url) = url.as_deref().filter(|u| !u.is_empty()) {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ValidationError::InvalidUrl(name));
                }
            }
        }
        Ok(())
    }
}

impl Default for DownloadsConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            macos_url: None,
            windows_url: None,
            linux_url: None,
            analytics_url: None,
            analytics_key: None,
            analytics_timeout_secs: default_analytics_timeout(),
        }
    }
}

fn default_version() -> String {
    DEFAULT_RELEASE_VERSION.to_string()
}

fn default_analytics_timeout() -> u64 {
    5
}
