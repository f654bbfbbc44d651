//! Installer URLs for the current release.

use std::collections::HashMap;

use super::platform::Platform;

pub const DEFAULT_RELEASE_VERSION: &str = "1.0.0";

const DOWNLOAD_HOST: &str = "https://downloads.rinawarptech.com";

/// Per-platform installer URLs plus the release version they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadCatalog {
    version: String,
    urls: HashMap<Platform, String>,
}

impl DownloadCatalog {
    /// Catalog with an explicit URL per platform. Blank URLs are kept and
    /// reported as unconfigured by [`DownloadCatalog::url_for`].
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            urls: HashMap::new(),
        }
    }

    /// Catalog pointing at the public release bucket for `version`.
    pub fn release(version: impl Into<String>) -> Self {
        let version = version.into();
        let mut catalog = Self::new(version.clone());
        for platform in Platform::ALL {
            catalog.urls.insert(
                platform,
                format!(
                    "{}/RinaWarp-{}.{}",
                    DOWNLOAD_HOST,
                    version,
                    platform.installer_extension()
                ),
            );
        }
        catalog
    }

    pub fn with_url(mut self, platform: Platform, url: impl Into<String>) -> Self {
        self.urls.insert(platform, url.into());
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns `None` when the platform has no usable URL.
    pub fn url_for(&self, platform: Platform) -> Option<&str> {
        self.urls
            .get(&platform)
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
    }
}

impl Default for DownloadCatalog {
    fn default() -> Self {
        Self::release(DEFAULT_RELEASE_VERSION)
    }
}
