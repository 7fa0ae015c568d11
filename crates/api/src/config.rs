//! Backend connection settings.

use std::time::Duration;

use url::Url;

use crate::ApiError;

/// Production backend.
pub const DEFAULT_BASE_URL: &str = "https://api-zeal.onrender.com";

/// Default whole-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Where the backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL, always ending in `/` so relative paths join under it.
    pub base_url: Url,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Parse a base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Url`] if `base_url` is not an absolute URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url.trim())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url, timeout })
    }

    /// Resolve an API path (`/api/orders`, `api/orders`) against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Url`] if the joined URL is invalid.
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://api-zeal.onrender.com/")
                .unwrap_or_else(|_| unreachable!("default base URL is valid")),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
