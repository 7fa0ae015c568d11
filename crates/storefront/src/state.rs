//! Application state shared across handlers.

use std::sync::Arc;

use zeal_api::ApiClient;

use crate::catalog::CatalogCache;
use crate::config::{ConfigError, StorefrontConfig};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Visitor credentials are not kept here; they
/// live in each visitor's session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    catalog: CatalogCache,
}

/// Errors building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("backend client: {0}")]
    Client(#[from] zeal_api::ApiError),
}

impl AppState {
    /// Create the state, its backend client and the taxonomy cache.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the backend URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let api = ApiClient::new(config.api_config()?)?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                catalog: CatalogCache::default(),
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Shared backend client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Cached categories, brands and banners.
    #[must_use]
    pub fn catalog(&self) -> &CatalogCache {
        &self.inner.catalog
    }
}
