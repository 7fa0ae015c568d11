//! Application state shared across handlers.

use std::sync::Arc;

use zeal_api::ApiClient;

use crate::config::{AdminConfig, ConfigError};

/// Application state shared across all handlers.
///
/// Holds no per-user data: each admin's credentials live in their session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: ApiClient,
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
    /// Create the state and its backend client.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the backend URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(config: AdminConfig) -> Result<Self, StateError> {
        let api = ApiClient::new(config.api_config()?)?;
        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Shared backend client. Bind it to the caller's session with
    /// [`ApiClient::with`].
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }
}
