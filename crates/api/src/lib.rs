//! Zeal API - client for the Zeal REST backend.
//!
//! Every page of the storefront and admin is rendered from data fetched
//! through this crate. It owns the bearer-token handling (one refresh, one
//! retry on `401`), error message extraction, multipart uploads and the
//! typed endpoints.
//!
//! ```no_run
//! # async fn demo() -> Result<(), zeal_api::ApiError> {
//! use zeal_api::{ApiClient, ApiConfig, MemoryTokenStore};
//!
//! let client = ApiClient::new(ApiConfig::default())?;
//! let store = MemoryTokenStore::new();
//! let orders = client.with(&store).list_orders().await?;
//! # let _ = orders;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod client;
pub mod config;
pub mod credentials;
pub mod envelope;
pub mod error;
pub mod multipart;
pub mod resources;
pub mod retry;
pub mod types;

pub use client::{Api, ApiClient, ApiRequest};
pub use config::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use credentials::{Anonymous, Credentials, MemoryTokenStore, TokenStore};
pub use error::ApiError;
pub use multipart::{FilePart, MultipartForm};
pub use resources::catalog::PRODUCT_DETAIL_TIMEOUT;
pub use resources::people::CONTACT_TIMEOUT;
pub use types::*;
