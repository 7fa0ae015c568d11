//! Cached taxonomy lookups.
//!
//! Categories, brands and home banners change rarely and appear on most
//! pages, so they are cached in memory via `moka` (5 minute TTL). Products
//! are always fetched fresh for stock and price accuracy.

use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};
use zeal_api::{Anonymous, Api, ApiError, Banner, Brand, Category};

/// How long taxonomy lists stay cached.
pub const CATALOG_TTL: Duration = Duration::from_secs(300);

/// Cache key for taxonomy lists.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Categories,
    Brands,
    Banners,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Categories(Vec<Category>),
    Brands(Vec<Brand>),
    Banners(Vec<Banner>),
}

/// Shared cache handle (cheap to clone).
#[derive(Clone)]
pub struct CatalogCache {
    cache: Cache<CacheKey, CacheValue>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(CATALOG_TTL)
    }
}

impl CatalogCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder().max_capacity(16).time_to_live(ttl).build(),
        }
    }

    /// All categories, from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns the backend error on a cache miss that fails to load.
    #[instrument(skip(self, api))]
    pub async fn categories(&self, api: &Api<'_, Anonymous>) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) = self.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }
        let categories = api.list_categories().await?;
        self.cache
            .insert(CacheKey::Categories, CacheValue::Categories(categories.clone()))
            .await;
        Ok(categories)
    }

    /// All brands, from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns the backend error on a cache miss that fails to load.
    #[instrument(skip(self, api))]
    pub async fn brands(&self, api: &Api<'_, Anonymous>) -> Result<Vec<Brand>, ApiError> {
        if let Some(CacheValue::Brands(brands)) = self.cache.get(&CacheKey::Brands).await {
            debug!("Cache hit for brands");
            return Ok(brands);
        }
        let brands = api.list_brands().await?;
        self.cache
            .insert(CacheKey::Brands, CacheValue::Brands(brands.clone()))
            .await;
        Ok(brands)
    }

    /// Home page banners. A failed load yields no banners rather than an
    /// error page; the failure is not cached.
    #[instrument(skip(self, api))]
    pub async fn banners(&self, api: &Api<'_, Anonymous>) -> Vec<Banner> {
        if let Some(CacheValue::Banners(banners)) = self.cache.get(&CacheKey::Banners).await {
            return banners;
        }
        match api.banners().await {
            Ok(banners) => {
                self.cache
                    .insert(CacheKey::Banners, CacheValue::Banners(banners.clone()))
                    .await;
                banners
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load banners");
                Vec::new()
            }
        }
    }

    /// Drop every cached list.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Store a value directly.
    pub async fn prime(&self, key: CacheKey, value: CacheValue) {
        self.cache.insert(key, value).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use zeal_api::{ApiClient, ApiConfig, DEFAULT_TIMEOUT};

    use super::*;

    #[tokio::test]
    async fn test_primed_categories_skip_the_backend() {
        let cache = CatalogCache::default();
        let categories: Vec<Category> =
            serde_json::from_value(json!([{"_id": "c1", "name": "Áo"}])).unwrap();
        cache
            .prime(CacheKey::Categories, CacheValue::Categories(categories.clone()))
            .await;

        // Nothing listens on this port; a backend call would fail.
        let client =
            ApiClient::new(ApiConfig::new("http://127.0.0.1:9", DEFAULT_TIMEOUT).unwrap()).unwrap();
        let loaded = cache.categories(&client.anonymous()).await.unwrap();
        assert_eq!(loaded, categories);
    }

    #[tokio::test]
    async fn test_invalidate_all_forgets_values() {
        let cache = CatalogCache::new(Duration::from_secs(60));
        cache
            .prime(CacheKey::Brands, CacheValue::Brands(Vec::new()))
            .await;
        cache.invalidate_all();
        cache.cache.run_pending_tasks().await;
        assert!(cache.cache.get(&CacheKey::Brands).await.is_none());
    }
}
