//! `/api/products`, `/api/categories`, `/api/brands`.
//!
//! Create and update take multipart bodies so image and logo files travel
//! with the text fields.

use std::time::Duration;

use tracing::instrument;
use zeal_core::{BrandId, CategoryId, ProductId};

use crate::ApiError;
use crate::client::{Api, ApiRequest};
use crate::credentials::TokenStore;
use crate::multipart::MultipartForm;
use crate::retry::{DEFAULT_BACKOFF, PRODUCT_DETAIL_ATTEMPTS, with_timeout_backoff};
use crate::types::{Brand, Category, Product};

/// Per-attempt timeout for the product detail page.
pub const PRODUCT_DETAIL_TIMEOUT: Duration = Duration::from_secs(8);

impl<S: TokenStore> Api<'_, S> {
    // =========================================================================
    // Products
    // =========================================================================

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/products")).await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.fetch(ApiRequest::get(format!("/api/products/{id}"))).await
    }

    /// Product detail with a short timeout, retried up to three times when
    /// the backend is slow to wake.
    ///
    /// # Errors
    ///
    /// [`ApiError::Timeout`] after the last attempt, or the first other error.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product_detail(&self, id: &ProductId) -> Result<Product, ApiError> {
        with_timeout_backoff(PRODUCT_DETAIL_ATTEMPTS, DEFAULT_BACKOFF, |_| {
            self.fetch(
                ApiRequest::get(format!("/api/products/{id}")).timeout(PRODUCT_DETAIL_TIMEOUT),
            )
        })
        .await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self, form))]
    pub async fn create_product(&self, form: &MultipartForm) -> Result<(), ApiError> {
        self.execute(ApiRequest::post("/api/products").multipart(form))
            .await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self, form), fields(product_id = %id))]
    pub async fn update_product(&self, id: &ProductId, form: &MultipartForm) -> Result<(), ApiError> {
        self.execute(ApiRequest::put(format!("/api/products/{id}")).multipart(form))
            .await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        self.execute(ApiRequest::delete(format!("/api/products/{id}")))
            .await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/categories")).await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn get_category(&self, id: &CategoryId) -> Result<Category, ApiError> {
        self.fetch(ApiRequest::get(format!("/api/categories/{id}")))
            .await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self, form))]
    pub async fn create_category(&self, form: &MultipartForm) -> Result<(), ApiError> {
        self.execute(ApiRequest::post("/api/categories").multipart(form))
            .await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self, form), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: &CategoryId,
        form: &MultipartForm,
    ) -> Result<(), ApiError> {
        self.execute(ApiRequest::put(format!("/api/categories/{id}")).multipart(form))
            .await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<(), ApiError> {
        self.execute(ApiRequest::delete(format!("/api/categories/{id}")))
            .await
    }

    // =========================================================================
    // Brands
    // =========================================================================

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self))]
    pub async fn list_brands(&self) -> Result<Vec<Brand>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/brands")).await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self), fields(brand_id = %id))]
    pub async fn get_brand(&self, id: &BrandId) -> Result<Brand, ApiError> {
        self.fetch(ApiRequest::get(format!("/api/brands/{id}"))).await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self, form))]
    pub async fn create_brand(&self, form: &MultipartForm) -> Result<(), ApiError> {
        self.execute(ApiRequest::post("/api/brands").multipart(form))
            .await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self, form), fields(brand_id = %id))]
    pub async fn update_brand(&self, id: &BrandId, form: &MultipartForm) -> Result<(), ApiError> {
        self.execute(ApiRequest::put(format!("/api/brands/{id}")).multipart(form))
            .await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self), fields(brand_id = %id))]
    pub async fn delete_brand(&self, id: &BrandId) -> Result<(), ApiError> {
        self.execute(ApiRequest::delete(format!("/api/brands/{id}")))
            .await
    }
}
