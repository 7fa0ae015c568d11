//! `/api/news`, `/api/comments`, `/api/interfaces`.

use tracing::instrument;
use zeal_core::{CommentId, NewsId, ProductId};

use crate::ApiError;
use crate::client::{Api, ApiRequest};
use crate::credentials::TokenStore;
use crate::multipart::MultipartForm;
use crate::types::{Banner, Comment, NewComment, News};

impl<S: TokenStore> Api<'_, S> {
    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self))]
    pub async fn list_news(&self) -> Result<Vec<News>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/news")).await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self), fields(news_id = %id))]
    pub async fn get_news(&self, id: &NewsId) -> Result<News, ApiError> {
        self.fetch(ApiRequest::get(format!("/api/news/{id}"))).await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self, form))]
    pub async fn create_news(&self, form: &MultipartForm) -> Result<(), ApiError> {
        self.execute(ApiRequest::post("/api/news").multipart(form)).await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self, form), fields(news_id = %id))]
    pub async fn update_news(&self, id: &NewsId, form: &MultipartForm) -> Result<(), ApiError> {
        self.execute(ApiRequest::put(format!("/api/news/{id}")).multipart(form))
            .await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self), fields(news_id = %id))]
    pub async fn delete_news(&self, id: &NewsId) -> Result<(), ApiError> {
        self.execute(ApiRequest::delete(format!("/api/news/{id}"))).await
    }

    /// Every comment (admin moderation).
    ///
    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self))]
    pub async fn list_comments(&self) -> Result<Vec<Comment>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/comments")).await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self), fields(product_id = %product))]
    pub async fn product_comments(&self, product: &ProductId) -> Result<Vec<Comment>, ApiError> {
        self.fetch_list(ApiRequest::get(format!("/api/comments/product/{product}")))
            .await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self, comment), fields(product_id = %comment.product_id))]
    pub async fn create_comment(&self, comment: &NewComment) -> Result<(), ApiError> {
        self.execute(ApiRequest::post("/api/comments").json(comment)?)
            .await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self), fields(comment_id = %id))]
    pub async fn delete_comment(&self, id: &CommentId) -> Result<(), ApiError> {
        self.execute(ApiRequest::delete(format!("/api/comments/{id}")))
            .await
    }

    /// Home page banners.
    ///
    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self))]
    pub async fn banners(&self) -> Result<Vec<Banner>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/interfaces/banners"))
            .await
    }
}
