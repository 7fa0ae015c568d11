//! HTTP wrapper shared by every backend call.
//!
//! # Authentication
//!
//! Each call reads the caller's credentials from a [`TokenStore`] and sends
//! them as `Authorization: Bearer <token>`. A `401` triggers exactly one
//! refresh through `POST /api/auth/refresh` followed by one retry of the
//! original request. When the refresh fails or the retry is rejected again,
//! the store is cleared and [`ApiError::AuthExpired`] tells the caller to
//! send the user to login. A `403` clears the store immediately.
//!
//! Concurrent calls that hit a `401` each refresh on their own.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::ApiConfig;
use crate::credentials::{Anonymous, Credentials, TokenStore};
use crate::error::{GENERIC_ERROR_MESSAGE, extract_message};
use crate::multipart::MultipartForm;
use crate::{ApiError, envelope};

/// Refresh endpoint.
const REFRESH_PATH: &str = "/api/auth/refresh";

/// Client for the Zeal backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    config: ApiConfig,
}

/// Body of an outgoing request.
#[derive(Debug, Clone)]
pub enum RequestBody<'b> {
    Empty,
    Json(serde_json::Value),
    Multipart(&'b MultipartForm),
}

/// A request description that can be sent more than once.
#[derive(Debug, Clone)]
pub struct ApiRequest<'b> {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: RequestBody<'b>,
    timeout: Option<Duration>,
}

impl<'b> ApiRequest<'b> {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            timeout: None,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Parse`] if `body` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    #[must_use]
    pub fn multipart(mut self, form: &'b MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Append a query parameter. Blank values are dropped.
    #[must_use]
    pub fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.query.push((key, value));
        }
        self
    }

    /// Override the client-wide timeout for this request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    #[serde(alias = "accessToken")]
    token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl ApiClient {
    /// Create a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("zeal/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner { http, config }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Bind the client to one user's credential store.
    #[must_use]
    pub const fn with<'a, S: TokenStore>(&'a self, store: &'a S) -> Api<'a, S> {
        Api {
            client: self,
            store,
        }
    }

    /// Calls that need no credentials (catalog, news, login).
    #[must_use]
    pub const fn anonymous(&self) -> Api<'_, Anonymous> {
        Api {
            client: self,
            store: &Anonymous,
        }
    }

    /// Send one attempt of `request`.
    async fn dispatch(
        &self,
        request: &ApiRequest<'_>,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut url = self.inner.config.url(&request.path)?;
        if !request.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(request.query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        let mut builder = self.inner.http.request(request.method.clone(), url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(form) => builder.multipart(form.to_form()?),
        };

        Ok(builder.send().await?)
    }

    /// Exchange the current credentials for a new token.
    #[instrument(skip(self, current), fields(email = ?current.email))]
    async fn refresh(&self, current: &Credentials) -> Result<Credentials, ApiError> {
        let refresh_token = current.refresh_token.as_ref().map(|t| t.expose_secret());
        let request =
            ApiRequest::post(REFRESH_PATH).json(&RefreshRequest { refresh_token })?;

        let response = self.dispatch(&request, Some(current.bearer())).await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body: serde_json::Value = response.json().await?;
        let refreshed: RefreshResponse = envelope::decode(body)?;
        tracing::info!("Access token refreshed");

        Ok(current.refreshed(
            SecretString::from(refreshed.token),
            refreshed.refresh_token.map(SecretString::from),
        ))
    }
}

/// An [`ApiClient`] bound to one caller's credentials.
pub struct Api<'a, S> {
    client: &'a ApiClient,
    store: &'a S,
}

impl<S: TokenStore> Api<'_, S> {
    /// Send `request`, applying the refresh-once policy.
    ///
    /// # Errors
    ///
    /// - [`ApiError::AuthExpired`] after a failed refresh (store cleared)
    /// - [`ApiError::Forbidden`] on 403 (store cleared)
    /// - [`ApiError::Status`] for any other non-success status
    /// - [`ApiError::Timeout`] / [`ApiError::Http`] for transport failures
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send(&self, request: ApiRequest<'_>) -> Result<reqwest::Response, ApiError> {
        let credentials = self.store.load().await;
        let token = credentials.as_ref().map(Credentials::bearer);

        let mut response = self.client.dispatch(&request, token).await?;

        // Without credentials there is nothing to refresh; a 401 is then an
        // ordinary failure such as a wrong password.
        if response.status() == StatusCode::UNAUTHORIZED
            && let Some(current) = credentials.as_ref()
        {
            let refreshed = match self.client.refresh(current).await {
                Ok(refreshed) => refreshed,
                Err(e) => {
                    tracing::warn!(error = %e, "Token refresh failed, clearing credentials");
                    self.store.clear().await;
                    return Err(ApiError::AuthExpired);
                }
            };
            self.store.store(refreshed.clone()).await;

            response = self
                .client
                .dispatch(&request, Some(refreshed.bearer()))
                .await?;
            if response.status() == StatusCode::UNAUTHORIZED {
                tracing::warn!("Request rejected after refresh, clearing credentials");
                self.store.clear().await;
                return Err(ApiError::AuthExpired);
            }
        }

        if response.status() == StatusCode::FORBIDDEN {
            tracing::warn!("Backend returned 403, clearing credentials");
            self.store.clear().await;
            return Err(ApiError::Forbidden);
        }

        if !response.status().is_success() {
            let err = error_from_response(response).await;
            tracing::warn!(error = %err, "Backend request failed");
            return Err(err);
        }

        Ok(response)
    }

    /// Send and decode a JSON document.
    ///
    /// # Errors
    ///
    /// As [`Api::send`], plus [`ApiError::Parse`] for unexpected bodies.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest<'_>) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        envelope::decode(read_json(response).await?)
    }

    /// Send and decode a list; an empty body is an empty list.
    ///
    /// # Errors
    ///
    /// As [`Api::fetch`].
    pub async fn fetch_list<T: DeserializeOwned>(
        &self,
        request: ApiRequest<'_>,
    ) -> Result<Vec<T>, ApiError> {
        let response = self.send(request).await?;
        envelope::decode_list(read_json(response).await?)
    }

    /// Send and ignore the body.
    ///
    /// # Errors
    ///
    /// As [`Api::send`].
    pub async fn execute(&self, request: ApiRequest<'_>) -> Result<(), ApiError> {
        self.send(request).await.map(drop)
    }

    pub(crate) const fn client(&self) -> &ApiClient {
        self.client
    }

    pub(crate) const fn store(&self) -> &S {
        self.store
    }
}

async fn read_json(response: reqwest::Response) -> Result<serde_json::Value, ApiError> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

/// Turn a non-success response into [`ApiError::Status`].
async fn error_from_response(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = extract_message(&body).unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_owned());
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_multipart_replaces_json_body() {
        let form = MultipartForm::new().text("name", "Áo thun");
        let request = ApiRequest::post("/api/products")
            .json(&json!({"name": "cũ"}))
            .unwrap()
            .multipart(&form);

        assert!(matches!(request.body, RequestBody::Multipart(f) if std::ptr::eq(f, &form)));
    }

    #[test]
    fn test_blank_query_values_dropped() {
        let request = ApiRequest::get("/api/orders")
            .query("status", "  ")
            .query("page", "2");
        assert_eq!(request.query, vec![("page", "2".to_owned())]);
    }
}
