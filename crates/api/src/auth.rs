//! Login, registration and logout.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use zeal_core::{Email, Role, UserId};

use crate::client::{Api, ApiRequest};
use crate::credentials::{Credentials, TokenStore};
use crate::types::Registration;
use crate::ApiError;

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(alias = "accessToken")]
    token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    role: Option<Role>,
    #[serde(default)]
    user: Option<LoginUser>,
}

#[derive(Deserialize)]
struct LoginUser {
    #[serde(default, rename = "_id", alias = "id")]
    id: Option<UserId>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<Role>,
}

impl<S: TokenStore> Api<'_, S> {
    /// Log in and keep the issued credentials in the store.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] with the backend's message for wrong credentials.
    #[instrument(skip(self, email, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &SecretString) -> Result<Credentials, ApiError> {
        let request = ApiRequest::post("/api/auth/login").json(&LoginRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        })?;
        let response: LoginResponse = self.client().anonymous().fetch(request).await?;

        let user = response.user;
        let role = response
            .role
            .or_else(|| user.as_ref().and_then(|u| u.role))
            .unwrap_or_default();
        let credentials = Credentials {
            token: SecretString::from(response.token),
            refresh_token: response.refresh_token.map(SecretString::from),
            role,
            email: user
                .as_ref()
                .and_then(|u| u.email.clone())
                .or_else(|| Some(email.as_str().to_owned())),
            user_id: user.and_then(|u| u.id),
        };

        self.store().store(credentials.clone()).await;
        tracing::info!(role = %credentials.role, "Logged in");
        Ok(credentials)
    }

    /// Create an account. The user logs in separately afterwards.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] when the backend rejects the registration.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let request = ApiRequest::post("/api/auth/register").json(registration)?;
        self.client().anonymous().execute(request).await
    }

    /// Forget the stored credentials.
    pub async fn logout(&self) {
        self.store().clear().await;
    }

    /// Currently stored credentials.
    pub async fn credentials(&self) -> Option<Credentials> {
        self.store().load().await
    }
}
