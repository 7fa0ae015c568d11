//! Authentication extractors.
//!
//! A visitor is logged in when their session holds a backend token.
//! [`SessionTokenStore`] lends that token to the backend client, which
//! refreshes it once on `401` and wipes it when the backend refuses it.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::{ExposeSecret, SecretString};
use tower_sessions::Session;
use zeal_api::{Credentials, TokenStore};
use zeal_core::{Role, UserId};

/// Session keys.
pub mod session_keys {
    pub const TOKEN: &str = "token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const ROLE: &str = "role";
    pub const EMAIL: &str = "email";
    pub const USER_ID: &str = "user_id";
    pub const TOAST: &str = "toast";
    pub const FAVORITES: &str = "favoriteProducts";

    /// Removed on logout or when the backend rejects the token.
    pub const AUTH: [&str; 6] = [TOKEN, REFRESH_TOKEN, ROLE, EMAIL, USER_ID, FAVORITES];
}

/// [`TokenStore`] over the visitor's session.
#[derive(Debug, Clone)]
pub struct SessionTokenStore {
    session: Session,
}

impl SessionTokenStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.session.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(error = %e, key, "Failed to read session key");
                None
            }
        }
    }

    async fn write(&self, credentials: &Credentials) -> Result<(), tower_sessions::session::Error> {
        self.session
            .insert(session_keys::TOKEN, credentials.token.expose_secret())
            .await?;
        if let Some(refresh) = &credentials.refresh_token {
            self.session
                .insert(session_keys::REFRESH_TOKEN, refresh.expose_secret())
                .await?;
        } else {
            self.session
                .remove_value(session_keys::REFRESH_TOKEN)
                .await?;
        }
        self.session.insert(session_keys::ROLE, credentials.role).await?;
        self.session.insert(session_keys::EMAIL, &credentials.email).await?;
        self.session.insert(session_keys::USER_ID, &credentials.user_id).await?;
        Ok(())
    }
}

impl TokenStore for SessionTokenStore {
    async fn load(&self) -> Option<Credentials> {
        let token: String = self.get(session_keys::TOKEN).await?;
        Some(Credentials {
            token: SecretString::from(token),
            refresh_token: self
                .get::<String>(session_keys::REFRESH_TOKEN)
                .await
                .map(SecretString::from),
            role: self.get::<Role>(session_keys::ROLE).await.unwrap_or_default(),
            email: self.get::<Option<String>>(session_keys::EMAIL).await.flatten(),
            user_id: self
                .get::<Option<UserId>>(session_keys::USER_ID)
                .await
                .flatten(),
        })
    }

    async fn store(&self, credentials: Credentials) {
        if let Err(e) = self.write(&credentials).await {
            tracing::error!(error = %e, "Failed to store credentials in session");
        }
    }

    async fn clear(&self) {
        for key in session_keys::AUTH {
            if let Err(e) = self.session.remove_value(key).await {
                tracing::error!(error = %e, key, "Failed to clear session key");
            }
        }
    }
}

/// The logged-in customer.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub email: String,
    pub user_id: Option<UserId>,
    pub role: Role,
    store: SessionTokenStore,
}

impl CurrentUser {
    /// Credential store to bind the backend client to.
    #[must_use]
    pub const fn store(&self) -> &SessionTokenStore {
        &self.store
    }

    /// Short name for the header greeting.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }

    async fn from_session(session: Session) -> Option<Self> {
        let store = SessionTokenStore::new(session);
        let credentials = store.load().await?;
        Some(Self {
            email: credentials.email.unwrap_or_default(),
            user_id: credentials.user_id,
            role: credentials.role,
            store,
        })
    }
}

/// Extractor that requires a logged-in customer.
///
/// ```rust,ignore
/// async fn orders(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Xin chào {}", user.email)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

/// Extractor for pages that adapt to, but do not need, a login.
pub struct OptionalUser(pub Option<CurrentUser>);

/// Error returned when a login is required but absent.
pub enum AuthRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// Session layer missing from the stack.
    MissingSession,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::MissingSession => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::MissingSession)?;
        CurrentUser::from_session(session)
            .await
            .map(Self)
            .ok_or(AuthRejection::RedirectToLogin)
    }
}

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::MissingSession)?;
        Ok(Self(CurrentUser::from_session(session).await))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_clear_drops_credentials_and_favorites() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        session.insert(session_keys::TOKEN, "token-1").await.unwrap();
        session.insert(session_keys::ROLE, Role::User).await.unwrap();
        session.insert(session_keys::EMAIL, Some("khach@zeal.vn")).await.unwrap();
        session
            .insert(session_keys::FAVORITES, vec!["p1".to_owned()])
            .await
            .unwrap();
        session.insert(session_keys::TOAST, "giữ lại").await.unwrap();

        let store = SessionTokenStore::new(session.clone());
        assert!(store.load().await.is_some());
        store.clear().await;

        assert!(store.load().await.is_none());
        for key in session_keys::AUTH {
            let value: Option<serde_json::Value> = session.get(key).await.unwrap();
            assert!(value.is_none(), "{key} survived clear");
        }
        let toast: Option<String> = session.get(session_keys::TOAST).await.unwrap();
        assert_eq!(toast.as_deref(), Some("giữ lại"));
    }
}
