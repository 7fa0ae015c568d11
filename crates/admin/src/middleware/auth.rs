//! Authentication extractors for admin.
//!
//! The admin's bearer credentials live in their session under the same keys
//! the storefront uses (`token`, `role`, `email`, ...). [`SessionTokenStore`]
//! exposes them to the backend client, which refreshes or clears them as
//! the backend dictates.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::{ExposeSecret, SecretString};
use tower_sessions::Session;
use zeal_api::{Credentials, TokenStore};
use zeal_core::{Role, UserId};

/// Session keys for auth state.
pub mod session_keys {
    pub const TOKEN: &str = "token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const ROLE: &str = "role";
    pub const EMAIL: &str = "email";
    pub const USER_ID: &str = "user_id";
    pub const TOAST: &str = "toast";

    /// Everything removed on logout or auth failure.
    pub const AUTH: [&str; 5] = [TOKEN, REFRESH_TOKEN, ROLE, EMAIL, USER_ID];
}

/// [`TokenStore`] backed by the visitor's session.
#[derive(Debug, Clone)]
pub struct SessionTokenStore {
    session: Session,
}

impl SessionTokenStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    async fn write(&self, credentials: &Credentials) -> Result<(), tower_sessions::session::Error> {
        self.session
            .insert(session_keys::TOKEN, credentials.token.expose_secret())
            .await?;
        match &credentials.refresh_token {
            Some(refresh) => {
                self.session
                    .insert(session_keys::REFRESH_TOKEN, refresh.expose_secret())
                    .await?;
            }
            None => {
                self.session
                    .remove_value(session_keys::REFRESH_TOKEN)
                    .await?;
            }
        }
        self.session
            .insert(session_keys::ROLE, credentials.role)
            .await?;
        self.session
            .insert(session_keys::EMAIL, &credentials.email)
            .await?;
        self.session
            .insert(session_keys::USER_ID, &credentials.user_id)
            .await?;
        Ok(())
    }
}

impl TokenStore for SessionTokenStore {
    async fn load(&self) -> Option<Credentials> {
        let token: String = self
            .session
            .get(session_keys::TOKEN)
            .await
            .ok()
            .flatten()?;
        let refresh_token: Option<String> = self
            .session
            .get(session_keys::REFRESH_TOKEN)
            .await
            .ok()
            .flatten();
        let role: Role = self
            .session
            .get(session_keys::ROLE)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        let email: Option<String> = self
            .session
            .get(session_keys::EMAIL)
            .await
            .ok()
            .flatten();
        let user_id: Option<UserId> = self
            .session
            .get(session_keys::USER_ID)
            .await
            .ok()
            .flatten();

        Some(Credentials {
            token: SecretString::from(token),
            refresh_token: refresh_token.map(SecretString::from),
            role,
            email,
            user_id,
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

/// The logged-in admin.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub email: String,
    store: SessionTokenStore,
}

impl CurrentAdmin {
    /// Credential store to bind the backend client to.
    #[must_use]
    pub const fn store(&self) -> &SessionTokenStore {
        &self.store
    }
}

/// Extractor that requires an admin session.
///
/// Sessions without a token, or whose token carries a non-admin role, are
/// redirected to the login page.
///
/// ```rust,ignore
/// async fn protected_handler(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
///     format!("Xin chào {}", admin.email)
/// }
/// ```
pub struct RequireAdmin(pub CurrentAdmin);

/// Error returned when an admin session is required but absent.
pub enum AdminAuthRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// Session layer missing from the stack.
    MissingSession,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::MissingSession => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AdminAuthRejection::MissingSession)?;
        let store = SessionTokenStore::new(session);

        let credentials = store
            .load()
            .await
            .ok_or(AdminAuthRejection::RedirectToLogin)?;
        if !credentials.is_admin() {
            tracing::warn!("Non-admin credentials in admin session");
            store.clear().await;
            return Err(AdminAuthRejection::RedirectToLogin);
        }

        Ok(Self(CurrentAdmin {
            email: credentials.email.unwrap_or_default(),
            store,
        }))
    }
}
