//! Authentication route handlers for admin.
//!
//! Login goes through the backend; only accounts whose role is `admin` are
//! let in. Anything else is logged straight back out.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use zeal_api::TokenStore;
use zeal_core::{Email, ToastView};

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{Notifier, SessionTokenStore};
use crate::routes::render;
use crate::state::AppState;

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate {
    toast: ToastView,
    email: String,
}

/// Login form input.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login
async fn login_page(session: Session, notifier: Notifier) -> Response {
    // Already logged in as admin: skip the form.
    let store = SessionTokenStore::new(session);
    if store.load().await.is_some_and(|c| c.is_admin()) {
        return Redirect::to("/").into_response();
    }

    let template = LoginPageTemplate {
        toast: notifier.take_view().await,
        email: String::new(),
    };
    let html: Html<String> = render(&template);
    html.into_response()
}

/// Log in through the backend.
///
/// POST /auth/login
#[instrument(skip(state, session, notifier, form), fields(email = %form.email))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    notifier: Notifier,
    Form(form): Form<LoginForm>,
) -> Redirect {
    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(e) => {
            notifier.error(e.user_message()).await;
            return Redirect::to("/auth/login");
        }
    };
    if form.password.is_empty() {
        notifier.error("Vui lòng nhập mật khẩu").await;
        return Redirect::to("/auth/login");
    }

    // Fresh session ID before credentials are written to it.
    if let Err(e) = session.cycle_id().await {
        tracing::error!(error = %e, "Failed to cycle session id");
    }

    let store = SessionTokenStore::new(session);
    let password = SecretString::from(form.password);
    match state.api().with(&store).login(&email, &password).await {
        Ok(credentials) if credentials.is_admin() => {
            set_sentry_user(email.as_str());
            tracing::info!("Admin logged in");
            notifier.success("Đăng nhập thành công").await;
            Redirect::to("/")
        }
        Ok(_) => {
            tracing::warn!("Non-admin account attempted admin login");
            store.clear().await;
            notifier
                .error("Tài khoản không có quyền truy cập trang quản trị")
                .await;
            Redirect::to("/auth/login")
        }
        Err(e) => {
            tracing::warn!(error = %e, "Admin login failed");
            notifier.error(e.user_message()).await;
            Redirect::to("/auth/login")
        }
    }
}

/// Logout and clear credentials.
///
/// POST /auth/logout
async fn logout(State(state): State<AppState>, session: Session, notifier: Notifier) -> Redirect {
    let store = SessionTokenStore::new(session);
    state.api().with(&store).logout().await;
    clear_sentry_user();
    notifier.success("Đã đăng xuất").await;
    Redirect::to("/auth/login")
}
