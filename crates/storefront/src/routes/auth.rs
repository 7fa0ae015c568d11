//! Customer login, registration and logout.
//!
//! Credentials live in the session; see [`SessionTokenStore`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use zeal_api::Registration;
use zeal_core::Email;
use zeal_core::listing::non_blank;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{Notifier, OptionalUser, SessionTokenStore};
use crate::routes::Layout;
use crate::state::AppState;

/// Shortest accepted password.
pub const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    pub phone: Option<String>,
}

impl RegisterForm {
    /// Check the form before it reaches the backend.
    ///
    /// # Errors
    ///
    /// Returns the message for the first invalid field.
    pub fn validate(&self) -> std::result::Result<Registration, &'static str> {
        let username = non_blank(Some(self.username.as_str())).ok_or("Vui lòng nhập tên người dùng")?;
        let email = Email::parse(&self.email).map_err(|e| e.user_message())?;
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err("Mật khẩu phải có ít nhất 6 ký tự");
        }
        if self.password != self.confirm_password {
            return Err("Mật khẩu xác nhận không khớp");
        }
        let phone = non_blank(self.phone.as_deref());
        if phone.is_some_and(|p| !is_phone_number(p)) {
            return Err("Số điện thoại không hợp lệ");
        }
        Ok(Registration {
            username: username.to_owned(),
            email: email.into_inner(),
            password: self.password.clone(),
            phone: phone.map(str::to_owned),
        })
    }
}

/// 9-11 digits, optionally starting with `+`.
fn is_phone_number(raw: &str) -> bool {
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    (9..=11).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

/// GET /auth/login
pub async fn login_page(OptionalUser(user): OptionalUser, session: Session) -> Response {
    if user.is_some() {
        return Redirect::to("/account/orders").into_response();
    }
    LoginTemplate {
        layout: Layout::new(None, &session, "/auth/login").await,
    }
    .into_response()
}

/// POST /auth/login
#[instrument(skip(state, session, notifier, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    notifier: Notifier,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let email =
        Email::parse(&form.email).map_err(|e| AppError::rejected(e.user_message(), "/auth/login"))?;
    if form.password.is_empty() {
        return Err(AppError::rejected("Vui lòng nhập mật khẩu", "/auth/login"));
    }

    // Fresh session ID before credentials are written to it.
    if let Err(e) = session.cycle_id().await {
        tracing::error!(error = %e, "Failed to cycle session id");
    }

    let store = SessionTokenStore::new(session);
    let password = SecretString::from(form.password);
    match state.api().with(&store).login(&email, &password).await {
        Ok(credentials) => {
            set_sentry_user(
                credentials.user_id.as_ref().map(|id| id.as_str()),
                email.as_str(),
            );
            tracing::info!("Customer logged in");
            notifier.success("Đăng nhập thành công").await;
            Ok(Redirect::to("/"))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Customer login failed");
            Err(AppError::rejected(e.user_message(), "/auth/login"))
        }
    }
}

/// GET /auth/register
pub async fn register_page(OptionalUser(user): OptionalUser, session: Session) -> Response {
    if user.is_some() {
        return Redirect::to("/").into_response();
    }
    RegisterTemplate {
        layout: Layout::new(None, &session, "/auth/register").await,
    }
    .into_response()
}

/// POST /auth/register
#[instrument(skip(state, notifier, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    notifier: Notifier,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect> {
    let registration = form
        .validate()
        .map_err(|message| AppError::rejected(message, "/auth/register"))?;

    state
        .api()
        .anonymous()
        .register(&registration)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Registration failed");
            AppError::rejected(e.user_message(), "/auth/register")
        })?;

    tracing::info!("Customer registered");
    notifier
        .success("Đăng ký thành công, vui lòng đăng nhập")
        .await;
    Ok(Redirect::to("/auth/login"))
}

/// POST /auth/logout
pub async fn logout(State(state): State<AppState>, session: Session, notifier: Notifier) -> Redirect {
    let store = SessionTokenStore::new(session);
    state.api().with(&store).logout().await;
    clear_sentry_user();
    notifier.success("Đã đăng xuất").await;
    Redirect::to("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> RegisterForm {
        RegisterForm {
            username: "lan".into(),
            email: "Lan@Example.vn".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            phone: Some("0901234567".into()),
        }
    }

    #[test]
    fn test_valid_registration() {
        let registration = form().validate().unwrap();
        assert_eq!(registration.username, "lan");
        assert_eq!(registration.phone.as_deref(), Some("0901234567"));
    }

    #[test]
    fn test_short_or_mismatched_password() {
        let mut f = form();
        f.password = "12345".into();
        f.confirm_password = "12345".into();
        assert_eq!(f.validate().err(), Some("Mật khẩu phải có ít nhất 6 ký tự"));

        let mut f = form();
        f.confirm_password = "secret2".into();
        assert_eq!(f.validate().err(), Some("Mật khẩu xác nhận không khớp"));
    }

    #[test]
    fn test_phone_is_optional_but_checked() {
        let mut f = form();
        f.phone = Some("  ".into());
        assert_eq!(f.validate().unwrap().phone, None);

        f.phone = Some("09-123".into());
        assert_eq!(f.validate().err(), Some("Số điện thoại không hợp lệ"));
    }
}
