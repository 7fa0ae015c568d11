//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Failed form actions go back
//! to the form with an error toast; backend auth failures go to the login
//! page (the client has already cleared the session's token by then);
//! everything else renders an error page without internal details.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;
use zeal_api::ApiError;
use zeal_core::{Toast, TransitionError};

use crate::filters;
use crate::routes::Layout;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// A form action was refused; show `message` on `back`.
    #[error("Rejected: {message}")]
    Rejected { message: String, back: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn rejected(message: impl Into<String>, back: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            back: back.into(),
        }
    }

    fn is_server_error(&self) -> bool {
        match self {
            Self::Internal(_) => true,
            Self::Api(e) => !e.is_auth() && !e.is_not_found() && !e.is_timeout(),
            Self::Rejected { .. } | Self::NotFound(_) => false,
        }
    }
}

/// Error page.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
struct ErrorTemplate {
    layout: Layout,
    code: u16,
    message: String,
}

fn error_page(status: StatusCode, message: impl Into<String>) -> Response {
    let page = ErrorTemplate {
        layout: Layout::bare(),
        code: status.as_u16(),
        message: message.into(),
    };
    (status, page).into_response()
}

/// Redirect carrying a toast for the next page.
fn redirect_with_toast(to: &str, toast: Toast) -> Response {
    let mut response = Redirect::to(to).into_response();
    response.extensions_mut().insert(toast);
    response
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        match self {
            Self::Api(e) if e.is_auth() => {
                redirect_with_toast("/auth/login", Toast::error(e.user_message()))
            }
            Self::Rejected { message, back } => redirect_with_toast(&back, Toast::error(message)),
            Self::Api(e) if e.is_not_found() => {
                error_page(StatusCode::NOT_FOUND, "Không tìm thấy trang bạn yêu cầu")
            }
            Self::NotFound(what) => {
                error_page(StatusCode::NOT_FOUND, format!("Không tìm thấy {what}"))
            }
            Self::Api(e) if e.is_timeout() => error_page(StatusCode::GATEWAY_TIMEOUT, e.user_message()),
            Self::Api(e) => error_page(StatusCode::BAD_GATEWAY, e.user_message()),
            // Don't expose internal error details to clients
            Self::Internal(_) => error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Đã xảy ra lỗi, vui lòng thử lại sau",
            ),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Turn a failed action into a redirect back to `back` with an error toast.
///
/// Backend auth failures keep their login redirect.
pub trait OrRedirect<T> {
    /// # Errors
    ///
    /// Returns the mapped `AppError` when `self` is an error.
    fn or_redirect(self, back: &str) -> Result<T>;
}

impl<T> OrRedirect<T> for std::result::Result<T, ApiError> {
    fn or_redirect(self, back: &str) -> Result<T> {
        self.map_err(|e| {
            if e.is_auth() {
                AppError::Api(e)
            } else {
                tracing::warn!(error = %e, "Backend rejected action");
                AppError::rejected(e.user_message(), back)
            }
        })
    }
}

impl<T> OrRedirect<T> for std::result::Result<T, TransitionError> {
    fn or_redirect(self, back: &str) -> Result<T> {
        self.map_err(|e| {
            tracing::info!(error = %e, "Order change refused");
            AppError::rejected(e.user_message(), back)
        })
    }
}

/// Set the Sentry user context after login.
pub fn set_sentry_user(user_id: Option<&str>, email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: user_id.map(str::to_owned),
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
