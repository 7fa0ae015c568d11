//! Unified error handling for admin.
//!
//! Form actions that fail redirect back to the form with an error toast.
//! Auth failures from the backend redirect to the login page; the backend
//! client has already cleared the session's credentials by then.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;
use zeal_api::ApiError;
use zeal_core::{Toast, TransitionError};

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed while loading a page.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// A form action was refused; show `message` on `back`.
    #[error("Rejected: {message}")]
    Rejected { message: String, back: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// A refused action that returns the admin to `back`.
    pub fn rejected(message: impl Into<String>, back: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            back: back.into(),
        }
    }

    fn is_server_error(&self) -> bool {
        match self {
            Self::Internal(_) => true,
            Self::Api(e) => !e.is_auth() && !e.is_not_found(),
            _ => false,
        }
    }
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
                "Admin request error"
            );
        }

        match self {
            Self::Api(e) if e.is_auth() => {
                redirect_with_toast("/auth/login", Toast::error(e.user_message()))
            }
            Self::Rejected { message, back } => redirect_with_toast(&back, Toast::error(message)),
            Self::Api(e) if e.is_not_found() => {
                (StatusCode::NOT_FOUND, e.user_message()).into_response()
            }
            Self::Api(e) => (StatusCode::BAD_GATEWAY, e.user_message()).into_response(),
            Self::NotFound(what) => {
                (StatusCode::NOT_FOUND, format!("Không tìm thấy: {what}")).into_response()
            }
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            // Don't expose internal error details to clients
            Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Turn a failed action into a redirect back to `back` with an error toast.
///
/// Backend auth failures keep their login redirect.
pub trait OrRedirect<T> {
    /// # Errors
    ///
    /// Returns the mapped `AppError` when `self` is an error.
    fn or_redirect(self, back: &str) -> Result<T, AppError>;
}

impl<T> OrRedirect<T> for Result<T, ApiError> {
    fn or_redirect(self, back: &str) -> Result<T, AppError> {
        self.map_err(|e| {
            if e.is_auth() {
                AppError::Api(e)
            } else {
                tracing::warn!(error = %e, "Backend rejected admin action");
                AppError::rejected(e.user_message(), back)
            }
        })
    }
}

impl<T> OrRedirect<T> for Result<T, TransitionError> {
    fn or_redirect(self, back: &str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::info!(error = %e, "Order transition refused");
            AppError::rejected(e.user_message(), back)
        })
    }
}

/// Set the Sentry user context from the admin's email.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
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

#[cfg(test)]
mod tests {
    use axum::http::header::LOCATION;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order-123".to_string());
        assert_eq!(err.to_string(), "Not found: order-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Api(ApiError::Status {
                status: 500,
                message: "boom".to_string()
            })),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_auth_failure_redirects_to_login_with_toast() {
        let response = AppError::Api(ApiError::AuthExpired).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/auth/login");
        let toast = response.extensions().get::<Toast>();
        assert!(toast.is_some_and(|t| t.kind == zeal_core::ToastKind::Error));
    }

    #[test]
    fn test_rejected_action_redirects_back() {
        let result: Result<(), ApiError> = Err(ApiError::Status {
            status: 400,
            message: "Mã giảm giá đã tồn tại".to_string(),
        });
        let response = result.or_redirect("/coupons/new").err().map(IntoResponse::into_response);
        let response = response.as_ref();
        assert_eq!(
            response.map(|r| r.headers()[LOCATION].clone()),
            Some(axum::http::HeaderValue::from_static("/coupons/new"))
        );
        assert_eq!(
            response.and_then(|r| r.extensions().get::<Toast>()).map(|t| t.text.as_str()),
            Some("Mã giảm giá đã tồn tại")
        );
    }

    #[test]
    fn test_forbidden_action_still_goes_to_login() {
        let result: Result<(), ApiError> = Err(ApiError::Forbidden);
        let err = result.or_redirect("/orders/o1").err();
        assert!(matches!(err, Some(AppError::Api(ApiError::Forbidden))));
    }
}
