//! Errors returned by the backend client.

use reqwest::StatusCode;
use thiserror::Error;

/// Fallback shown when the backend gives no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Đã có lỗi xảy ra, vui lòng thử lại";

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The token was rejected and could not be refreshed. Local auth state
    /// has already been cleared; the caller should send the user to login.
    #[error("session expired, login required")]
    AuthExpired,

    /// The backend refused access (HTTP 403). Local auth state has been cleared.
    #[error("access denied")]
    Forbidden,

    /// The request did not complete within its timeout.
    #[error("request timed out")]
    Timeout,

    /// Any other non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the JSON error body, or a generic fallback.
        message: String,
    },

    /// Transport failure (DNS, TLS, connection reset, ...).
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request path or base URL could not be parsed.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

impl ApiError {
    /// Whether the caller must redirect to login.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::AuthExpired | Self::Forbidden)
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// HTTP status, when the backend answered.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::AuthExpired => Some(StatusCode::UNAUTHORIZED),
            Self::Forbidden => Some(StatusCode::FORBIDDEN),
            Self::Status { status, .. } => StatusCode::from_u16(*status).ok(),
            Self::Http(err) => err.status(),
            Self::Timeout | Self::Parse(_) | Self::Url(_) => None,
        }
    }

    /// Whether the backend reported the resource missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Message suitable for a toast.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthExpired => "Phiên đăng nhập đã hết hạn, vui lòng đăng nhập lại".to_owned(),
            Self::Forbidden => "Bạn không có quyền thực hiện thao tác này".to_owned(),
            Self::Timeout => "Máy chủ phản hồi quá lâu, vui lòng thử lại".to_owned(),
            Self::Status { message, .. } => message.clone(),
            Self::Http(_) | Self::Parse(_) | Self::Url(_) => GENERIC_ERROR_MESSAGE.to_owned(),
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Looks for `message`, then `error`, then `msg`. Non-JSON or empty bodies
/// yield `None`.
#[must_use]
pub fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error", "msg"].into_iter().find_map(|key| {
        match value.get(key)? {
            serde_json::Value::String(text) if !text.trim().is_empty() => {
                Some(text.trim().to_owned())
            }
            // `{"error": {"message": "..."}}`
            serde_json::Value::Object(inner) => inner
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned),
            _ => None,
        }
    })
}
