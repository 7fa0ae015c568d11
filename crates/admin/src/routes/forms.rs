//! Multipart form handling for catalog and content uploads.
//!
//! Browser forms are converted into a [`MultipartForm`] and forwarded to the
//! backend unchanged; images are not inspected or resized here.

use axum::extract::Multipart;
use rust_decimal::Decimal;
use zeal_api::{FilePart, MultipartForm};

use crate::error::AppError;

/// Largest accepted upload body (all files together).
pub const UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

/// Read every field of a browser multipart form.
///
/// File inputs left empty are dropped.
///
/// # Errors
///
/// Returns `AppError::Rejected` pointing at `back` if the body is malformed
/// or too large.
pub async fn read_multipart(mut multipart: Multipart, back: &str) -> Result<MultipartForm, AppError> {
    let unreadable = |e: axum::extract::multipart::MultipartError| {
        tracing::warn!(error = %e, "Unreadable upload form");
        AppError::rejected("Không đọc được dữ liệu biểu mẫu hoặc tệp quá lớn", back)
    };

    let mut form = MultipartForm::new();
    while let Some(field) = multipart.next_field().await.map_err(unreadable)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if let Some(file_name) = field.file_name().map(str::to_owned) {
            let content_type = field.content_type().map(str::to_owned);
            let bytes = field.bytes().await.map_err(unreadable)?;
            form = form.file(FilePart {
                field: name,
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field.text().await.map_err(unreadable)?;
            form = form.text(name, value.trim());
        }
    }
    Ok(form)
}

/// A text field that must not be blank.
///
/// # Errors
///
/// Returns `AppError::Rejected` with `message` when the field is missing.
pub fn require_text<'a>(
    form: &'a MultipartForm,
    field: &str,
    message: &str,
    back: &str,
) -> Result<&'a str, AppError> {
    form.field(field)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::rejected(message, back))
}

/// An optional non-negative amount in đồng.
///
/// # Errors
///
/// Returns `AppError::Rejected` with `message` when the value is present but
/// not a non-negative number.
pub fn optional_amount(
    form: &MultipartForm,
    field: &str,
    message: &str,
    back: &str,
) -> Result<Option<Decimal>, AppError> {
    let Some(raw) = form.field(field).map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '.' | ',' | ' ')).collect();
    match cleaned.parse::<Decimal>() {
        Ok(amount) if !amount.is_sign_negative() => Ok(Some(amount)),
        _ => Err(AppError::rejected(message, back)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        let form = MultipartForm::new().text("name", "Áo khoác").text("blank", "  ");
        assert_eq!(require_text(&form, "name", "x", "/").ok(), Some("Áo khoác"));
        assert!(require_text(&form, "blank", "x", "/").is_err());
        assert!(require_text(&form, "missing", "x", "/").is_err());
    }

    #[test]
    fn test_optional_amount_accepts_grouped_dong() {
        let form = MultipartForm::new()
            .text("price", "1.250.000")
            .text("neg", "-5")
            .text("empty", "");
        assert_eq!(
            optional_amount(&form, "price", "x", "/").ok().flatten(),
            Some(Decimal::from(1_250_000))
        );
        assert!(optional_amount(&form, "neg", "x", "/").is_err());
        assert_eq!(optional_amount(&form, "empty", "x", "/").ok().flatten(), None);
    }
}
