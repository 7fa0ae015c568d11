//! Contact form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use zeal_api::NewContact;
use zeal_core::Email;
use zeal_core::listing::non_blank;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{Notifier, OptionalUser};
use crate::routes::Layout;
use crate::state::AppState;

const MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub layout: Layout,
    /// Prefilled from the login when there is one.
    pub email: String,
}

/// GET /contact
pub async fn page(OptionalUser(user): OptionalUser, session: Session) -> ContactTemplate {
    ContactTemplate {
        email: user.as_ref().map(|u| u.email.clone()).unwrap_or_default(),
        layout: Layout::new(user.as_ref(), &session, "/contact").await,
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Validate the contact form.
///
/// # Errors
///
/// Returns the message for the first missing or malformed field.
pub fn validate_contact(input: &ContactInput) -> std::result::Result<NewContact, &'static str> {
    let name = non_blank(Some(input.name.as_str())).ok_or("Vui lòng nhập họ tên")?;
    let email = Email::parse(&input.email).map_err(|e| e.user_message())?;
    let message = non_blank(Some(input.message.as_str())).ok_or("Vui lòng nhập nội dung liên hệ")?;
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err("Nội dung liên hệ quá dài");
    }
    Ok(NewContact {
        name: name.to_owned(),
        email: email.into_inner(),
        phone: non_blank(input.phone.as_deref()).map(str::to_owned),
        subject: non_blank(input.subject.as_deref()).map(str::to_owned),
        message: message.to_owned(),
    })
}

/// POST /contact
#[instrument(skip(state, notifier, input))]
pub async fn submit(
    State(state): State<AppState>,
    notifier: Notifier,
    Form(input): Form<ContactInput>,
) -> Result<Redirect> {
    let contact =
        validate_contact(&input).map_err(|message| AppError::rejected(message, "/contact"))?;

    match state.api().anonymous().create_contact(&contact).await {
        Ok(()) => {
            tracing::info!("Contact message sent");
            notifier
                .success("Cảm ơn bạn đã liên hệ, chúng tôi sẽ phản hồi sớm nhất")
                .await;
            Ok(Redirect::to("/contact"))
        }
        Err(e) if e.is_timeout() => {
            tracing::warn!(error = %e, "Contact submission timed out");
            Err(AppError::rejected(
                "Máy chủ phản hồi chậm, vui lòng thử lại sau ít phút",
                "/contact",
            ))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Contact submission failed");
            Err(AppError::rejected(e.user_message(), "/contact"))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input() -> ContactInput {
        ContactInput {
            name: " Trần Thị B ".into(),
            email: "b@example.vn".into(),
            phone: Some(String::new()),
            subject: None,
            message: "Tôi cần tư vấn size".into(),
        }
    }

    #[test]
    fn test_valid_contact_is_trimmed() {
        let contact = validate_contact(&input()).unwrap();
        assert_eq!(contact.name, "Trần Thị B");
        assert_eq!(contact.phone, None);
    }

    #[test]
    fn test_missing_fields_rejected() {
        let mut form = input();
        form.name = "  ".into();
        assert_eq!(validate_contact(&form).err(), Some("Vui lòng nhập họ tên"));

        let mut form = input();
        form.email = "not-an-email".into();
        assert!(validate_contact(&form).is_err());

        let mut form = input();
        form.message = String::new();
        assert_eq!(
            validate_contact(&form).err(),
            Some("Vui lòng nhập nội dung liên hệ")
        );
    }
}
