//! Session-backed toast notifications.
//!
//! Handlers queue a toast with [`Notifier`]; the next rendered page takes it
//! out of the session. Error responses carry their toast as a response
//! extension, which [`persist_toast_middleware`] moves into the session.

use axum::{
    extract::{FromRequestParts, Request},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;
use zeal_core::{Toast, ToastSlot, ToastView};

use super::auth::session_keys;

/// Single-slot notifier stored in the session.
#[derive(Debug, Clone)]
pub struct Notifier {
    session: Session,
}

impl Notifier {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    async fn slot(&self) -> ToastSlot {
        self.session
            .get(session_keys::TOAST)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    async fn save(&self, slot: &ToastSlot) {
        if let Err(e) = self.session.insert(session_keys::TOAST, slot).await {
            tracing::error!(error = %e, "Failed to store toast");
        }
    }

    /// Queue `toast`, replacing any toast not yet shown.
    pub async fn show(&self, toast: Toast) {
        let mut slot = self.slot().await;
        slot.show(toast);
        self.save(&slot).await;
    }

    pub async fn success(&self, text: impl Into<String>) {
        self.show(Toast::success(text)).await;
    }

    pub async fn error(&self, text: impl Into<String>) {
        self.show(Toast::error(text)).await;
    }

    /// Drop the pending toast.
    pub async fn dismiss(&self) {
        let mut slot = self.slot().await;
        slot.dismiss();
        self.save(&slot).await;
    }

    /// Take the pending toast for rendering.
    pub async fn take_view(&self) -> ToastView {
        let mut slot = self.slot().await;
        if slot.current().is_none() {
            return ToastView::hidden();
        }
        let view = slot.take_view();
        self.save(&slot).await;
        view
    }
}

impl<S> FromRequestParts<S> for Notifier
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(Self::new)
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Move a toast attached to the response into the session.
pub async fn persist_toast_middleware(session: Session, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    if let Some(toast) = response.extensions_mut().remove::<Toast>() {
        Notifier::new(session).show(toast).await;
    }
    response
}
