//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Health check
//!
//! # Auth
//! GET  /auth/login                  - Login page
//! POST /auth/login                  - Log in (admin role required)
//! POST /auth/logout                 - Logout
//!
//! # Dashboard
//! GET  /                            - Order counts, revenue, catalog counts
//!
//! # Orders
//! GET  /orders                      - Order listing (search, status filters, sort)
//! GET  /orders/{id}                 - Order detail with status selectors
//! POST /orders/{id}/transition      - Shipping or return status change
//! GET  /orders/{id}/cancel          - Cancel confirmation (reason)
//! POST /orders/{id}/cancel          - Submit cancellation
//!
//! # Catalog and content (list, new, edit, update, delete)
//! /products, /categories, /brands, /coupons, /news
//!
//! # Moderation and records
//! GET  /comments, POST /comments/{id}/delete
//! GET  /payments
//! GET  /contacts, POST /contacts/{id}/delete
//! GET  /users, POST /users/{id}/role, POST /users/{id}/delete
//!
//! POST /toast/dismiss               - Clear the pending toast
//! ```

use askama::Template;
use axum::{
    Router,
    response::Html,
    routing::{get, post},
};
use zeal_core::ToastView;

use crate::middleware::{CurrentAdmin, Notifier};
use crate::state::AppState;

pub mod auth;
pub mod comments;
pub mod contacts;
pub mod coupons;
pub mod dashboard;
pub mod forms;
pub mod news;
pub mod orders;
pub mod payments;
pub mod products;
pub mod taxonomy;
pub mod users;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/toast/dismiss", post(dismiss_toast))
        .route("/", get(dashboard::index))
        .merge(auth::router())
        .merge(orders::router())
        .merge(products::router())
        .merge(taxonomy::router())
        .merge(coupons::router())
        .merge(news::router())
        .merge(comments::router())
        .merge(payments::router())
        .merge(contacts::router())
        .merge(users::router())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// POST /toast/dismiss
async fn dismiss_toast(notifier: Notifier) -> axum::http::StatusCode {
    notifier.dismiss().await;
    axum::http::StatusCode::NO_CONTENT
}

/// Values every admin page's base layout needs.
#[derive(Debug, Clone)]
pub struct Layout {
    pub admin_email: String,
    pub current_path: &'static str,
    pub toast: ToastView,
}

impl Layout {
    /// Build the layout, taking the pending toast out of the session.
    pub async fn new(admin: &CurrentAdmin, notifier: &Notifier, current_path: &'static str) -> Self {
        Self {
            admin_email: admin.email.clone(),
            current_path,
            toast: notifier.take_view().await,
        }
    }

    /// Whether the nav entry for `prefix` is the current section.
    #[must_use]
    pub fn is_active(&self, prefix: &str) -> bool {
        if prefix == "/" {
            self.current_path == "/"
        } else {
            self.current_path.starts_with(prefix)
        }
    }
}

/// Render a template, logging failures.
pub fn render(template: &impl Template) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// Page number from a `?page=` value; anything unparsable is page 1.
#[must_use]
pub fn page_param(raw: Option<&str>) -> usize {
    raw.and_then(|p| p.trim().parse().ok()).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_param() {
        assert_eq!(page_param(Some("3")), 3);
        assert_eq!(page_param(Some("abc")), 1);
        assert_eq!(page_param(None), 1);
    }
}
