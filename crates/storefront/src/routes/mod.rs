//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Home page (banners, new products, news)
//! GET  /health                        - Health check
//! POST /toast/dismiss                 - Clear the pending toast
//!
//! # Catalog
//! GET  /products                      - Catalog (q, category, brand, price range, sort, page)
//! GET  /products/{id}                 - Product detail with reviews
//! POST /products/{id}/comments        - Post a review (login required)
//!
//! # Favorites (session-backed)
//! GET  /favorites                     - Favorite products
//! POST /favorites/{id}/toggle         - Add or remove a favorite
//!
//! # Content
//! GET  /news                          - News listing
//! GET  /news/{id}                     - News article
//! GET  /contact                       - Contact form
//! POST /contact                       - Submit contact form
//!
//! # Auth (rate limited)
//! GET  /auth/login                    - Login page
//! POST /auth/login                    - Login action
//! GET  /auth/register                 - Register page
//! POST /auth/register                 - Register action
//! POST /auth/logout                   - Logout action
//!
//! # Account (requires login)
//! GET  /account/orders                - Order history
//! GET  /account/orders/{id}           - Order detail
//! POST /account/orders/{id}/cancel    - Cancel a pending order
//! POST /account/orders/{id}/return    - Request a return for a delivered order
//! ```

pub mod account;
pub mod auth;
pub mod contact;
pub mod favorites;
pub mod home;
pub mod news;
pub mod products;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use tower_sessions::Session;
use zeal_core::ToastView;

use crate::middleware::{CurrentUser, Notifier, auth_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        .layer(auth_rate_limiter())
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/comments", post(products::comment))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(account::orders))
        .route("/orders/{id}", get(account::order))
        .route("/orders/{id}/cancel", post(account::cancel))
        .route("/orders/{id}/return", post(account::request_return))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .route("/toast/dismiss", post(dismiss_toast))
        .nest("/products", product_routes())
        .route("/favorites", get(favorites::index))
        .route("/favorites/{id}/toggle", post(favorites::toggle))
        .route("/news", get(news::index))
        .route("/news/{id}", get(news::show))
        .route("/contact", get(contact::page).post(contact::submit))
        .nest("/account", account_routes())
        .nest("/auth", auth_routes())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// POST /toast/dismiss
async fn dismiss_toast(notifier: Notifier) -> StatusCode {
    notifier.dismiss().await;
    StatusCode::NO_CONTENT
}

/// Values the base layout needs on every page.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Greeting name when logged in.
    pub user_name: Option<String>,
    pub current_path: String,
    pub favorite_count: usize,
    pub toast: ToastView,
}

impl Layout {
    /// Build the layout, taking the pending toast out of the session.
    pub async fn new(user: Option<&CurrentUser>, session: &Session, current_path: &str) -> Self {
        Self {
            user_name: user.map(|u| u.display_name().to_owned()),
            current_path: current_path.to_owned(),
            favorite_count: favorites::Favorites::new(session.clone()).ids().await.len(),
            toast: Notifier::new(session.clone()).take_view().await,
        }
    }

    /// Layout for error pages rendered without a session.
    #[must_use]
    pub fn bare() -> Self {
        Self {
            user_name: None,
            current_path: String::new(),
            favorite_count: 0,
            toast: ToastView::hidden(),
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
        assert_eq!(page_param(Some("2")), 2);
        assert_eq!(page_param(Some("")), 1);
        assert_eq!(page_param(None), 1);
    }

    #[test]
    fn test_nav_highlight() {
        let mut layout = Layout::bare();
        layout.current_path = "/products/p1".to_owned();
        assert!(layout.is_active("/products"));
        assert!(!layout.is_active("/"));
        layout.current_path = "/".to_owned();
        assert!(layout.is_active("/"));
    }
}
