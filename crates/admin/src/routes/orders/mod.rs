//! Orders management route handlers.
//!
//! Listing, detail, status transitions and cancellation.

mod actions;
mod detail;
mod list;
pub mod types;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub use actions::{CancelInput, TransitionInput, cancel, transition};
pub use detail::{OrderCancelTemplate, OrderShowTemplate, cancel_page, show};
pub use list::{OrdersIndexTemplate, apply_query, index};
pub use types::{LineItemView, OrderDetailView, OrderRowView, OrdersQuery};

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(index))
        .route("/orders/{id}", get(show))
        .route("/orders/{id}/transition", post(transition))
        .route("/orders/{id}/cancel", get(cancel_page).post(cancel))
}
