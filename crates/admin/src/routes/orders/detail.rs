//! Order detail and cancel confirmation pages.

use askama::Template;
use axum::{
    extract::{Path, State},
    response::Html,
};
use tracing::instrument;
use zeal_core::workflow::{
    can_cancel, offers_return_decision, offers_shipping_change, return_options, shipping_options,
};
use zeal_core::{CancelReason, OrderId, StatusOption};

use crate::error::{AppError, OrRedirect};
use crate::filters;
use crate::middleware::{Notifier, RequireAdmin};
use crate::routes::{Layout, render};
use crate::state::AppState;

use super::types::OrderDetailView;

/// Order detail page template.
#[derive(Template)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub layout: Layout,
    pub order: OrderDetailView,
    pub shipping_options: Vec<StatusOption>,
    pub return_options: Vec<StatusOption>,
    pub shipping_editable: bool,
    pub return_editable: bool,
    pub cancellable: bool,
}

/// Reason picker entry.
#[derive(Debug, Clone)]
pub struct ReasonOption {
    pub value: String,
    pub label: String,
}

/// Cancel confirmation page template.
#[derive(Template)]
#[template(path = "orders/cancel.html")]
pub struct OrderCancelTemplate {
    pub layout: Layout,
    pub order: OrderDetailView,
    pub reasons: Vec<ReasonOption>,
    pub other_value: &'static str,
}

/// Preset reasons in picker order.
pub fn reason_options() -> Vec<ReasonOption> {
    CancelReason::PRESETS
        .iter()
        .map(|reason| ReasonOption {
            value: reason.as_str().to_owned(),
            label: reason.label().to_owned(),
        })
        .collect()
}

/// Order detail page handler.
///
/// GET /orders/{id}
#[instrument(skip(admin, state, notifier))]
pub async fn show(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let order = state
        .api()
        .with(admin.store())
        .get_order(&OrderId::new(id))
        .await?;

    let template = OrderShowTemplate {
        layout: Layout::new(&admin, &notifier, "/orders").await,
        shipping_options: shipping_options(&order),
        return_options: return_options(&order),
        shipping_editable: offers_shipping_change(&order),
        return_editable: offers_return_decision(&order),
        cancellable: can_cancel(&order),
        order: OrderDetailView::from(&order),
    };
    Ok(render(&template))
}

/// Cancel confirmation page.
///
/// Orders that can no longer be cancelled send the admin back to the detail
/// page with an error toast.
///
/// GET /orders/{id}/cancel
#[instrument(skip(admin, state, notifier))]
pub async fn cancel_page(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let back = format!("/orders/{id}");
    let order = state
        .api()
        .with(admin.store())
        .get_order(&OrderId::new(id))
        .await?;
    if !can_cancel(&order) {
        return Err(zeal_core::TransitionError::NotCancellable(order.shipping_status))
            .or_redirect(&back);
    }

    let template = OrderCancelTemplate {
        layout: Layout::new(&admin, &notifier, "/orders").await,
        order: OrderDetailView::from(&order),
        reasons: reason_options(),
        other_value: CancelReason::OTHER_VALUE,
    };
    Ok(render(&template))
}
