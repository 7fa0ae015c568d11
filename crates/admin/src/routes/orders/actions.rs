//! Order status change handlers.
//!
//! Every action re-fetches the order, validates the requested change with
//! [`zeal_core::workflow`] and only then sends the update. Refused changes
//! never reach the backend.

use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;
use zeal_core::workflow::{confirm_cancel, request_transition};
use zeal_core::{CancelReason, OrderId, TransitionKind, TransitionPlan};

use crate::error::{AppError, OrRedirect};
use crate::middleware::{Notifier, RequireAdmin};
use crate::state::AppState;

/// Status selector submission.
#[derive(Debug, Deserialize)]
pub struct TransitionInput {
    /// `shipping`, `return` or `cancel`.
    pub kind: String,
    /// Wire value of the selected status.
    #[serde(default)]
    pub target: String,
}

/// Cancel confirmation submission.
#[derive(Debug, Deserialize)]
pub struct CancelInput {
    #[serde(default)]
    pub reason: String,
    pub other_reason: Option<String>,
}

/// Apply a shipping or return status change.
///
/// Choosing `cancelled` leads to the confirmation page instead.
///
/// POST /orders/{id}/transition
#[instrument(skip(admin, state, notifier, input), fields(kind = %input.kind, target = %input.target))]
pub async fn transition(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
    Form(input): Form<TransitionInput>,
) -> Result<Redirect, AppError> {
    let back = format!("/orders/{id}");
    let api = state.api().with(admin.store());

    let kind = input.kind.parse::<TransitionKind>().or_redirect(&back)?;
    let order = api.get_order(&OrderId::new(id)).await.or_redirect(&back)?;

    match request_transition(&order, kind, &input.target).or_redirect(&back)? {
        TransitionPlan::ConfirmCancel => Ok(Redirect::to(&format!("{back}/cancel"))),
        TransitionPlan::Submit(update) => {
            api.update_order(&order.id, &update)
                .await
                .or_redirect(&back)?;
            tracing::info!(order_id = %order.id, update = %update.summary(), "Order status changed");
            notifier
                .success(format!("Đã cập nhật trạng thái: {}", update.summary()))
                .await;
            Ok(Redirect::to(&back))
        }
    }
}

/// Cancel an order with the chosen reason.
///
/// POST /orders/{id}/cancel
#[instrument(skip(admin, state, notifier, input))]
pub async fn cancel(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
    Form(input): Form<CancelInput>,
) -> Result<Redirect, AppError> {
    let back = format!("/orders/{id}");
    let api = state.api().with(admin.store());

    let order = api.get_order(&OrderId::new(id)).await.or_redirect(&back)?;
    let reason = CancelReason::from_form(&input.reason, input.other_reason.as_deref());
    let update = confirm_cancel(&order, reason).or_redirect(&format!("{back}/cancel"))?;

    api.update_order(&order.id, &update)
        .await
        .or_redirect(&format!("{back}/cancel"))?;
    tracing::info!(order_id = %order.id, "Order cancelled");
    notifier.success("Đã hủy đơn hàng").await;
    Ok(Redirect::to(&back))
}
