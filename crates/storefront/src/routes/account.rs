//! Customer order history, cancellation and return requests.
//!
//! Actions re-fetch the order and run the same workflow checks as the
//! admin before anything is sent.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use zeal_core::listing::{self, SortDirection};
use zeal_core::workflow::{self, can_cancel, can_request_return, confirm_cancel};
use zeal_core::{CancelReason, Order, OrderId, OrderItem, display_datetime};

use crate::error::{AppError, OrRedirect, Result};
use crate::filters;
use crate::middleware::{CurrentUser, Notifier, RequireUser};
use crate::routes::Layout;
use crate::state::AppState;

/// Row in the order history.
#[derive(Debug, Clone)]
pub struct OrderSummaryView {
    pub id: String,
    pub short_ref: String,
    pub item_count: u32,
    pub total: String,
    pub shipping_status: &'static str,
    pub shipping_label: &'static str,
    pub return_status: &'static str,
    pub return_label: &'static str,
    pub created_at: String,
}

impl From<&Order> for OrderSummaryView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            short_ref: order.short_ref(),
            item_count: order.item_count(),
            total: order.total.to_string(),
            shipping_status: order.shipping_status.as_str(),
            shipping_label: order.shipping_status.label(),
            return_status: order.return_status.as_str(),
            return_label: order.return_status.label(),
            created_at: display_datetime(order.created_at.as_ref()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub name: String,
    pub product_id: Option<String>,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&OrderItem> for OrderLineView {
    fn from(item: &OrderItem) -> Self {
        Self {
            name: item.display_name(),
            product_id: item.product.as_ref().map(|p| p.id().to_string()),
            quantity: item.quantity,
            unit_price: item.price.to_string(),
            line_total: item.line_total().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReasonOption {
    pub value: String,
    pub label: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub layout: Layout,
    pub orders: Vec<OrderSummaryView>,
}

/// GET /account/orders
#[instrument(skip(state, user, session))]
pub async fn orders(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
) -> Result<OrdersTemplate> {
    let mut orders = state.api().with(user.store()).my_orders().await?;
    listing::sort_by_key(&mut orders, SortDirection::Desc, |o| o.created_at);

    Ok(OrdersTemplate {
        layout: Layout::new(Some(&user), &session, "/account").await,
        orders: orders.iter().map(OrderSummaryView::from).collect(),
    })
}

#[derive(Template, WebTemplate)]
#[template(path = "account/order.html")]
pub struct OrderTemplate {
    pub layout: Layout,
    pub order: OrderSummaryView,
    pub items: Vec<OrderLineView>,
    pub address: String,
    pub payment_method: String,
    pub payment_label: &'static str,
    pub cancel_reason: Option<String>,
    pub return_reason: Option<String>,
    pub cancellable: bool,
    pub returnable: bool,
    pub reasons: Vec<ReasonOption>,
    pub other_value: &'static str,
}

/// Fetch an order and make sure it belongs to `user`.
///
/// Ownership is only enforced when both sides carry a user ID; the backend
/// scopes customer tokens as well.
async fn owned_order(state: &AppState, user: &CurrentUser, id: String) -> Result<Order> {
    let order = state
        .api()
        .with(user.store())
        .get_order(&OrderId::new(id))
        .await?;
    if let (Some(owner), Some(me)) = (order.customer_id(), user.user_id.as_ref())
        && owner != me
    {
        tracing::warn!(order_id = %order.id, "Order requested by another customer");
        return Err(AppError::NotFound("đơn hàng".to_owned()));
    }
    Ok(order)
}

/// GET /account/orders/{id}
#[instrument(skip(state, user, session))]
pub async fn order(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
    Path(id): Path<String>,
) -> Result<OrderTemplate> {
    let order = owned_order(&state, &user, id).await?;

    Ok(OrderTemplate {
        layout: Layout::new(Some(&user), &session, "/account").await,
        order: OrderSummaryView::from(&order),
        items: order.items.iter().map(OrderLineView::from).collect(),
        address: order
            .address
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        payment_method: order
            .payment_method
            .clone()
            .unwrap_or_else(|| "COD".to_owned()),
        payment_label: order.payment_status.label(),
        cancel_reason: order
            .cancel_reason
            .as_deref()
            .map(|reason| CancelReason::parse(reason).label().to_owned()),
        return_reason: order.return_reason.clone().filter(|r| !r.trim().is_empty()),
        cancellable: can_cancel(&order),
        returnable: can_request_return(&order),
        reasons: CancelReason::PRESETS
            .iter()
            .map(|reason| ReasonOption {
                value: reason.as_str().to_owned(),
                label: reason.label().to_owned(),
            })
            .collect(),
        other_value: CancelReason::OTHER_VALUE,
    })
}

#[derive(Debug, Deserialize)]
pub struct CancelInput {
    #[serde(default)]
    pub reason: String,
    pub other_reason: Option<String>,
}

/// POST /account/orders/{id}/cancel
#[instrument(skip(state, user, notifier, input))]
pub async fn cancel(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    notifier: Notifier,
    Path(id): Path<String>,
    Form(input): Form<CancelInput>,
) -> Result<Redirect> {
    let back = format!("/account/orders/{id}");
    let order = owned_order(&state, &user, id).await?;

    let reason = CancelReason::from_form(&input.reason, input.other_reason.as_deref());
    let update = confirm_cancel(&order, reason).or_redirect(&back)?;

    state
        .api()
        .with(user.store())
        .update_order(&order.id, &update)
        .await
        .or_redirect(&back)?;
    tracing::info!(order_id = %order.id, "Customer cancelled order");
    notifier.success("Đã hủy đơn hàng").await;
    Ok(Redirect::to(&back))
}

#[derive(Debug, Deserialize)]
pub struct ReturnInput {
    #[serde(default)]
    pub reason: String,
}

/// POST /account/orders/{id}/return
#[instrument(skip(state, user, notifier, input))]
pub async fn request_return(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    notifier: Notifier,
    Path(id): Path<String>,
    Form(input): Form<ReturnInput>,
) -> Result<Redirect> {
    let back = format!("/account/orders/{id}");
    let order = owned_order(&state, &user, id).await?;

    let update = workflow::request_return(&order, &input.reason).or_redirect(&back)?;

    state
        .api()
        .with(user.store())
        .update_order(&order.id, &update)
        .await
        .or_redirect(&back)?;
    tracing::info!(order_id = %order.id, "Customer requested return");
    notifier
        .success("Đã gửi yêu cầu trả hàng, vui lòng chờ cửa hàng xác nhận")
        .await;
    Ok(Redirect::to(&back))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_summary_view() {
        let order: Order = serde_json::from_value(json!({
            "_id": "6650a1b2c3d4e5f6a7b8c9d0",
            "shippingStatus": "delivered",
            "items": [
                {"product": "p1", "name": "Áo thun", "quantity": 2, "price": 150000},
                {"product": "p2", "name": "Mũ", "quantity": 1, "price": 90000}
            ],
            "totalPrice": 390000
        }))
        .unwrap();
        let view = OrderSummaryView::from(&order);
        assert_eq!(view.short_ref, "A7B8C9D0");
        assert_eq!(view.item_count, 3);
        assert_eq!(view.total, "390.000 ₫");
        assert_eq!(view.shipping_status, "delivered");

        let line = OrderLineView::from(&order.items[0]);
        assert_eq!(line.line_total, "300.000 ₫");
    }
}
