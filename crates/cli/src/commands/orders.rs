//! Order commands.
//!
//! Every change is validated with [`zeal_core::workflow`] twice: the
//! arguments before any request, and the planned update against the
//! freshly fetched order before the update is sent.

use std::io::{self, Write};
use std::time::Duration;

use clap::{Subcommand, ValueEnum};
use thiserror::Error;
use zeal_api::{Api, ApiError, MemoryTokenStore};
use zeal_core::listing::{self, SortDirection};
use zeal_core::workflow::{self, confirm_cancel, request_transition};
use zeal_core::{
    CancelReason, Order, OrderId, OrderStatusUpdate, ReturnStatus, ShippingStatus,
    TransitionError, TransitionKind, TransitionPlan, display_datetime,
};

use super::login::{self, CredentialSource, LoginError};

/// Errors that can occur during order commands.
#[derive(Debug, Error)]
pub enum OrdersError {
    #[error(transparent)]
    Login(#[from] LoginError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The workflow refused the change; nothing was sent.
    #[error("Refused: {0}")]
    Transition(#[from] TransitionError),

    #[error("Unknown shipping status: {0}. Valid: pending, in_transit, delivered, returned, cancelled")]
    UnknownStatus(String),

    /// `ship <id> cancelled` needs a reason.
    #[error("Use `zeal orders cancel <id> --reason <reason>` to cancel an order")]
    UseCancel,

    #[error("Output error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Subcommand)]
pub enum OrdersAction {
    /// List orders, newest first
    List {
        /// Only orders with this shipping status
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show one order
    Show { id: String },
    /// Change the shipping status (`in_transit`, `delivered`)
    Ship { id: String, status: String },
    /// Cancel a pending order
    Cancel {
        id: String,
        /// Reason code (`out_of_stock`, `customer_request`,
        /// `wrong_information`, `payment_issue`) or `other` with `--note`
        #[arg(short, long)]
        reason: String,
        /// Free-text reason when `--reason other`
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Approve or reject a return request
    Return {
        id: String,
        #[arg(value_enum)]
        decision: ReturnDecision,
    },
}

/// Admin decision on a return request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReturnDecision {
    Approve,
    Reject,
}

impl ReturnDecision {
    #[must_use]
    pub const fn target(self) -> ReturnStatus {
        match self {
            Self::Approve => ReturnStatus::Approved,
            Self::Reject => ReturnStatus::Rejected,
        }
    }
}

/// A status change whose arguments have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Ship(ShippingStatus),
    Cancel(CancelReason),
    Return(ReturnDecision),
}

impl Change {
    /// # Errors
    ///
    /// [`OrdersError::UnknownStatus`] for an unknown status,
    /// [`OrdersError::UseCancel`] for `cancelled`.
    pub fn ship(status: &str) -> Result<Self, OrdersError> {
        let status: ShippingStatus = status
            .trim()
            .parse()
            .map_err(|_| OrdersError::UnknownStatus(status.to_owned()))?;
        if status == ShippingStatus::Cancelled {
            return Err(OrdersError::UseCancel);
        }
        Ok(Self::Ship(status))
    }

    /// # Errors
    ///
    /// [`TransitionError::MissingCancelReason`] when no usable reason was given.
    pub fn cancel(reason: &str, note: Option<&str>) -> Result<Self, OrdersError> {
        CancelReason::from_form(reason, note)
            .map(Self::Cancel)
            .ok_or(OrdersError::Transition(TransitionError::MissingCancelReason))
    }

    /// The update to send for `order`.
    ///
    /// # Errors
    ///
    /// The workflow's refusal when the order's current state does not allow
    /// the change.
    pub fn plan(&self, order: &Order) -> Result<OrderStatusUpdate, TransitionError> {
        match self {
            Self::Ship(status) => {
                match request_transition(order, TransitionKind::Shipping, status.as_str())? {
                    TransitionPlan::Submit(update) => Ok(update),
                    TransitionPlan::ConfirmCancel => Err(TransitionError::MissingCancelReason),
                }
            }
            Self::Cancel(reason) => confirm_cancel(order, Some(reason.clone())),
            Self::Return(decision) => {
                match request_transition(order, TransitionKind::Return, decision.target().as_str())? {
                    TransitionPlan::Submit(update) => Ok(update),
                    TransitionPlan::ConfirmCancel => Err(TransitionError::UnknownStatus(
                        decision.target().to_string(),
                    )),
                }
            }
        }
    }
}

/// Run an order command.
///
/// # Errors
///
/// Returns an [`OrdersError`] for bad arguments, refused changes and
/// backend failures.
pub async fn run(api_url: &str, timeout: Duration, action: OrdersAction) -> Result<(), OrdersError> {
    // Argument checks need no credentials.
    let (id, change) = match action {
        OrdersAction::List { status } => {
            let status = status
                .as_deref()
                .map(|s| {
                    s.trim()
                        .parse::<ShippingStatus>()
                        .map_err(|_| OrdersError::UnknownStatus(s.to_owned()))
                })
                .transpose()?;
            let (client, store) = connect(api_url, timeout).await?;
            return list(&client.with(&store), status).await;
        }
        OrdersAction::Show { id } => {
            let (client, store) = connect(api_url, timeout).await?;
            let order = client.with(&store).get_order(&OrderId::new(id)).await?;
            let mut out = io::stdout().lock();
            write_order_detail(&mut out, &order)?;
            return Ok(());
        }
        OrdersAction::Ship { id, status } => (id, Change::ship(&status)?),
        OrdersAction::Cancel { id, reason, note } => (id, Change::cancel(&reason, note.as_deref())?),
        OrdersAction::Return { id, decision } => (id, Change::Return(decision)),
    };

    let (client, store) = connect(api_url, timeout).await?;
    apply(&client.with(&store), &OrderId::new(id), &change).await
}

async fn connect(
    api_url: &str,
    timeout: Duration,
) -> Result<(zeal_api::ApiClient, MemoryTokenStore), OrdersError> {
    let source = CredentialSource::from_env()?;
    Ok(login::connect(api_url, timeout, source).await?)
}

async fn list(api: &Api<'_, MemoryTokenStore>, status: Option<ShippingStatus>) -> Result<(), OrdersError> {
    let mut orders = api.list_orders().await?;
    if let Some(status) = status {
        orders.retain(|o| o.shipping_status == status);
    }
    listing::sort_by_key(&mut orders, SortDirection::Desc, |o| o.created_at);

    let mut out = io::stdout().lock();
    write_order_table(&mut out, &orders)?;
    Ok(())
}

/// Re-fetch the order, plan the change against it, then send it.
async fn apply(
    api: &Api<'_, MemoryTokenStore>,
    id: &OrderId,
    change: &Change,
) -> Result<(), OrdersError> {
    let order = api.get_order(id).await?;
    let update = change.plan(&order)?;

    let updated = api.update_order(&order.id, &update).await?;
    tracing::info!(order_id = %updated.id, update = %update.summary(), "Order updated");

    let mut out = io::stdout().lock();
    writeln!(out, "Updated #{}: {}", updated.short_ref(), update.summary())?;
    write_order_detail(&mut out, &updated)?;
    Ok(())
}

/// One line per order.
///
/// # Errors
///
/// Returns any error from `out`.
pub fn write_order_table(out: &mut impl Write, orders: &[Order]) -> io::Result<()> {
    if orders.is_empty() {
        return writeln!(out, "No orders.");
    }
    writeln!(
        out,
        "{:<10} {:<16} {:<24} {:>14} {:<11} {:<10} {:<13}",
        "REF", "CREATED", "CUSTOMER", "TOTAL", "SHIPPING", "PAYMENT", "RETURN"
    )?;
    for order in orders {
        writeln!(
            out,
            "{:<10} {:<16} {:<24} {:>14} {:<11} {:<10} {:<13}",
            order.short_ref(),
            display_datetime(order.created_at.as_ref()),
            truncate(&order.customer_name(), 24),
            order.total.to_string(),
            order.shipping_status.as_str(),
            order.payment_status.as_str(),
            order.return_status.as_str(),
        )?;
    }
    writeln!(out, "{} order(s)", orders.len())
}

/// Full order view, including what can be done next.
///
/// # Errors
///
/// Returns any error from `out`.
pub fn write_order_detail(out: &mut impl Write, order: &Order) -> io::Result<()> {
    writeln!(out, "Order #{} ({})", order.short_ref(), order.id)?;
    writeln!(out, "  Customer: {}", order.customer_name())?;
    if let Some(phone) = &order.phone {
        writeln!(out, "  Phone:    {phone}")?;
    }
    if let Some(address) = &order.address {
        writeln!(out, "  Address:  {address}")?;
    }
    writeln!(out, "  Created:  {}", display_datetime(order.created_at.as_ref()))?;
    writeln!(out, "  Shipping: {}", order.shipping_status.as_str())?;
    writeln!(out, "  Payment:  {}", order.payment_status.as_str())?;
    writeln!(out, "  Return:   {}", order.return_status.as_str())?;
    if let Some(reason) = &order.cancel_reason {
        writeln!(out, "  Cancel reason: {}", CancelReason::parse(reason).label())?;
    }
    if let Some(reason) = &order.return_reason {
        writeln!(out, "  Return reason: {reason}")?;
    }
    writeln!(out, "  Items:")?;
    for item in &order.items {
        writeln!(
            out,
            "    {} x{} @ {} = {}",
            item.display_name(),
            item.quantity,
            item.price,
            item.line_total()
        )?;
    }
    writeln!(out, "  Total: {}", order.total)?;

    let mut next = Vec::new();
    for option in workflow::shipping_options(order) {
        if option.enabled && option.value != ShippingStatus::Cancelled.as_str() {
            next.push(format!("ship {}", option.value));
        }
    }
    if workflow::can_cancel(order) {
        next.push("cancel".to_owned());
    }
    if workflow::offers_return_decision(order) {
        next.push("return approve|reject".to_owned());
    }
    if !next.is_empty() {
        writeln!(out, "  Next: {}", next.join(", "))?;
    }
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{cut}…")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use zeal_core::PaymentStatus;

    use super::*;

    fn order(shipping: &str, payment: &str, ret: &str) -> Order {
        serde_json::from_value(json!({
            "_id": "6650a1b2c3d4e5f6a7b8c9d0",
            "fullName": "Lê Văn C",
            "shippingStatus": shipping,
            "paymentStatus": payment,
            "returnStatus": ret,
            "items": [{"product": "p1", "name": "Áo thun", "quantity": 2, "price": 150000}],
            "totalPrice": 300000
        }))
        .unwrap()
    }

    #[test]
    fn test_ship_arguments_checked_before_any_request() {
        assert!(matches!(Change::ship("lost"), Err(OrdersError::UnknownStatus(_))));
        assert!(matches!(Change::ship("cancelled"), Err(OrdersError::UseCancel)));
        assert_eq!(
            Change::ship(" in_transit ").unwrap(),
            Change::Ship(ShippingStatus::InTransit)
        );
    }

    #[test]
    fn test_cancel_needs_reason() {
        assert!(matches!(
            Change::cancel("other", None),
            Err(OrdersError::Transition(TransitionError::MissingCancelReason))
        ));
        assert_eq!(
            Change::cancel("other", Some("Khách đặt trùng")).unwrap(),
            Change::Cancel(CancelReason::Other("Khách đặt trùng".to_owned()))
        );
    }

    #[test]
    fn test_delivered_marks_payment_completed() {
        let update = Change::Ship(ShippingStatus::Delivered)
            .plan(&order("in_transit", "pending", "none"))
            .unwrap();
        assert_eq!(update.shipping_status, Some(ShippingStatus::Delivered));
        assert_eq!(update.payment_status, Some(PaymentStatus::Completed));
    }

    #[test]
    fn test_cancel_refused_after_shipping() {
        let change = Change::cancel("out_of_stock", None).unwrap();
        let err = change
            .plan(&order("in_transit", "pending", "none"))
            .unwrap_err();
        assert_eq!(err, TransitionError::NotCancellable(ShippingStatus::InTransit));
    }

    #[test]
    fn test_return_decision_requires_request() {
        let change = Change::Return(ReturnDecision::Approve);
        assert!(change.plan(&order("delivered", "completed", "none")).is_err());

        let update = change
            .plan(&order("delivered", "completed", "requested"))
            .unwrap();
        assert_eq!(update.return_status, Some(ReturnStatus::Approved));
        assert_eq!(update.shipping_status, Some(ShippingStatus::Returned));
    }

    #[test]
    fn test_detail_lists_next_steps() {
        let mut out = Vec::new();
        write_order_detail(&mut out, &order("pending", "pending", "none")).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Order #A7B8C9D0"));
        assert!(text.contains("Áo thun x2"));
        assert!(text.contains("Next: ship in_transit, cancel"));
    }

    #[test]
    fn test_empty_table() {
        let mut out = Vec::new();
        write_order_table(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No orders.\n");
    }
}
