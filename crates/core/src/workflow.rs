//! Order status workflow.
//!
//! Decides which status changes an order may go through and builds the
//! payload that asks the backend to commit one. Nothing here talks to the
//! network: callers validate with this module first and only send the
//! resulting [`OrderStatusUpdate`] when validation succeeds.
//!
//! # Transition tables
//!
//! ```text
//! shipping:  pending ──► in_transit ──► delivered        (delivered ⇒ payment completed)
//!               │
//!               └──────► cancelled                       (reason required)
//!            delivered, returned, cancelled are terminal
//!
//! return:    requested ──► approved   (⇒ shipping returned, payment cancelled)
//!                 └──────► rejected
//!            none, approved, rejected accept no admin decision
//! ```
//!
//! Customers additionally move `none → requested` on delivered orders
//! (see [`request_return`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::types::{Order, PaymentStatus, ReturnStatus, ShippingStatus};

/// Which status family a transition request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Shipping,
    Return,
    Cancel,
}

impl TransitionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shipping => "shipping",
            Self::Return => "return",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitionKind {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shipping" => Ok(Self::Shipping),
            "return" => Ok(Self::Return),
            "cancel" => Ok(Self::Cancel),
            other => Err(TransitionError::UnknownStatus(other.to_owned())),
        }
    }
}

/// Why a transition was refused before any request was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("invalid {kind} transition from {from} to {to}")]
    InvalidTransition {
        kind: TransitionKind,
        from: String,
        to: String,
    },
    #[error("{kind} status is already {status}")]
    Unchanged {
        kind: TransitionKind,
        status: String,
    },
    #[error("cancellation requires a reason")]
    MissingCancelReason,
    #[error("order can only be cancelled while pending, current status is {0}")]
    NotCancellable(ShippingStatus),
    #[error("return request requires a reason")]
    MissingReturnReason,
    #[error("order is not eligible for a return")]
    NotReturnable,
    #[error("unknown status or kind: {0}")]
    UnknownStatus(String),
}

impl TransitionError {
    /// Message suitable for a toast.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } | Self::UnknownStatus(_) => {
                "Chuyển trạng thái không hợp lệ"
            }
            Self::Unchanged { .. } => "Trạng thái không thay đổi",
            Self::MissingCancelReason => "Vui lòng chọn hoặc nhập lý do hủy đơn",
            Self::NotCancellable(_) => "Chỉ có thể hủy đơn hàng đang chờ xử lý",
            Self::MissingReturnReason => "Vui lòng nhập lý do trả hàng",
            Self::NotReturnable => "Đơn hàng không đủ điều kiện trả hàng",
        }
    }
}

/// Reason recorded when an order is cancelled.
///
/// Preset reasons serialize to their code; [`CancelReason::Other`] serializes
/// to the free text the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CancelReason {
    OutOfStock,
    CustomerRequest,
    WrongInformation,
    PaymentIssue,
    Other(String),
}

impl CancelReason {
    /// Form value that switches the reason picker to free text.
    pub const OTHER_VALUE: &'static str = "other";

    /// Preset reasons in picker order.
    pub const PRESETS: [Self; 4] = [
        Self::OutOfStock,
        Self::CustomerRequest,
        Self::WrongInformation,
        Self::PaymentIssue,
    ];

    /// Wire value (the preset code, or the free text).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::OutOfStock => "out_of_stock",
            Self::CustomerRequest => "customer_request",
            Self::WrongInformation => "wrong_information",
            Self::PaymentIssue => "payment_issue",
            Self::Other(text) => text,
        }
    }

    /// UI label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::OutOfStock => "Hết hàng",
            Self::CustomerRequest => "Khách hàng yêu cầu hủy",
            Self::WrongInformation => "Thông tin đặt hàng không chính xác",
            Self::PaymentIssue => "Vấn đề thanh toán",
            Self::Other(text) => text,
        }
    }

    /// Build a reason from the picker value and the free-text box.
    ///
    /// Returns `None` when nothing usable was chosen: an empty selection, or
    /// "other" with blank text.
    #[must_use]
    pub fn from_form(selected: &str, other_text: Option<&str>) -> Option<Self> {
        let selected = selected.trim();
        if selected == Self::OTHER_VALUE {
            return other_text
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(|text| Self::Other(text.to_owned()));
        }
        if selected.is_empty() {
            return None;
        }
        Some(Self::parse(selected))
    }

    /// Map a stored value back to a reason; unknown values become free text.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        Self::PRESETS
            .into_iter()
            .find(|preset| preset.as_str() == value)
            .unwrap_or_else(|| Self::Other(value.to_owned()))
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for CancelReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CancelReason {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// Payload for `PUT /api/orders/update/{id}`.
///
/// Only fields that change are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_status: Option<ShippingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_status: Option<ReturnStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<CancelReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_reason: Option<String>,
}

impl OrderStatusUpdate {
    /// Apply the update to an order document, as the backend does on commit.
    pub fn apply(&self, order: &mut Order) {
        if let Some(status) = self.shipping_status {
            order.shipping_status = status;
        }
        if let Some(status) = self.payment_status {
            order.payment_status = status;
        }
        if let Some(status) = self.return_status {
            order.return_status = status;
        }
        if let Some(reason) = &self.cancel_reason {
            order.cancel_reason = Some(reason.as_str().to_owned());
        }
        if let Some(reason) = &self.return_reason {
            order.return_reason = Some(reason.clone());
        }
    }

    /// Short description for logs and toasts.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(status) = self.shipping_status {
            parts.push(status.label());
        }
        if let Some(status) = self.return_status {
            parts.push(status.label());
        }
        if let Some(status) = self.payment_status {
            parts.push(status.label());
        }
        parts.join(", ")
    }
}

/// Outcome of validating a transition request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionPlan {
    /// Valid; send this payload.
    Submit(OrderStatusUpdate),
    /// Cancellation; collect a reason and call [`confirm_cancel`].
    ConfirmCancel,
}

/// Shipping statuses reachable from `current`.
#[must_use]
pub const fn allowed_shipping_targets(current: ShippingStatus) -> &'static [ShippingStatus] {
    match current {
        ShippingStatus::Pending => &[ShippingStatus::InTransit, ShippingStatus::Cancelled],
        ShippingStatus::InTransit => &[ShippingStatus::Delivered],
        ShippingStatus::Delivered | ShippingStatus::Returned | ShippingStatus::Cancelled => &[],
    }
}

/// Return decisions available from `current`.
#[must_use]
pub const fn allowed_return_targets(current: ReturnStatus) -> &'static [ReturnStatus] {
    match current {
        ReturnStatus::Requested => &[ReturnStatus::Approved, ReturnStatus::Rejected],
        ReturnStatus::NotRequested | ReturnStatus::Approved | ReturnStatus::Rejected => &[],
    }
}

/// Whether the order may still be cancelled.
#[must_use]
pub fn can_cancel(order: &Order) -> bool {
    order.shipping_status == ShippingStatus::Pending
}

/// Whether a customer may request a return for the order.
#[must_use]
pub fn can_request_return(order: &Order) -> bool {
    order.shipping_status == ShippingStatus::Delivered
        && order.return_status == ReturnStatus::NotRequested
}

/// Whether the shipping selector offers any change.
#[must_use]
pub fn offers_shipping_change(order: &Order) -> bool {
    !allowed_shipping_targets(order.shipping_status).is_empty()
}

/// Whether an admin return decision is pending.
#[must_use]
pub fn offers_return_decision(order: &Order) -> bool {
    !allowed_return_targets(order.return_status).is_empty()
}

/// One row of a status selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
    pub enabled: bool,
}

/// Every shipping status, with only the legal next states enabled.
#[must_use]
pub fn shipping_options(order: &Order) -> Vec<StatusOption> {
    let allowed = allowed_shipping_targets(order.shipping_status);
    ShippingStatus::ALL
        .into_iter()
        .map(|status| StatusOption {
            value: status.as_str(),
            label: status.label(),
            selected: status == order.shipping_status,
            enabled: allowed.contains(&status),
        })
        .collect()
}

/// Every return status, with only the legal decisions enabled.
#[must_use]
pub fn return_options(order: &Order) -> Vec<StatusOption> {
    let allowed = allowed_return_targets(order.return_status);
    ReturnStatus::ALL
        .into_iter()
        .map(|status| StatusOption {
            value: status.as_str(),
            label: status.label(),
            selected: status == order.return_status,
            enabled: allowed.contains(&status),
        })
        .collect()
}

/// Validate a requested status change.
///
/// `target` is the wire value of the desired status. For
/// [`TransitionKind::Cancel`] it may be empty or `"cancelled"`.
///
/// # Errors
///
/// Returns a [`TransitionError`] when the target is unknown or not reachable
/// from the order's current status. No request should be sent in that case.
pub fn request_transition(
    order: &Order,
    kind: TransitionKind,
    target: &str,
) -> Result<TransitionPlan, TransitionError> {
    match kind {
        TransitionKind::Cancel => {
            let target = target.trim();
            if !target.is_empty() && target != ShippingStatus::Cancelled.as_str() {
                return Err(TransitionError::UnknownStatus(target.to_owned()));
            }
            if can_cancel(order) {
                Ok(TransitionPlan::ConfirmCancel)
            } else {
                Err(TransitionError::NotCancellable(order.shipping_status))
            }
        }
        TransitionKind::Shipping => {
            let target: ShippingStatus = target
                .parse()
                .map_err(|_| TransitionError::UnknownStatus(target.to_owned()))?;
            plan_shipping(order, target)
        }
        TransitionKind::Return => {
            let target: ReturnStatus = target
                .parse()
                .map_err(|_| TransitionError::UnknownStatus(target.to_owned()))?;
            plan_return(order, target).map(TransitionPlan::Submit)
        }
    }
}

fn plan_shipping(order: &Order, target: ShippingStatus) -> Result<TransitionPlan, TransitionError> {
    let current = order.shipping_status;
    if target == current {
        return Err(TransitionError::Unchanged {
            kind: TransitionKind::Shipping,
            status: current.to_string(),
        });
    }
    if !allowed_shipping_targets(current).contains(&target) {
        return Err(TransitionError::InvalidTransition {
            kind: TransitionKind::Shipping,
            from: current.to_string(),
            to: target.to_string(),
        });
    }

    let update = match target {
        ShippingStatus::Cancelled => return Ok(TransitionPlan::ConfirmCancel),
        ShippingStatus::Delivered => OrderStatusUpdate {
            shipping_status: Some(ShippingStatus::Delivered),
            payment_status: Some(PaymentStatus::Completed),
            ..OrderStatusUpdate::default()
        },
        other => OrderStatusUpdate {
            shipping_status: Some(other),
            ..OrderStatusUpdate::default()
        },
    };
    Ok(TransitionPlan::Submit(update))
}

fn plan_return(order: &Order, target: ReturnStatus) -> Result<OrderStatusUpdate, TransitionError> {
    let current = order.return_status;
    if target == current {
        return Err(TransitionError::Unchanged {
            kind: TransitionKind::Return,
            status: current.to_string(),
        });
    }
    if !allowed_return_targets(current).contains(&target) {
        return Err(TransitionError::InvalidTransition {
            kind: TransitionKind::Return,
            from: current.to_string(),
            to: target.to_string(),
        });
    }

    Ok(match target {
        ReturnStatus::Approved => OrderStatusUpdate {
            return_status: Some(ReturnStatus::Approved),
            shipping_status: Some(ShippingStatus::Returned),
            payment_status: Some(PaymentStatus::Cancelled),
            ..OrderStatusUpdate::default()
        },
        other => OrderStatusUpdate {
            return_status: Some(other),
            ..OrderStatusUpdate::default()
        },
    })
}

/// Build the cancellation payload once a reason has been collected.
///
/// Payment is only marked cancelled when it had already completed; pending
/// or failed payments are left for the backend to settle.
///
/// # Errors
///
/// [`TransitionError::NotCancellable`] when the order has left `pending`,
/// [`TransitionError::MissingCancelReason`] when no reason was given.
pub fn confirm_cancel(
    order: &Order,
    reason: Option<CancelReason>,
) -> Result<OrderStatusUpdate, TransitionError> {
    if !can_cancel(order) {
        return Err(TransitionError::NotCancellable(order.shipping_status));
    }
    let reason = reason
        .filter(|reason| !reason.as_str().trim().is_empty())
        .ok_or(TransitionError::MissingCancelReason)?;

    Ok(OrderStatusUpdate {
        shipping_status: Some(ShippingStatus::Cancelled),
        payment_status: (order.payment_status == PaymentStatus::Completed)
            .then_some(PaymentStatus::Cancelled),
        cancel_reason: Some(reason),
        ..OrderStatusUpdate::default()
    })
}

/// Build the payload for a customer's return request.
///
/// # Errors
///
/// [`TransitionError::NotReturnable`] unless the order was delivered and no
/// return was requested yet; [`TransitionError::MissingReturnReason`] when
/// the reason is blank.
pub fn request_return(order: &Order, reason: &str) -> Result<OrderStatusUpdate, TransitionError> {
    if !can_request_return(order) {
        return Err(TransitionError::NotReturnable);
    }
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(TransitionError::MissingReturnReason);
    }

    Ok(OrderStatusUpdate {
        return_status: Some(ReturnStatus::Requested),
        return_reason: Some(reason.to_owned()),
        ..OrderStatusUpdate::default()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn order(shipping: ShippingStatus, payment: PaymentStatus, ret: ReturnStatus) -> Order {
        let mut order: Order = serde_json::from_value(json!({"_id": "o1"})).unwrap();
        order.shipping_status = shipping;
        order.payment_status = payment;
        order.return_status = ret;
        order
    }

    fn pending() -> Order {
        order(
            ShippingStatus::Pending,
            PaymentStatus::Pending,
            ReturnStatus::NotRequested,
        )
    }

    fn enabled_values(options: &[StatusOption]) -> Vec<&'static str> {
        options.iter().filter(|o| o.enabled).map(|o| o.value).collect()
    }

    #[test]
    fn test_pending_offers_only_in_transit_and_cancelled() {
        let options = shipping_options(&pending());
        assert_eq!(enabled_values(&options), vec!["in_transit", "cancelled"]);
        assert!(options.iter().any(|o| o.value == "pending" && o.selected && !o.enabled));
    }

    #[test]
    fn test_terminal_states_offer_no_shipping_change() {
        for status in [
            ShippingStatus::Delivered,
            ShippingStatus::Returned,
            ShippingStatus::Cancelled,
        ] {
            let order = order(status, PaymentStatus::Completed, ReturnStatus::NotRequested);
            assert!(!offers_shipping_change(&order));
            assert!(enabled_values(&shipping_options(&order)).is_empty());
            for target in ShippingStatus::ALL {
                assert!(request_transition(&order, TransitionKind::Shipping, target.as_str()).is_err());
            }
        }
    }

    #[test]
    fn test_in_transit_only_reaches_delivered() {
        let order = order(
            ShippingStatus::InTransit,
            PaymentStatus::Pending,
            ReturnStatus::NotRequested,
        );
        assert_eq!(enabled_values(&shipping_options(&order)), vec!["delivered"]);

        let err = request_transition(&order, TransitionKind::Shipping, "pending").unwrap_err();
        assert!(matches!(err, TransitionError::InvalidTransition { .. }));
        assert_eq!(err.user_message(), "Chuyển trạng thái không hợp lệ");
    }

    #[test]
    fn test_delivered_forces_payment_completed() {
        let order = order(
            ShippingStatus::InTransit,
            PaymentStatus::Pending,
            ReturnStatus::NotRequested,
        );
        let plan = request_transition(&order, TransitionKind::Shipping, "delivered").unwrap();
        let TransitionPlan::Submit(update) = plan else {
            panic!("expected submit plan");
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"shippingStatus": "delivered", "paymentStatus": "completed"})
        );
    }

    #[test]
    fn test_in_transit_payload_has_no_side_effects() {
        let plan = request_transition(&pending(), TransitionKind::Shipping, "in_transit").unwrap();
        assert_eq!(
            plan,
            TransitionPlan::Submit(OrderStatusUpdate {
                shipping_status: Some(ShippingStatus::InTransit),
                ..OrderStatusUpdate::default()
            })
        );
    }

    #[test]
    fn test_cancel_goes_through_confirmation() {
        assert_eq!(
            request_transition(&pending(), TransitionKind::Shipping, "cancelled").unwrap(),
            TransitionPlan::ConfirmCancel
        );
        assert_eq!(
            request_transition(&pending(), TransitionKind::Cancel, "").unwrap(),
            TransitionPlan::ConfirmCancel
        );
    }

    #[test]
    fn test_cancel_without_reason_is_rejected() {
        assert_eq!(
            confirm_cancel(&pending(), None),
            Err(TransitionError::MissingCancelReason)
        );
        assert_eq!(CancelReason::from_form("", None), None);
        assert_eq!(CancelReason::from_form("other", Some("   ")), None);
    }

    #[test]
    fn test_cancel_scenario_payload() {
        let reason = CancelReason::from_form("out_of_stock", None);
        let update = confirm_cancel(&pending(), reason).unwrap();
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"shippingStatus": "cancelled", "cancelReason": "out_of_stock"})
        );
    }

    #[test]
    fn test_cancel_of_paid_order_cancels_payment() {
        let paid = order(
            ShippingStatus::Pending,
            PaymentStatus::Completed,
            ReturnStatus::NotRequested,
        );
        let update = confirm_cancel(&paid, CancelReason::from_form("other", Some("Đổi ý"))).unwrap();
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({
                "shippingStatus": "cancelled",
                "paymentStatus": "cancelled",
                "cancelReason": "Đổi ý"
            })
        );
    }

    #[test]
    fn test_cancel_after_shipping_is_refused() {
        let shipped = order(
            ShippingStatus::InTransit,
            PaymentStatus::Pending,
            ReturnStatus::NotRequested,
        );
        assert_eq!(
            request_transition(&shipped, TransitionKind::Cancel, "cancelled"),
            Err(TransitionError::NotCancellable(ShippingStatus::InTransit))
        );
        assert!(confirm_cancel(&shipped, Some(CancelReason::OutOfStock)).is_err());
    }

    #[test]
    fn test_return_approval_forces_side_effects() {
        let requested = order(
            ShippingStatus::Delivered,
            PaymentStatus::Completed,
            ReturnStatus::Requested,
        );
        assert!(offers_return_decision(&requested));
        assert_eq!(
            enabled_values(&return_options(&requested)),
            vec!["approved", "rejected"]
        );

        let TransitionPlan::Submit(update) =
            request_transition(&requested, TransitionKind::Return, "approved").unwrap()
        else {
            panic!("expected submit plan");
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({
                "returnStatus": "approved",
                "shippingStatus": "returned",
                "paymentStatus": "cancelled"
            })
        );
    }

    #[test]
    fn test_return_rejection_touches_only_return_status() {
        let requested = order(
            ShippingStatus::Delivered,
            PaymentStatus::Completed,
            ReturnStatus::Requested,
        );
        let plan = request_transition(&requested, TransitionKind::Return, "rejected").unwrap();
        assert_eq!(
            plan,
            TransitionPlan::Submit(OrderStatusUpdate {
                return_status: Some(ReturnStatus::Rejected),
                ..OrderStatusUpdate::default()
            })
        );
    }

    #[test]
    fn test_return_decisions_only_from_requested() {
        for status in [
            ReturnStatus::NotRequested,
            ReturnStatus::Approved,
            ReturnStatus::Rejected,
        ] {
            let order = order(ShippingStatus::Delivered, PaymentStatus::Completed, status);
            assert!(!offers_return_decision(&order));
            assert!(request_transition(&order, TransitionKind::Return, "approved").is_err());
        }
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        assert_eq!(
            request_transition(&pending(), TransitionKind::Shipping, "shipped"),
            Err(TransitionError::UnknownStatus("shipped".to_owned()))
        );
        assert!("refund".parse::<TransitionKind>().is_err());
    }

    #[test]
    fn test_customer_return_request() {
        let delivered = order(
            ShippingStatus::Delivered,
            PaymentStatus::Completed,
            ReturnStatus::NotRequested,
        );
        assert_eq!(
            request_return(&delivered, "  "),
            Err(TransitionError::MissingReturnReason)
        );
        let update = request_return(&delivered, "Sản phẩm lỗi").unwrap();
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"returnStatus": "requested", "returnReason": "Sản phẩm lỗi"})
        );

        assert_eq!(
            request_return(&pending(), "Sản phẩm lỗi"),
            Err(TransitionError::NotReturnable)
        );
    }

    #[test]
    fn test_apply_mirrors_backend_commit() {
        let mut order = pending();
        let update = confirm_cancel(&order, Some(CancelReason::OutOfStock)).unwrap();
        update.apply(&mut order);
        assert_eq!(order.shipping_status, ShippingStatus::Cancelled);
        assert_eq!(order.cancel_reason.as_deref(), Some("out_of_stock"));
        assert_eq!(order.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn test_cancel_reason_round_trips_presets_and_free_text() {
        assert_eq!(CancelReason::parse("payment_issue"), CancelReason::PaymentIssue);
        assert_eq!(
            CancelReason::parse("Khách đặt nhầm"),
            CancelReason::Other("Khách đặt nhầm".to_owned())
        );
        let reason: CancelReason = serde_json::from_str("\"out_of_stock\"").unwrap();
        assert_eq!(reason.label(), "Hết hàng");
    }
}
