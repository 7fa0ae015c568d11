//! Status enums for orders and accounts.
//!
//! Wire values match the backend exactly (`snake_case`). Labels are the
//! Vietnamese strings shown in the storefront and admin UI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A status string that does not name any known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} status: {value}")]
pub struct StatusParseError {
    /// Which status family was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Delivery-pipeline state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShippingStatus {
    #[default]
    Pending,
    InTransit,
    Delivered,
    Returned,
    Cancelled,
}

impl ShippingStatus {
    /// Every shipping status, in pipeline order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::InTransit,
        Self::Delivered,
        Self::Returned,
        Self::Cancelled,
    ];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::Returned => "returned",
            Self::Cancelled => "cancelled",
        }
    }

    /// UI label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Chờ xử lý",
            Self::InTransit => "Đang vận chuyển",
            Self::Delivered => "Đã giao hàng",
            Self::Returned => "Đã hoàn trả",
            Self::Cancelled => "Đã hủy",
        }
    }

    /// No further shipping transitions exist from a terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Returned | Self::Cancelled)
    }
}

impl fmt::Display for ShippingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShippingStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusParseError {
                kind: "shipping",
                value: s.to_owned(),
            })
    }
}

/// Payment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl PaymentStatus {
    /// Every payment status.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Completed,
        Self::Failed,
        Self::Cancelled,
    ];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// UI label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Chờ thanh toán",
            Self::Completed => "Đã thanh toán",
            Self::Failed => "Thanh toán thất bại",
            Self::Cancelled => "Đã hủy thanh toán",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusParseError {
                kind: "payment",
                value: s.to_owned(),
            })
    }
}

/// Customer return-request state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReturnStatus {
    /// No return has been requested (`"none"` on the wire).
    #[default]
    #[serde(rename = "none")]
    NotRequested,
    Requested,
    Approved,
    Rejected,
}

impl ReturnStatus {
    /// Every return status.
    pub const ALL: [Self; 4] = [
        Self::NotRequested,
        Self::Requested,
        Self::Approved,
        Self::Rejected,
    ];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotRequested => "none",
            Self::Requested => "requested",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// UI label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotRequested => "Không có yêu cầu",
            Self::Requested => "Yêu cầu trả hàng",
            Self::Approved => "Đã chấp nhận trả hàng",
            Self::Rejected => "Đã từ chối trả hàng",
        }
    }
}

impl fmt::Display for ReturnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReturnStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusParseError {
                kind: "return",
                value: s.to_owned(),
            })
    }
}

/// Account role issued by the backend alongside the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    /// Whether this role may use the admin dashboard.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(StatusParseError {
                kind: "role",
                value: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shipping_wire_values() {
        assert_eq!(
            serde_json::to_string(&ShippingStatus::InTransit).unwrap(),
            "\"in_transit\""
        );
        let parsed: ShippingStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, ShippingStatus::Cancelled);
    }

    #[test]
    fn test_return_none_wire_value() {
        assert_eq!(
            serde_json::to_string(&ReturnStatus::NotRequested).unwrap(),
            "\"none\""
        );
        assert_eq!("none".parse::<ReturnStatus>().unwrap(), ReturnStatus::NotRequested);
    }

    #[test]
    fn test_terminal_shipping_states() {
        assert!(!ShippingStatus::Pending.is_terminal());
        assert!(!ShippingStatus::InTransit.is_terminal());
        assert!(ShippingStatus::Delivered.is_terminal());
        assert!(ShippingStatus::Returned.is_terminal());
        assert!(ShippingStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "shipped".parse::<ShippingStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown shipping status: shipped");
        assert!("refunded".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_role_parsing() {
        assert!("admin".parse::<Role>().unwrap().is_admin());
        assert!(!"user".parse::<Role>().unwrap().is_admin());
        assert!("root".parse::<Role>().is_err());
    }
}
