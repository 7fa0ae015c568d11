//! Client view of an order.
//!
//! The authoritative order lives in the backend. This is the shape the
//! storefront and admin read back; fields the UI does not need are ignored,
//! and fields older documents lack fall back to defaults.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{OrderId, ProductId, UserId};
use super::price::Price;
use super::status::{PaymentStatus, ReturnStatus, ShippingStatus};

/// An order as returned by `/api/orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default, rename = "user")]
    pub customer: Option<UserRef>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default, alias = "totalPrice", alias = "totalAmount")]
    pub total: Price,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "shippingAddress")]
    pub address: Option<Address>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub shipping_status: ShippingStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub return_status: ReturnStatus,
    #[serde(default)]
    pub cancel_reason: Option<String>,
    #[serde(default)]
    pub return_reason: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Best display name for the buyer.
    #[must_use]
    pub fn customer_name(&self) -> String {
        if let Some(name) = self.full_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.trim().to_owned();
        }
        if let Some(UserRef::Embedded {
            username: Some(name),
            ..
        }) = &self.customer
        {
            return name.clone();
        }
        self.email
            .clone()
            .or_else(|| self.customer.as_ref().and_then(UserRef::email))
            .unwrap_or_else(|| "Khách vãng lai".to_owned())
    }

    /// ID of the account that placed the order, if known.
    #[must_use]
    pub fn customer_id(&self) -> Option<&UserId> {
        self.customer.as_ref().map(UserRef::id)
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Short reference shown in tables (last 8 characters of the ID).
    #[must_use]
    pub fn short_ref(&self) -> String {
        let id = self.id.as_str();
        let start = id.len().saturating_sub(8);
        id.get(start..).unwrap_or(id).to_uppercase()
    }
}

/// Reference to the ordering account: a bare ID or a populated user document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(UserId),
    Embedded {
        #[serde(rename = "_id")]
        id: UserId,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        email: Option<String>,
    },
}

impl UserRef {
    #[must_use]
    pub const fn id(&self) -> &UserId {
        match self {
            Self::Id(id) | Self::Embedded { id, .. } => id,
        }
    }

    #[must_use]
    pub fn email(&self) -> Option<String> {
        match self {
            Self::Id(_) => None,
            Self::Embedded { email, .. } => email.clone(),
        }
    }
}

/// Delivery address: free text on older orders, structured on newer ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Address {
    Text(String),
    Structured {
        #[serde(default, alias = "addressLine")]
        street: Option<String>,
        #[serde(default)]
        ward: Option<String>,
        #[serde(default)]
        district: Option<String>,
        #[serde(default, alias = "province")]
        city: Option<String>,
    },
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Structured {
                street,
                ward,
                district,
                city,
            } => {
                let parts: Vec<&str> = [street, ward, district, city]
                    .into_iter()
                    .filter_map(|part| part.as_deref())
                    .filter(|part| !part.trim().is_empty())
                    .collect();
                f.write_str(&parts.join(", "))
            }
        }
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub product: Option<ProductRef>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub price: Price,
}

const fn default_quantity() -> u32 {
    1
}

impl OrderItem {
    /// Display name, falling back to the populated product document.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| match &self.product {
                Some(ProductRef::Embedded { name, .. }) => name.clone(),
                _ => None,
            })
            .unwrap_or_else(|| "Sản phẩm".to_owned())
    }

    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// Reference to an ordered product: a bare ID or a populated product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Id(ProductId),
    Embedded {
        #[serde(rename = "_id")]
        id: ProductId,
        #[serde(default)]
        name: Option<String>,
    },
}

impl ProductRef {
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        match self {
            Self::Id(id) | Self::Embedded { id, .. } => id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_minimal_order() {
        let order: Order = serde_json::from_value(json!({
            "_id": "o1",
            "shippingStatus": "pending",
            "paymentStatus": "pending"
        }))
        .unwrap();

        assert_eq!(order.id.as_str(), "o1");
        assert_eq!(order.shipping_status, ShippingStatus::Pending);
        assert_eq!(order.return_status, ReturnStatus::NotRequested);
        assert_eq!(order.total, Price::ZERO);
        assert!(order.items.is_empty());
    }

    #[test]
    fn test_deserialize_populated_order() {
        let order: Order = serde_json::from_value(json!({
            "_id": "66b0f3c2a1d4e5f6a7b8c9d0",
            "user": {"_id": "u1", "username": "lan", "email": "lan@example.com"},
            "items": [
                {"product": {"_id": "p1", "name": "Áo thun"}, "quantity": 2, "price": 150000},
                {"product": "p2", "name": "Mũ", "price": "90000"}
            ],
            "totalPrice": 390000,
            "shippingAddress": {"street": "12 Lê Lợi", "district": "Quận 1", "city": "TP.HCM"},
            "shippingStatus": "in_transit",
            "paymentStatus": "completed",
            "returnStatus": "requested",
            "returnReason": "Sai kích cỡ",
            "createdAt": "2024-08-05T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(order.customer_name(), "lan");
        assert_eq!(order.customer_id().unwrap().as_str(), "u1");
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.total, Price::from_dong(390_000));
        assert_eq!(order.items[0].display_name(), "Áo thun");
        assert_eq!(order.items[0].line_total(), Price::from_dong(300_000));
        assert_eq!(order.items[1].display_name(), "Mũ");
        assert_eq!(
            order.address.as_ref().unwrap().to_string(),
            "12 Lê Lợi, Quận 1, TP.HCM"
        );
        assert_eq!(order.short_ref(), "A7B8C9D0");
    }

    #[test]
    fn test_customer_name_fallbacks() {
        let order: Order = serde_json::from_value(json!({
            "_id": "o2",
            "fullName": "  Nguyễn Văn A ",
            "user": "u9"
        }))
        .unwrap();
        assert_eq!(order.customer_name(), "Nguyễn Văn A");

        let guest: Order = serde_json::from_value(json!({"_id": "o3"})).unwrap();
        assert_eq!(guest.customer_name(), "Khách vãng lai");
    }
}
