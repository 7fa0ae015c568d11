//! Order view types for templates.

use serde::Deserialize;
use zeal_core::{Order, OrderItem, display_datetime};

/// Query parameters for the orders list.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub q: Option<String>,
    pub shipping: Option<String>,
    pub payment: Option<String>,
    #[serde(rename = "return")]
    pub return_status: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub page: Option<String>,
}

/// Order row in the list and on the dashboard.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub id: String,
    pub short_ref: String,
    pub customer: String,
    pub phone: String,
    pub item_count: u32,
    pub total: String,
    pub shipping_status: &'static str,
    pub shipping_label: &'static str,
    pub payment_status: &'static str,
    pub payment_label: &'static str,
    pub return_status: &'static str,
    pub return_label: &'static str,
    pub created_at: String,
}

impl From<&Order> for OrderRowView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            short_ref: order.short_ref(),
            customer: order.customer_name(),
            phone: order.phone.clone().unwrap_or_default(),
            item_count: order.item_count(),
            total: order.total.to_string(),
            shipping_status: order.shipping_status.as_str(),
            shipping_label: order.shipping_status.label(),
            payment_status: order.payment_status.as_str(),
            payment_label: order.payment_status.label(),
            return_status: order.return_status.as_str(),
            return_label: order.return_status.label(),
            created_at: display_datetime(order.created_at.as_ref()),
        }
    }
}

/// Line item on the detail page.
#[derive(Debug, Clone)]
pub struct LineItemView {
    pub name: String,
    pub product_id: Option<String>,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&OrderItem> for LineItemView {
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

/// Everything the detail page shows about an order.
#[derive(Debug, Clone)]
pub struct OrderDetailView {
    pub row: OrderRowView,
    pub email: String,
    pub address: String,
    pub payment_method: String,
    pub note: Option<String>,
    pub cancel_reason: Option<String>,
    pub return_reason: Option<String>,
    pub items: Vec<LineItemView>,
    pub updated_at: String,
}

impl From<&Order> for OrderDetailView {
    fn from(order: &Order) -> Self {
        let cancel_reason = order
            .cancel_reason
            .as_deref()
            .map(|reason| zeal_core::CancelReason::parse(reason).label().to_owned());
        Self {
            row: OrderRowView::from(order),
            email: order
                .email
                .clone()
                .or_else(|| order.customer.as_ref().and_then(zeal_core::UserRef::email))
                .unwrap_or_default(),
            address: order
                .address
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            payment_method: order
                .payment_method
                .clone()
                .unwrap_or_else(|| "COD".to_owned()),
            note: order.note.clone().filter(|n| !n.trim().is_empty()),
            cancel_reason,
            return_reason: order.return_reason.clone().filter(|r| !r.trim().is_empty()),
            items: order.items.iter().map(LineItemView::from).collect(),
            updated_at: display_datetime(order.updated_at.as_ref()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_detail_view_labels_cancel_reason() {
        let order: Order = serde_json::from_value(json!({
            "_id": "6650a1b2c3d4e5f6a7b8c9d0",
            "fullName": "Nguyễn Văn A",
            "shippingStatus": "cancelled",
            "cancelReason": "out_of_stock",
            "items": [{"product": "p1", "name": "Áo thun", "quantity": 2, "price": 150000}],
            "totalPrice": 300000
        }))
        .unwrap();
        let view = OrderDetailView::from(&order);

        assert_eq!(view.row.short_ref, "A7B8C9D0");
        assert_eq!(view.row.customer, "Nguyễn Văn A");
        assert_eq!(view.cancel_reason.as_deref(), Some("Hết hàng"));
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].quantity, 2);
        assert_eq!(view.payment_method, "COD");
    }
}
