//! Dashboard overview.

use askama::Template;
use axum::{extract::State, response::Html};
use tracing::instrument;
use zeal_core::{Order, PaymentStatus, Price, ReturnStatus, ShippingStatus};

use crate::error::AppError;
use crate::filters;
use crate::middleware::{Notifier, RequireAdmin};
use crate::routes::orders::OrderRowView;
use crate::routes::{Layout, render};
use crate::state::AppState;

/// Number of recent orders shown.
const RECENT_ORDERS: usize = 5;

/// Orders in one shipping status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCount {
    pub value: &'static str,
    pub label: &'static str,
    pub count: usize,
}

/// Figures derived from the full order list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStats {
    pub total_orders: usize,
    pub by_shipping: Vec<StatusCount>,
    /// Sum of orders whose payment completed.
    pub revenue: Price,
    pub return_requests: usize,
}

impl OrderStats {
    #[must_use]
    pub fn from_orders(orders: &[Order]) -> Self {
        let by_shipping = ShippingStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                value: status.as_str(),
                label: status.label(),
                count: orders
                    .iter()
                    .filter(|o| o.shipping_status == status)
                    .count(),
            })
            .collect();

        Self {
            total_orders: orders.len(),
            by_shipping,
            revenue: orders
                .iter()
                .filter(|o| o.payment_status == PaymentStatus::Completed)
                .map(|o| o.total)
                .sum(),
            return_requests: orders
                .iter()
                .filter(|o| o.return_status == ReturnStatus::Requested)
                .count(),
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    layout: Layout,
    stats: OrderStats,
    product_count: usize,
    category_count: usize,
    brand_count: usize,
    recent_orders: Vec<OrderRowView>,
}

/// GET /
#[instrument(skip(admin, state, notifier))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
) -> Result<Html<String>, AppError> {
    let api = state.api().with(admin.store());
    let (orders, products, categories, brands) = tokio::join!(
        api.list_orders(),
        api.list_products(),
        api.list_categories(),
        api.list_brands(),
    );
    let mut orders = orders?;

    // Catalog counts fall back to zero when their endpoint fails.
    let count = |result: Result<usize, zeal_api::ApiError>, what: &str| {
        result.unwrap_or_else(|e| {
            tracing::warn!(error = %e, what, "Dashboard count unavailable");
            0
        })
    };
    let product_count = count(products.map(|p| p.len()), "products");
    let category_count = count(categories.map(|c| c.len()), "categories");
    let brand_count = count(brands.map(|b| b.len()), "brands");

    let stats = OrderStats::from_orders(&orders);
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent_orders = orders
        .iter()
        .take(RECENT_ORDERS)
        .map(OrderRowView::from)
        .collect();

    let template = DashboardTemplate {
        layout: Layout::new(&admin, &notifier, "/").await,
        stats,
        product_count,
        category_count,
        brand_count,
        recent_orders,
    };
    Ok(render(&template))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn order(shipping: &str, payment: &str, ret: &str, total: i64) -> Order {
        serde_json::from_value(json!({
            "_id": format!("o-{shipping}-{payment}-{total}"),
            "shippingStatus": shipping,
            "paymentStatus": payment,
            "returnStatus": ret,
            "totalPrice": total,
        }))
        .unwrap()
    }

    #[test]
    fn test_stats_count_statuses_and_revenue() {
        let orders = vec![
            order("pending", "pending", "none", 100_000),
            order("delivered", "completed", "none", 250_000),
            order("delivered", "completed", "requested", 150_000),
            order("cancelled", "cancelled", "none", 90_000),
        ];
        let stats = OrderStats::from_orders(&orders);

        assert_eq!(stats.total_orders, 4);
        assert_eq!(stats.revenue, Price::from_dong(400_000));
        assert_eq!(stats.return_requests, 1);
        let delivered = stats
            .by_shipping
            .iter()
            .find(|s| s.value == "delivered")
            .unwrap();
        assert_eq!(delivered.count, 2);
        assert_eq!(stats.by_shipping.len(), ShippingStatus::ALL.len());
    }
}
