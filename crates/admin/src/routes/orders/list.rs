//! Orders list page handler.

use askama::Template;
use axum::{
    extract::{Query, State},
    response::Html,
};
use tracing::instrument;
use zeal_core::listing::{self, SortDirection, non_blank};
use zeal_core::pagination::{DEFAULT_PER_PAGE, Page};
use zeal_core::{Order, PaymentStatus, ReturnStatus, ShippingStatus};

use crate::components::{DataTableConfig, Pager, TableColumn, TableFilter, TableState};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{Notifier, RequireAdmin};
use crate::routes::{Layout, page_param, render};
use crate::state::AppState;

use super::types::{OrderRowView, OrdersQuery};

/// Orders list page template.
#[derive(Template)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub layout: Layout,
    pub table: DataTableConfig,
    pub state: TableState,
    pub orders: Vec<OrderRowView>,
    pub pager: Pager,
}

fn table_config() -> DataTableConfig {
    DataTableConfig::new("orders")
        .column(TableColumn::new("ref", "Mã đơn"))
        .column(TableColumn::sortable("customer", "Khách hàng"))
        .column(TableColumn::new("items", "Số lượng"))
        .column(TableColumn::sortable("total", "Tổng tiền"))
        .column(TableColumn::sortable("shipping", "Vận chuyển"))
        .column(TableColumn::new("payment", "Thanh toán"))
        .column(TableColumn::new("return", "Trả hàng"))
        .column(TableColumn::sortable("created", "Ngày đặt"))
        .search_placeholder("Tìm theo mã đơn, tên, số điện thoại, email...")
        .empty_state("Chưa có đơn hàng", Some("Đơn hàng mới sẽ xuất hiện tại đây."))
}

/// Filter and sort orders in place according to the query.
///
/// Unknown status values are ignored rather than matching nothing. Without
/// an explicit sort the newest orders come first.
pub fn apply_query(orders: &mut Vec<Order>, query: &OrdersQuery) {
    let shipping = non_blank(query.shipping.as_deref()).and_then(|s| s.parse::<ShippingStatus>().ok());
    let payment = non_blank(query.payment.as_deref()).and_then(|s| s.parse::<PaymentStatus>().ok());
    let returns =
        non_blank(query.return_status.as_deref()).and_then(|s| s.parse::<ReturnStatus>().ok());

    orders.retain(|o| {
        shipping.is_none_or(|s| o.shipping_status == s)
            && payment.is_none_or(|s| o.payment_status == s)
            && returns.is_none_or(|s| o.return_status == s)
    });

    if let Some(q) = non_blank(query.q.as_deref()) {
        orders.retain(|o| {
            let name = o.customer_name();
            listing::matches_query(
                q,
                [
                    o.id.as_str(),
                    name.as_str(),
                    o.phone.as_deref().unwrap_or_default(),
                    o.email.as_deref().unwrap_or_default(),
                ],
            )
        });
    }

    let dir: SortDirection = query
        .dir
        .as_deref()
        .and_then(|d| d.parse().ok())
        .unwrap_or_default();
    match non_blank(query.sort.as_deref()) {
        Some("customer") => listing::sort_by_key(orders, dir, |o| listing::fold(&o.customer_name())),
        Some("total") => listing::sort_by_key(orders, dir, |o| o.total),
        Some("shipping") => listing::sort_by_key(orders, dir, |o| o.shipping_status.as_str()),
        Some("created") => listing::sort_by_key(orders, dir, |o| o.created_at),
        _ => listing::sort_by_key(orders, SortDirection::Desc, |o| o.created_at),
    }
}

/// Orders list page handler.
///
/// GET /orders
#[instrument(skip(admin, state, notifier))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Query(query): Query<OrdersQuery>,
) -> Result<Html<String>, AppError> {
    let mut orders = state.api().with(admin.store()).list_orders().await?;
    apply_query(&mut orders, &query);

    let page = Page::paginate(orders, page_param(query.page.as_deref()), DEFAULT_PER_PAGE);
    let dir = query
        .dir
        .as_deref()
        .and_then(|d| d.parse().ok())
        .unwrap_or_default();
    let table_state = TableState::new("/orders", query.q.as_deref())
        .filtered("shipping", query.shipping.as_deref())
        .filtered("payment", query.payment.as_deref())
        .filtered("return", query.return_status.as_deref())
        .sorted(query.sort.as_deref(), dir);
    let pager = Pager::new(&page, &table_state);

    let table = table_config()
        .filter(
            TableFilter::from_pairs(
                "shipping",
                "Vận chuyển",
                ShippingStatus::ALL.map(|s| (s.as_str(), s.label())),
            )
            .with_selected(query.shipping.as_deref()),
        )
        .filter(
            TableFilter::from_pairs(
                "payment",
                "Thanh toán",
                PaymentStatus::ALL.map(|s| (s.as_str(), s.label())),
            )
            .with_selected(query.payment.as_deref()),
        )
        .filter(
            TableFilter::from_pairs(
                "return",
                "Trả hàng",
                ReturnStatus::ALL.map(|s| (s.as_str(), s.label())),
            )
            .with_selected(query.return_status.as_deref()),
        );

    let template = OrdersIndexTemplate {
        layout: Layout::new(&admin, &notifier, "/orders").await,
        table,
        state: table_state,
        orders: page.items.iter().map(OrderRowView::from).collect(),
        pager,
    };
    Ok(render(&template))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn orders() -> Vec<Order> {
        serde_json::from_value(json!([
            {"_id": "o1", "fullName": "Trần Thị Bình", "shippingStatus": "pending",
             "paymentStatus": "pending", "totalPrice": 200000,
             "createdAt": "2026-10-01T08:00:00Z"},
            {"_id": "o2", "fullName": "Lê Văn Cường", "shippingStatus": "delivered",
             "paymentStatus": "completed", "returnStatus": "requested", "totalPrice": 500000,
             "createdAt": "2026-10-03T08:00:00Z"},
            {"_id": "o3", "fullName": "Phạm Đức", "phone": "0901234567",
             "shippingStatus": "in_transit", "paymentStatus": "pending", "totalPrice": 100000,
             "createdAt": "2026-10-02T08:00:00Z"}
        ]))
        .unwrap()
    }

    fn ids(orders: &[Order]) -> Vec<&str> {
        orders.iter().map(|o| o.id.as_str()).collect()
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let mut list = orders();
        apply_query(&mut list, &OrdersQuery::default());
        assert_eq!(ids(&list), ["o2", "o3", "o1"]);
    }

    #[test]
    fn test_status_filters_and_search() {
        let mut list = orders();
        apply_query(
            &mut list,
            &OrdersQuery {
                return_status: Some("requested".into()),
                ..OrdersQuery::default()
            },
        );
        assert_eq!(ids(&list), ["o2"]);

        let mut list = orders();
        apply_query(
            &mut list,
            &OrdersQuery {
                q: Some("duc".into()),
                ..OrdersQuery::default()
            },
        );
        assert_eq!(ids(&list), ["o3"]);

        let mut list = orders();
        apply_query(
            &mut list,
            &OrdersQuery {
                q: Some("0901".into()),
                shipping: Some("bogus".into()),
                ..OrdersQuery::default()
            },
        );
        assert_eq!(ids(&list), ["o3"]);
    }

    #[test]
    fn test_sort_by_total_descending() {
        let mut list = orders();
        apply_query(
            &mut list,
            &OrdersQuery {
                sort: Some("total".into()),
                dir: Some("desc".into()),
                ..OrdersQuery::default()
            },
        );
        assert_eq!(ids(&list), ["o2", "o1", "o3"]);
    }
}
