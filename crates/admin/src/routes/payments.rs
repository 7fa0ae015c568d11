//! Payment records (read only).

use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    response::Html,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;
use zeal_api::{DocRef, Payment};
use zeal_core::listing::{self, SortDirection, non_blank};
use zeal_core::pagination::{DEFAULT_PER_PAGE, Page};
use zeal_core::{PaymentStatus, Price, display_datetime};

use crate::components::{DataTableConfig, Pager, TableColumn, TableFilter, TableState};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{Notifier, RequireAdmin};
use crate::routes::{Layout, page_param, render};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/payments", get(index))
}

#[derive(Debug, Default, Deserialize)]
pub struct PaymentsQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PaymentRowView {
    pub id: String,
    pub order_id: Option<String>,
    pub payer: String,
    pub amount: String,
    pub method: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub transaction_id: String,
    pub created_at: String,
}

impl From<&Payment> for PaymentRowView {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id.to_string(),
            order_id: payment.order.as_ref().map(|o| DocRef::id(o).to_owned()),
            payer: payment
                .user
                .as_ref()
                .map(|u| u.name().unwrap_or(u.id()).to_owned())
                .unwrap_or_default(),
            amount: payment.amount.to_string(),
            method: payment.method.clone().unwrap_or_else(|| "-".to_owned()),
            status: payment.status.as_str(),
            status_label: payment.status.label(),
            transaction_id: payment.transaction_id.clone().unwrap_or_default(),
            created_at: display_datetime(payment.created_at.as_ref()),
        }
    }
}

#[derive(Template)]
#[template(path = "payments/index.html")]
pub struct PaymentsIndexTemplate {
    pub layout: Layout,
    pub table: DataTableConfig,
    pub state: TableState,
    pub payments: Vec<PaymentRowView>,
    pub pager: Pager,
    /// Sum of completed payments after filtering.
    pub completed_total: String,
}

pub fn apply_query(payments: &mut Vec<Payment>, query: &PaymentsQuery) {
    if let Some(status) =
        non_blank(query.status.as_deref()).and_then(|s| s.parse::<PaymentStatus>().ok())
    {
        payments.retain(|p| p.status == status);
    }
    if let Some(q) = non_blank(query.q.as_deref()) {
        listing::filter_by_query(payments, q, |p| {
            vec![
                p.id.as_str(),
                p.transaction_id.as_deref().unwrap_or_default(),
                p.order.as_ref().map(DocRef::id).unwrap_or_default(),
            ]
        });
    }
    let dir: SortDirection = query
        .dir
        .as_deref()
        .and_then(|d| d.parse().ok())
        .unwrap_or_default();
    match non_blank(query.sort.as_deref()) {
        Some("amount") => listing::sort_by_key(payments, dir, |p| p.amount),
        Some("created") => listing::sort_by_key(payments, dir, |p| p.created_at),
        _ => listing::sort_by_key(payments, SortDirection::Desc, |p| p.created_at),
    }
}

/// GET /payments
#[instrument(skip(admin, state, notifier))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Query(query): Query<PaymentsQuery>,
) -> Result<Html<String>, AppError> {
    let mut payments = state.api().with(admin.store()).list_payments().await?;
    apply_query(&mut payments, &query);
    let completed_total: Price = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Completed)
        .map(|p| p.amount)
        .sum();
    let page = Page::paginate(payments, page_param(query.page.as_deref()), DEFAULT_PER_PAGE);

    let dir = query
        .dir
        .as_deref()
        .and_then(|d| d.parse().ok())
        .unwrap_or_default();
    let table_state = TableState::new("/payments", query.q.as_deref())
        .filtered("status", query.status.as_deref())
        .sorted(query.sort.as_deref(), dir);
    let pager = Pager::new(&page, &table_state);

    let table = DataTableConfig::new("payments")
        .column(TableColumn::new("order", "Đơn hàng"))
        .column(TableColumn::new("payer", "Người trả"))
        .column(TableColumn::sortable("amount", "Số tiền"))
        .column(TableColumn::new("method", "Phương thức"))
        .column(TableColumn::new("status", "Trạng thái"))
        .column(TableColumn::sortable("created", "Thời gian"))
        .filter(
            TableFilter::from_pairs(
                "status",
                "Trạng thái",
                PaymentStatus::ALL.map(|s| (s.as_str(), s.label())),
            )
            .with_selected(query.status.as_deref()),
        )
        .search_placeholder("Tìm theo mã giao dịch hoặc mã đơn...")
        .empty_state("Chưa có giao dịch", None);

    let template = PaymentsIndexTemplate {
        layout: Layout::new(&admin, &notifier, "/payments").await,
        table,
        state: table_state,
        payments: page.items.iter().map(PaymentRowView::from).collect(),
        pager,
        completed_total: completed_total.to_string(),
    };
    Ok(render(&template))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_status_filter_and_search() {
        let mut payments: Vec<Payment> = serde_json::from_value(json!([
            {"_id": "pay1", "orderId": "o1", "amount": 100000, "status": "completed",
             "transactionId": "VNP123"},
            {"_id": "pay2", "order": {"_id": "o2"}, "amount": 50000, "status": "failed"}
        ]))
        .unwrap();
        let mut completed = payments.clone();
        apply_query(
            &mut completed,
            &PaymentsQuery {
                status: Some("completed".into()),
                ..PaymentsQuery::default()
            },
        );
        assert_eq!(completed.len(), 1);

        apply_query(
            &mut payments,
            &PaymentsQuery {
                q: Some("o2".into()),
                ..PaymentsQuery::default()
            },
        );
        assert_eq!(payments.len(), 1);
        let row = PaymentRowView::from(&payments[0]);
        assert_eq!(row.order_id.as_deref(), Some("o2"));
        assert_eq!(row.status, "failed");
    }
}
