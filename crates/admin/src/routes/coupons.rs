//! Coupon management route handlers.
//!
//! Coupon forms are validated field by field before anything is sent. A
//! form with errors is rendered again with the typed values and one message
//! under each offending field.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;
use zeal_core::coupon::{Coupon, CouponDraft, CouponErrors, CouponStatus, DiscountType};
use zeal_core::listing::{self, SortDirection, non_blank};
use zeal_core::pagination::{DEFAULT_PER_PAGE, Page};
use zeal_core::{CouponId, display_date};

use crate::components::{DataTableConfig, Pager, TableColumn, TableFilter, TableState};
use crate::error::{AppError, OrRedirect};
use crate::filters;
use crate::middleware::{CurrentAdmin, Notifier, RequireAdmin};
use crate::routes::{Layout, page_param, render};
use crate::state::AppState;

/// Build the coupons router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/coupons", get(index).post(create))
        .route("/coupons/new", get(new_form))
        .route("/coupons/{id}", get(edit_form).post(update))
        .route("/coupons/{id}/delete", post(delete))
}

#[derive(Debug, Default, Deserialize)]
pub struct CouponsQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub page: Option<String>,
}

/// Coupon row in the list.
#[derive(Debug, Clone)]
pub struct CouponRowView {
    pub id: String,
    pub code: String,
    pub value: String,
    pub min_order: String,
    pub usage: String,
    pub period: String,
    pub status: &'static str,
    pub status_label: &'static str,
}

impl CouponRowView {
    fn new(coupon: &Coupon, status: CouponStatus) -> Self {
        let usage = coupon.usage_limit.map_or_else(
            || format!("{} / ∞", coupon.used_count),
            |limit| format!("{} / {limit}", coupon.used_count),
        );
        Self {
            id: coupon.id.to_string(),
            code: coupon.code.clone(),
            value: coupon.value_display(),
            min_order: coupon.min_order_value.to_string(),
            usage,
            period: format!(
                "{} - {}",
                display_date(coupon.start_date.as_ref()),
                display_date(coupon.end_date.as_ref())
            ),
            status: status.as_str(),
            status_label: status.label(),
        }
    }
}

/// Per-field error messages for the form template.
#[derive(Debug, Clone, Default)]
pub struct FieldErrors {
    pub code: Option<&'static str>,
    pub discount_type: Option<&'static str>,
    pub discount_value: Option<&'static str>,
    pub min_order_value: Option<&'static str>,
    pub max_discount_amount: Option<&'static str>,
    pub start_date: Option<&'static str>,
    pub end_date: Option<&'static str>,
    pub usage_limit: Option<&'static str>,
    pub description: Option<&'static str>,
}

impl From<&CouponErrors> for FieldErrors {
    fn from(errors: &CouponErrors) -> Self {
        Self {
            code: errors.get("code"),
            discount_type: errors.get("discount_type"),
            discount_value: errors.get("discount_value"),
            min_order_value: errors.get("min_order_value"),
            max_discount_amount: errors.get("max_discount_amount"),
            start_date: errors.get("start_date"),
            end_date: errors.get("end_date"),
            usage_limit: errors.get("usage_limit"),
            description: errors.get("description"),
        }
    }
}

#[derive(Template)]
#[template(path = "coupons/index.html")]
pub struct CouponsIndexTemplate {
    pub layout: Layout,
    pub table: DataTableConfig,
    pub state: TableState,
    pub coupons: Vec<CouponRowView>,
    pub pager: Pager,
}

#[derive(Template)]
#[template(path = "coupons/form.html")]
pub struct CouponFormTemplate {
    pub layout: Layout,
    pub action: String,
    pub draft: CouponDraft,
    pub errors: FieldErrors,
    pub discount_types: [DiscountType; 2],
    pub editing: bool,
}

impl CouponFormTemplate {
    /// Whether the checkbox should render ticked.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.draft.is_active.is_some()
    }
}

// =============================================================================
// List
// =============================================================================

/// Filter and sort coupons in place, pairing each with its status.
#[must_use]
pub fn apply_query(coupons: Vec<Coupon>, query: &CouponsQuery) -> Vec<(Coupon, CouponStatus)> {
    let now = Utc::now();
    let status = non_blank(query.status.as_deref());
    let mut rows: Vec<(Coupon, CouponStatus)> = coupons
        .into_iter()
        .map(|c| {
            let s = c.status_at(now);
            (c, s)
        })
        .filter(|(_, s)| status.is_none_or(|wanted| s.as_str() == wanted))
        .collect();

    if let Some(q) = non_blank(query.q.as_deref()) {
        listing::filter_by_query(&mut rows, q, |(c, _)| {
            vec![c.code.as_str(), c.description.as_deref().unwrap_or_default()]
        });
    }

    let dir: SortDirection = query
        .dir
        .as_deref()
        .and_then(|d| d.parse().ok())
        .unwrap_or_default();
    match non_blank(query.sort.as_deref()) {
        Some("code") => listing::sort_by_key(&mut rows, dir, |(c, _)| c.code.clone()),
        Some("end") => listing::sort_by_key(&mut rows, dir, |(c, _)| c.end_date),
        Some("used") => listing::sort_by_key(&mut rows, dir, |(c, _)| c.used_count),
        _ => {}
    }
    rows
}

/// GET /coupons
#[instrument(skip(admin, state, notifier))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Query(query): Query<CouponsQuery>,
) -> Result<Response, AppError> {
    let coupons = state.api().with(admin.store()).list_coupons().await?;
    let rows = apply_query(coupons, &query);
    let page = Page::paginate(rows, page_param(query.page.as_deref()), DEFAULT_PER_PAGE);

    let dir = query
        .dir
        .as_deref()
        .and_then(|d| d.parse().ok())
        .unwrap_or_default();
    let table_state = TableState::new("/coupons", query.q.as_deref())
        .filtered("status", query.status.as_deref())
        .sorted(query.sort.as_deref(), dir);
    let pager = Pager::new(&page, &table_state);

    let table = DataTableConfig::new("coupons")
        .column(TableColumn::sortable("code", "Mã"))
        .column(TableColumn::new("value", "Giá trị"))
        .column(TableColumn::new("min", "Đơn tối thiểu"))
        .column(TableColumn::sortable("used", "Đã dùng"))
        .column(TableColumn::sortable("end", "Thời gian"))
        .column(TableColumn::new("status", "Trạng thái"))
        .filter(
            TableFilter::from_pairs(
                "status",
                "Trạng thái",
                CouponStatus::ALL.map(|s| (s.as_str(), s.label())),
            )
            .with_selected(query.status.as_deref()),
        )
        .search_placeholder("Tìm mã giảm giá...")
        .empty_state("Chưa có mã giảm giá", None)
        .new_href("/coupons/new");

    let template = CouponsIndexTemplate {
        layout: Layout::new(&admin, &notifier, "/coupons").await,
        table,
        state: table_state,
        coupons: page.items.iter().map(|(c, s)| CouponRowView::new(c, *s)).collect(),
        pager,
    };
    Ok(render(&template).into_response())
}

// =============================================================================
// Create / update
// =============================================================================

async fn form_response(
    admin: &CurrentAdmin,
    notifier: &Notifier,
    action: String,
    draft: CouponDraft,
    errors: Option<&CouponErrors>,
) -> Response {
    let template = CouponFormTemplate {
        layout: Layout::new(admin, notifier, "/coupons").await,
        editing: action != "/coupons",
        action,
        draft,
        errors: errors.map(FieldErrors::from).unwrap_or_default(),
        discount_types: [DiscountType::Percentage, DiscountType::Fixed],
    };
    let html = render(&template);
    if errors.is_some() {
        (StatusCode::UNPROCESSABLE_ENTITY, html).into_response()
    } else {
        html.into_response()
    }
}

/// GET /coupons/new
pub async fn new_form(RequireAdmin(admin): RequireAdmin, notifier: Notifier) -> Response {
    let draft = CouponDraft {
        is_active: Some("on".to_owned()),
        ..CouponDraft::default()
    };
    form_response(&admin, &notifier, "/coupons".to_owned(), draft, None).await
}

/// POST /coupons
#[instrument(skip(admin, state, notifier, draft), fields(code = %draft.code))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Form(draft): Form<CouponDraft>,
) -> Result<Response, AppError> {
    let coupon = match draft.validate() {
        Ok(coupon) => coupon,
        Err(errors) => {
            notifier.error(errors.first_message()).await;
            return Ok(
                form_response(&admin, &notifier, "/coupons".to_owned(), draft, Some(&errors)).await,
            );
        }
    };

    state
        .api()
        .with(admin.store())
        .create_coupon(&coupon)
        .await
        .or_redirect("/coupons/new")?;
    tracing::info!(code = %coupon.code, "Coupon created");
    notifier.success(format!("Đã tạo mã {}", coupon.code)).await;
    Ok(Redirect::to("/coupons").into_response())
}

/// GET /coupons/{id}
#[instrument(skip(admin, state, notifier))]
pub async fn edit_form(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let coupon = state
        .api()
        .with(admin.store())
        .get_coupon(&CouponId::new(id))
        .await?;
    let action = format!("/coupons/{}", coupon.id);
    Ok(form_response(&admin, &notifier, action, CouponDraft::from_coupon(&coupon), None).await)
}

/// POST /coupons/{id}
#[instrument(skip(admin, state, notifier, draft))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
    Form(draft): Form<CouponDraft>,
) -> Result<Response, AppError> {
    let action = format!("/coupons/{id}");
    let coupon = match draft.validate() {
        Ok(coupon) => coupon,
        Err(errors) => {
            notifier.error(errors.first_message()).await;
            return Ok(form_response(&admin, &notifier, action, draft, Some(&errors)).await);
        }
    };

    state
        .api()
        .with(admin.store())
        .update_coupon(&CouponId::new(id), &coupon)
        .await
        .or_redirect(&action)?;
    notifier.success(format!("Đã cập nhật mã {}", coupon.code)).await;
    Ok(Redirect::to("/coupons").into_response())
}

/// POST /coupons/{id}/delete
#[instrument(skip(admin, state, notifier))]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    state
        .api()
        .with(admin.store())
        .delete_coupon(&CouponId::new(id))
        .await
        .or_redirect("/coupons")?;
    notifier.success("Đã xóa mã giảm giá").await;
    Ok(Redirect::to("/coupons"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn coupons() -> Vec<Coupon> {
        serde_json::from_value(json!([
            {"_id": "k1", "code": "SALE10", "discountType": "percentage", "discountValue": 10,
             "isActive": true},
            {"_id": "k2", "code": "OFF50K", "discountType": "fixed", "discountValue": 50000,
             "isActive": false},
            {"_id": "k3", "code": "TET2020", "discountType": "percentage", "discountValue": 5,
             "endDate": "2020-02-01T00:00:00Z"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_status_filter() {
        let rows = apply_query(
            coupons(),
            &CouponsQuery {
                status: Some("expired".into()),
                ..CouponsQuery::default()
            },
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0.code, "TET2020");
        assert_eq!(rows[0].1, CouponStatus::Expired);
    }

    #[test]
    fn test_row_view_and_sort() {
        let rows = apply_query(
            coupons(),
            &CouponsQuery {
                sort: Some("code".into()),
                ..CouponsQuery::default()
            },
        );
        let codes: Vec<_> = rows.iter().map(|(c, _)| c.code.as_str()).collect();
        assert_eq!(codes, ["OFF50K", "SALE10", "TET2020"]);

        let view = CouponRowView::new(&rows[1].0, rows[1].1);
        assert_eq!(view.value, "10%");
        assert_eq!(view.usage, "0 / ∞");
        assert_eq!(view.status, "active");
    }

    #[test]
    fn test_field_errors_map_messages() {
        let draft = CouponDraft {
            code: "x".into(),
            discount_value: "0".into(),
            ..CouponDraft::default()
        };
        let errors = draft.validate().unwrap_err();
        let fields = FieldErrors::from(&errors);
        assert!(fields.code.is_some());
        assert!(fields.discount_value.is_some());
    }
}
