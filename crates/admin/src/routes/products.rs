//! Product management route handlers.
//!
//! Create and update forward the browser's multipart form to the backend
//! after the text fields are checked and amounts normalized. Field names
//! are the backend's: `name`, `description`, `price`, `discountPrice`,
//! `stock`, `category`, `brand` and `images` (repeatable file input).

use std::collections::HashMap;

use askama::Template;
use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    response::{Html, Redirect},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;
use zeal_api::{Brand, Category, MultipartForm, Product};
use zeal_core::listing::{self, SortDirection, non_blank};
use zeal_core::pagination::{DEFAULT_PER_PAGE, Page};
use zeal_core::{Price, ProductId};

use crate::components::{DataTableConfig, Pager, TableColumn, TableFilter, TableState};
use crate::error::{AppError, OrRedirect};
use crate::filters;
use crate::middleware::{Notifier, RequireAdmin};
use crate::routes::forms::{UPLOAD_LIMIT, optional_amount, read_multipart, require_text};
use crate::routes::{Layout, page_param, render};
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(index).post(create))
        .route("/products/new", get(new_form))
        .route("/products/{id}", get(edit_form).post(update))
        .route("/products/{id}/delete", post(delete))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT))
}

// =============================================================================
// Views
// =============================================================================

/// Query parameters for the products list.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub page: Option<String>,
}

/// Product row in the list.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub category: String,
    pub brand: String,
    pub price: String,
    pub sale_price: Option<String>,
    pub stock: i64,
    pub sold: i64,
}

/// Entry in a category or brand `<select>`.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Values shown in the product form.
#[derive(Debug, Clone, Default)]
pub struct ProductFormView {
    pub name: String,
    pub description: String,
    pub price: String,
    pub sale_price: String,
    pub stock: String,
    pub images: Vec<String>,
}

impl From<&Product> for ProductFormView {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.amount().to_string(),
            sale_price: product
                .sale_price
                .filter(|p| *p > Price::ZERO)
                .map(|p| p.amount().to_string())
                .unwrap_or_default(),
            stock: product.stock.to_string(),
            images: product.images.iter().map(|i| i.url().to_owned()).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: Layout,
    pub table: DataTableConfig,
    pub state: TableState,
    pub products: Vec<ProductRowView>,
    pub pager: Pager,
}

#[derive(Template)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub layout: Layout,
    pub title: &'static str,
    pub action: String,
    pub product: ProductFormView,
    pub categories: Vec<SelectOption>,
    pub brands: Vec<SelectOption>,
    pub editing: bool,
}

fn name_lookup<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> HashMap<&'a str, &'a str> {
    pairs.into_iter().collect()
}

fn select_options<'a>(
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    selected: Option<&str>,
) -> Vec<SelectOption> {
    pairs
        .into_iter()
        .map(|(value, label)| SelectOption {
            value: value.to_owned(),
            label: label.to_owned(),
            selected: selected == Some(value),
        })
        .collect()
}

fn category_pairs(categories: &[Category]) -> impl Iterator<Item = (&str, &str)> {
    categories.iter().map(|c| (c.id.as_str(), c.name.as_str()))
}

fn brand_pairs(brands: &[Brand]) -> impl Iterator<Item = (&str, &str)> {
    brands.iter().map(|b| (b.id.as_str(), b.name.as_str()))
}

// =============================================================================
// List
// =============================================================================

/// Filter and sort products in place.
pub fn apply_query(products: &mut Vec<Product>, query: &ProductsQuery) {
    if let Some(category) = non_blank(query.category.as_deref()) {
        products.retain(|p| p.category_id() == Some(category));
    }
    if let Some(brand) = non_blank(query.brand.as_deref()) {
        products.retain(|p| p.brand_id() == Some(brand));
    }
    if let Some(q) = non_blank(query.q.as_deref()) {
        listing::filter_by_query(products, q, |p| {
            vec![p.name.as_str(), p.description.as_deref().unwrap_or_default()]
        });
    }

    let dir: SortDirection = query
        .dir
        .as_deref()
        .and_then(|d| d.parse().ok())
        .unwrap_or_default();
    match non_blank(query.sort.as_deref()) {
        Some("name") => listing::sort_by_key(products, dir, |p| listing::fold(&p.name)),
        Some("price") => listing::sort_by_key(products, dir, Product::effective_price),
        Some("stock") => listing::sort_by_key(products, dir, |p| p.stock),
        Some("sold") => listing::sort_by_key(products, dir, |p| p.sold),
        _ => listing::sort_by_key(products, SortDirection::Desc, |p| p.created_at),
    }
}

/// GET /products
#[instrument(skip(admin, state, notifier))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Query(query): Query<ProductsQuery>,
) -> Result<Html<String>, AppError> {
    let api = state.api().with(admin.store());
    let (products, categories, brands) =
        tokio::join!(api.list_products(), api.list_categories(), api.list_brands());
    let mut products = products?;
    let categories = categories.unwrap_or_default();
    let brands = brands.unwrap_or_default();

    apply_query(&mut products, &query);
    let page = Page::paginate(products, page_param(query.page.as_deref()), DEFAULT_PER_PAGE);

    let dir = query
        .dir
        .as_deref()
        .and_then(|d| d.parse().ok())
        .unwrap_or_default();
    let table_state = TableState::new("/products", query.q.as_deref())
        .filtered("category", query.category.as_deref())
        .filtered("brand", query.brand.as_deref())
        .sorted(query.sort.as_deref(), dir);
    let pager = Pager::new(&page, &table_state);

    let category_names = name_lookup(category_pairs(&categories));
    let brand_names = name_lookup(brand_pairs(&brands));
    let rows = page
        .items
        .iter()
        .map(|p| {
            let resolve = |r: Option<&zeal_api::DocRef>, names: &HashMap<&str, &str>| {
                r.map(|r| {
                    r.name()
                        .or_else(|| names.get(r.id()).copied())
                        .unwrap_or(r.id())
                        .to_owned()
                })
                .unwrap_or_default()
            };
            ProductRowView {
                id: p.id.to_string(),
                name: p.name.clone(),
                image: p.main_image().map(str::to_owned),
                category: resolve(p.category.as_ref(), &category_names),
                brand: resolve(p.brand.as_ref(), &brand_names),
                price: p.price.to_string(),
                sale_price: p.on_sale().then(|| p.effective_price().to_string()),
                stock: p.stock,
                sold: p.sold,
            }
        })
        .collect();

    let table = DataTableConfig::new("products")
        .column(TableColumn::sortable("name", "Sản phẩm"))
        .column(TableColumn::new("category", "Danh mục"))
        .column(TableColumn::new("brand", "Thương hiệu"))
        .column(TableColumn::sortable("price", "Giá"))
        .column(TableColumn::sortable("stock", "Tồn kho"))
        .column(TableColumn::sortable("sold", "Đã bán"))
        .filter(
            TableFilter::from_pairs("category", "Danh mục", category_pairs(&categories))
                .with_selected(query.category.as_deref()),
        )
        .filter(
            TableFilter::from_pairs("brand", "Thương hiệu", brand_pairs(&brands))
                .with_selected(query.brand.as_deref()),
        )
        .search_placeholder("Tìm sản phẩm...")
        .empty_state("Chưa có sản phẩm", None)
        .new_href("/products/new");

    let template = ProductsIndexTemplate {
        layout: Layout::new(&admin, &notifier, "/products").await,
        table,
        state: table_state,
        products: rows,
        pager,
    };
    Ok(render(&template))
}

// =============================================================================
// Create / update
// =============================================================================

/// Check the text fields of a product form and normalize its amounts.
///
/// # Errors
///
/// Returns `AppError::Rejected` pointing at `back` for a missing name or
/// price, a malformed amount or stock, or a sale price above the list price.
pub fn validate_product_form(form: MultipartForm, back: &str) -> Result<MultipartForm, AppError> {
    require_text(&form, "name", "Vui lòng nhập tên sản phẩm", back)?;
    let price = optional_amount(&form, "price", "Giá sản phẩm không hợp lệ", back)?
        .ok_or_else(|| AppError::rejected("Vui lòng nhập giá sản phẩm", back))?;
    let sale = optional_amount(&form, "discountPrice", "Giá khuyến mãi không hợp lệ", back)?;
    if sale.is_some_and(|sale| sale > price) {
        return Err(AppError::rejected(
            "Giá khuyến mãi không được lớn hơn giá gốc",
            back,
        ));
    }

    let stock = match non_blank(form.field("stock")) {
        None => 0,
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| AppError::rejected("Số lượng tồn kho không hợp lệ", back))?,
    };

    let form = form.set("price", price.to_string()).set("stock", stock.to_string());
    Ok(match sale {
        Some(sale) => form.set("discountPrice", sale.to_string()),
        None => form.without("discountPrice"),
    })
}

async fn form_template(
    admin: &crate::middleware::CurrentAdmin,
    state: &AppState,
    notifier: &Notifier,
    product: Option<&Product>,
) -> ProductFormTemplate {
    let api = state.api().with(admin.store());
    let (categories, brands) = tokio::join!(api.list_categories(), api.list_brands());
    let categories = categories.unwrap_or_default();
    let brands = brands.unwrap_or_default();

    let (title, action) = match product {
        Some(p) => ("Sửa sản phẩm", format!("/products/{}", p.id)),
        None => ("Thêm sản phẩm", "/products".to_owned()),
    };
    ProductFormTemplate {
        layout: Layout::new(admin, notifier, "/products").await,
        title,
        action,
        product: product.map(ProductFormView::from).unwrap_or_default(),
        categories: select_options(
            category_pairs(&categories),
            product.and_then(Product::category_id),
        ),
        brands: select_options(brand_pairs(&brands), product.and_then(Product::brand_id)),
        editing: product.is_some(),
    }
}

/// GET /products/new
#[instrument(skip(admin, state, notifier))]
pub async fn new_form(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
) -> Html<String> {
    render(&form_template(&admin, &state, &notifier, None).await)
}

/// POST /products
#[instrument(skip(admin, state, notifier, multipart))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let back = "/products/new";
    let form = validate_product_form(read_multipart(multipart, back).await?, back)?;
    if !form.has_files() {
        return Err(AppError::rejected("Vui lòng chọn ít nhất một ảnh sản phẩm", back));
    }

    state
        .api()
        .with(admin.store())
        .create_product(&form)
        .await
        .or_redirect(back)?;
    tracing::info!(name = ?form.field("name"), "Product created");
    notifier.success("Đã thêm sản phẩm").await;
    Ok(Redirect::to("/products"))
}

/// GET /products/{id}
#[instrument(skip(admin, state, notifier))]
pub async fn edit_form(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let product = state
        .api()
        .with(admin.store())
        .get_product(&ProductId::new(id))
        .await?;
    Ok(render(
        &form_template(&admin, &state, &notifier, Some(&product)).await,
    ))
}

/// POST /products/{id}
#[instrument(skip(admin, state, notifier, multipart))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let back = format!("/products/{id}");
    let form = validate_product_form(read_multipart(multipart, &back).await?, &back)?;

    state
        .api()
        .with(admin.store())
        .update_product(&ProductId::new(id), &form)
        .await
        .or_redirect(&back)?;
    notifier.success("Đã cập nhật sản phẩm").await;
    Ok(Redirect::to("/products"))
}

/// POST /products/{id}/delete
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
        .delete_product(&ProductId::new(id))
        .await
        .or_redirect("/products")?;
    notifier.success("Đã xóa sản phẩm").await;
    Ok(Redirect::to("/products"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn base_form() -> MultipartForm {
        MultipartForm::new()
            .text("name", "Áo khoác gió")
            .text("price", "1.250.000")
            .text("discountPrice", "")
            .text("stock", "")
    }

    #[test]
    fn test_validate_normalizes_amounts() {
        let form = validate_product_form(base_form(), "/products/new").unwrap();
        assert_eq!(form.field("price"), Some("1250000"));
        assert_eq!(form.field("stock"), Some("0"));
        assert_eq!(form.field("discountPrice"), None);
    }

    #[test]
    fn test_validate_rejects_sale_above_price() {
        let form = base_form().set("discountPrice", "2.000.000");
        let err = validate_product_form(form, "/products/new").unwrap_err();
        assert!(matches!(err, AppError::Rejected { ref back, .. } if back == "/products/new"));
    }

    #[test]
    fn test_validate_requires_name_and_price() {
        let no_name = base_form().set("name", " ");
        assert!(validate_product_form(no_name, "/x").is_err());
        let no_price = base_form().without("price");
        assert!(validate_product_form(no_price, "/x").is_err());
        let bad_stock = base_form().set("stock", "-3");
        assert!(validate_product_form(bad_stock, "/x").is_err());
    }

    #[test]
    fn test_apply_query_filters_by_category_and_sorts() {
        let mut products: Vec<Product> = serde_json::from_value(json!([
            {"_id": "p1", "name": "Áo thun", "price": 150000, "category": "c1"},
            {"_id": "p2", "name": "Quần jean", "price": 400000, "category": "c2"},
            {"_id": "p3", "name": "Áo sơ mi", "price": 300000, "category": {"_id": "c1", "name": "Áo"}}
        ]))
        .unwrap();
        apply_query(
            &mut products,
            &ProductsQuery {
                category: Some("c1".into()),
                sort: Some("price".into()),
                dir: Some("desc".into()),
                ..ProductsQuery::default()
            },
        );
        let ids: Vec<_> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p3", "p1"]);
        assert_eq!(products[0].price.amount(), Decimal::from(300_000));
    }
}
