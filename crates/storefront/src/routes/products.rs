//! Catalog and product detail pages.
//!
//! The backend returns the full product list; filtering, sorting and paging
//! happen here so every combination of catalog parameters works without
//! backend support.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use zeal_api::{Comment, DocRef, NewComment, Product};
use zeal_core::listing::{self, SortDirection, non_blank};
use zeal_core::pagination::{DEFAULT_PER_PAGE, Page};
use zeal_core::{Price, ProductId, display_date};

use crate::error::{AppError, OrRedirect, Result};
use crate::filters;
use crate::middleware::{Notifier, OptionalUser, RequireUser};
use crate::pager::Pager;
use crate::routes::favorites::Favorites;
use crate::routes::{Layout, page_param};
use crate::state::AppState;

/// Longest accepted review.
pub const MAX_COMMENT_CHARS: usize = 1000;

/// Catalog query parameters.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CatalogQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

impl CatalogQuery {
    /// Catalog URL with the same filters on page `page`.
    #[must_use]
    pub fn href(&self, page: usize) -> String {
        let mut params: Vec<String> = [
            ("q", &self.q),
            ("category", &self.category),
            ("brand", &self.brand),
            ("min_price", &self.min_price),
            ("max_price", &self.max_price),
            ("sort", &self.sort),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            non_blank(value.as_deref()).map(|v| format!("{key}={}", urlencoding::encode(v)))
        })
        .collect();
        if page > 1 {
            params.push(format!("page={page}"));
        }
        if params.is_empty() {
            "/products".to_owned()
        } else {
            format!("/products?{}", params.join("&"))
        }
    }

    fn price_bound(raw: Option<&str>) -> Option<Price> {
        let digits: String = non_blank(raw)?.chars().filter(char::is_ascii_digit).collect();
        digits.parse::<i64>().ok().map(Price::from_dong)
    }
}

/// Catalog ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    BestSelling,
    Name,
}

impl CatalogSort {
    pub const ALL: [Self; 5] = [
        Self::Newest,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::BestSelling,
        Self::Name,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::BestSelling => "best_selling",
            Self::Name => "name",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Mới nhất",
            Self::PriceAsc => "Giá tăng dần",
            Self::PriceDesc => "Giá giảm dần",
            Self::BestSelling => "Bán chạy",
            Self::Name => "Tên A-Z",
        }
    }
}

impl FromStr for CatalogSort {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_str() == s.trim())
            .ok_or(())
    }
}

/// Filter and order `products` for the catalog.
pub fn apply_catalog_query(products: &mut Vec<Product>, query: &CatalogQuery) {
    if let Some(category) = non_blank(query.category.as_deref()) {
        products.retain(|p| p.category_id() == Some(category));
    }
    if let Some(brand) = non_blank(query.brand.as_deref()) {
        products.retain(|p| p.brand_id() == Some(brand));
    }
    if let Some(min) = CatalogQuery::price_bound(query.min_price.as_deref()) {
        products.retain(|p| p.effective_price() >= min);
    }
    if let Some(max) = CatalogQuery::price_bound(query.max_price.as_deref()) {
        products.retain(|p| p.effective_price() <= max);
    }
    if let Some(q) = non_blank(query.q.as_deref()) {
        listing::filter_by_query(products, q, |p| {
            vec![
                p.name.as_str(),
                p.description.as_deref().unwrap_or_default(),
                p.category.as_ref().and_then(DocRef::name).unwrap_or_default(),
                p.brand.as_ref().and_then(DocRef::name).unwrap_or_default(),
            ]
        });
    }

    let sort = query
        .sort
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();
    match sort {
        CatalogSort::Newest => {
            listing::sort_by_key(products, SortDirection::Desc, |p| p.created_at);
        }
        CatalogSort::PriceAsc => {
            listing::sort_by_key(products, SortDirection::Asc, Product::effective_price);
        }
        CatalogSort::PriceDesc => {
            listing::sort_by_key(products, SortDirection::Desc, Product::effective_price);
        }
        CatalogSort::BestSelling => listing::sort_by_key(products, SortDirection::Desc, |p| p.sold),
        CatalogSort::Name => {
            listing::sort_by_key(products, SortDirection::Asc, |p| listing::fold(&p.name));
        }
    }
}

/// Product tile shown in grids.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub price: String,
    /// List price, shown struck through when on sale.
    pub original_price: Option<String>,
    pub discount_percent: u32,
    pub in_stock: bool,
    pub is_favorite: bool,
}

impl ProductCardView {
    #[must_use]
    pub fn new(product: &Product, is_favorite: bool) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            image: product.main_image().map(str::to_owned),
            price: product.effective_price().display(),
            original_price: product.on_sale().then(|| product.price.display()),
            discount_percent: product.discount_percent(),
            in_stock: product.in_stock(),
            is_favorite,
        }
    }
}

/// Option in a filter select.
#[derive(Debug, Clone)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl FilterOption {
    fn new(value: impl Into<String>, label: impl Into<String>, current: Option<&str>) -> Self {
        let value = value.into();
        Self {
            selected: current == Some(value.as_str()),
            value,
            label: label.into(),
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCardView>,
    pub total: usize,
    pub q: String,
    pub min_price: String,
    pub max_price: String,
    pub categories: Vec<FilterOption>,
    pub brands: Vec<FilterOption>,
    pub sorts: Vec<FilterOption>,
    pub pager: Pager,
}

/// GET /products
#[instrument(skip(state, user, session))]
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    session: Session,
    Query(query): Query<CatalogQuery>,
) -> Result<ProductsIndexTemplate> {
    let api = state.api().anonymous();
    let mut products = api.list_products().await?;
    apply_catalog_query(&mut products, &query);

    // Filter options are a convenience; the page still works without them.
    let categories = state.catalog().categories(&api).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load categories");
        Vec::new()
    });
    let brands = state.catalog().brands(&api).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load brands");
        Vec::new()
    });

    let favorite_ids = Favorites::new(session.clone()).ids().await;
    let total = products.len();
    let page = Page::paginate(products, page_param(query.page.as_deref()), DEFAULT_PER_PAGE);
    let pager = Pager::new(&page, |n| query.href(n));

    let current_sort = query
        .sort
        .as_deref()
        .and_then(|s| s.parse::<CatalogSort>().ok())
        .unwrap_or_default();

    Ok(ProductsIndexTemplate {
        layout: Layout::new(user.as_ref(), &session, "/products").await,
        products: page
            .items
            .iter()
            .map(|p| ProductCardView::new(p, favorite_ids.iter().any(|f| f == p.id.as_str())))
            .collect(),
        total,
        q: query.q.clone().unwrap_or_default(),
        min_price: query.min_price.clone().unwrap_or_default(),
        max_price: query.max_price.clone().unwrap_or_default(),
        categories: categories
            .iter()
            .map(|c| FilterOption::new(c.id.as_str(), &c.name, query.category.as_deref()))
            .collect(),
        brands: brands
            .iter()
            .map(|b| FilterOption::new(b.id.as_str(), &b.name, query.brand.as_deref()))
            .collect(),
        sorts: CatalogSort::ALL
            .into_iter()
            .map(|s| FilterOption::new(s.as_str(), s.label(), Some(current_sort.as_str())))
            .collect(),
        pager,
    })
}

/// Full product view for the detail page.
#[derive(Debug, Clone)]
pub struct ProductDetailView {
    pub card: ProductCardView,
    pub description: String,
    pub images: Vec<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub stock: i64,
    pub sold: i64,
}

impl ProductDetailView {
    #[must_use]
    pub fn new(product: &Product, is_favorite: bool) -> Self {
        Self {
            card: ProductCardView::new(product, is_favorite),
            description: product.description.clone().unwrap_or_default(),
            images: product.images.iter().map(|i| i.url().to_owned()).collect(),
            category: product.category.as_ref().and_then(DocRef::name).map(str::to_owned),
            brand: product.brand.as_ref().and_then(DocRef::name).map(str::to_owned),
            stock: product.stock,
            sold: product.sold,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentView {
    pub author: String,
    pub rating: u8,
    pub content: String,
    pub created_at: String,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            author: comment.author_name().to_owned(),
            rating: comment.rating.unwrap_or(0).min(5),
            content: comment.content.clone(),
            created_at: display_date(comment.created_at.as_ref()),
        }
    }
}

/// Mean of the rated comments, one decimal; `None` when nobody rated.
#[must_use]
pub fn average_rating(comments: &[Comment]) -> Option<String> {
    let ratings: Vec<u32> = comments
        .iter()
        .filter_map(|c| c.rating)
        .filter(|r| (1..=5).contains(r))
        .map(u32::from)
        .collect();
    if ratings.is_empty() {
        return None;
    }
    let count = u32::try_from(ratings.len()).unwrap_or(u32::MAX);
    let tenths = ratings.iter().sum::<u32>() * 10 / count;
    Some(format!("{}.{}", tenths / 10, tenths % 10))
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductDetailView,
    pub comments: Vec<CommentView>,
    pub average_rating: Option<String>,
    pub logged_in: bool,
}

/// GET /products/{id}
///
/// The backend may be cold; the detail call retries on timeouts.
#[instrument(skip(state, user, session))]
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    session: Session,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate> {
    let product_id = ProductId::new(id);
    let api = state.api().anonymous();
    let product = api.product_detail(&product_id).await?;

    let mut comments = api.product_comments(&product_id).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load product comments");
        Vec::new()
    });
    listing::sort_by_key(&mut comments, SortDirection::Desc, |c| c.created_at);

    let is_favorite = Favorites::new(session.clone())
        .contains(product_id.as_str())
        .await;

    Ok(ProductShowTemplate {
        layout: Layout::new(user.as_ref(), &session, "/products").await,
        product: ProductDetailView::new(&product, is_favorite),
        average_rating: average_rating(&comments),
        comments: comments.iter().map(CommentView::from).collect(),
        logged_in: user.is_some(),
    })
}

#[derive(Debug, Deserialize)]
pub struct CommentInput {
    pub rating: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Validate a review form.
///
/// # Errors
///
/// Returns the message to show when the rating is not 1-5 or the text is
/// blank or too long.
pub fn validate_comment(
    product_id: ProductId,
    input: &CommentInput,
) -> std::result::Result<NewComment, &'static str> {
    let rating = input
        .rating
        .as_deref()
        .and_then(|r| r.trim().parse::<u8>().ok())
        .filter(|r| (1..=5).contains(r))
        .ok_or("Vui lòng chọn số sao từ 1 đến 5")?;
    let content = input.content.trim();
    if content.is_empty() {
        return Err("Vui lòng nhập nội dung đánh giá");
    }
    if content.chars().count() > MAX_COMMENT_CHARS {
        return Err("Nội dung đánh giá quá dài");
    }
    Ok(NewComment {
        product_id,
        content: content.to_owned(),
        rating,
    })
}

/// POST /products/{id}/comments
#[instrument(skip(state, user, notifier, input))]
pub async fn comment(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    notifier: Notifier,
    Path(id): Path<String>,
    Form(input): Form<CommentInput>,
) -> Result<Redirect> {
    let back = format!("/products/{id}");
    let comment = validate_comment(ProductId::new(id), &input)
        .map_err(|message| AppError::rejected(message, back.as_str()))?;

    state
        .api()
        .with(user.store())
        .create_comment(&comment)
        .await
        .or_redirect(&back)?;
    notifier.success("Cảm ơn bạn đã đánh giá sản phẩm").await;
    Ok(Redirect::to(&back))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn products() -> Vec<Product> {
        serde_json::from_value(json!([
            {"_id": "p1", "name": "Áo khoác gió", "price": 500000, "discountPrice": 400000,
             "category": {"_id": "c1", "name": "Áo"}, "brand": "b1", "sold": 3,
             "createdAt": "2026-01-01T00:00:00Z"},
            {"_id": "p2", "name": "Quần jean", "price": 300000,
             "category": "c2", "brand": "b1", "sold": 10,
             "createdAt": "2026-03-01T00:00:00Z"},
            {"_id": "p3", "name": "Áo thun", "price": 150000,
             "category": {"_id": "c1", "name": "Áo"}, "brand": "b2", "sold": 7,
             "createdAt": "2026-02-01T00:00:00Z"}
        ]))
        .unwrap()
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_default_order_is_newest_first() {
        let mut list = products();
        apply_catalog_query(&mut list, &CatalogQuery::default());
        assert_eq!(ids(&list), vec!["p2", "p3", "p1"]);
    }

    #[test]
    fn test_category_and_diacritic_free_search() {
        let mut list = products();
        apply_catalog_query(
            &mut list,
            &CatalogQuery {
                category: Some("c1".into()),
                q: Some("ao khoac".into()),
                ..CatalogQuery::default()
            },
        );
        assert_eq!(ids(&list), vec!["p1"]);
    }

    #[test]
    fn test_price_range_uses_sale_price() {
        let mut list = products();
        apply_catalog_query(
            &mut list,
            &CatalogQuery {
                min_price: Some("200.000".into()),
                max_price: Some("400000".into()),
                sort: Some("price_asc".into()),
                ..CatalogQuery::default()
            },
        );
        assert_eq!(ids(&list), vec!["p2", "p1"]);
    }

    #[test]
    fn test_best_selling_sort() {
        let mut list = products();
        apply_catalog_query(
            &mut list,
            &CatalogQuery {
                sort: Some("best_selling".into()),
                brand: Some("b1".into()),
                ..CatalogQuery::default()
            },
        );
        assert_eq!(ids(&list), vec!["p2", "p1"]);
    }

    #[test]
    fn test_href_keeps_filters() {
        let query = CatalogQuery {
            q: Some("áo".into()),
            category: Some("c1".into()),
            min_price: Some(" ".into()),
            ..CatalogQuery::default()
        };
        assert_eq!(query.href(1), "/products?q=%C3%A1o&category=c1");
        assert_eq!(query.href(3), "/products?q=%C3%A1o&category=c1&page=3");
        assert_eq!(CatalogQuery::default().href(1), "/products");
    }

    #[test]
    fn test_card_shows_sale() {
        let list = products();
        let card = ProductCardView::new(&list[0], false);
        assert_eq!(card.price, "400.000 ₫");
        assert_eq!(card.original_price.as_deref(), Some("500.000 ₫"));
        assert_eq!(card.discount_percent, 20);
    }

    #[test]
    fn test_validate_comment() {
        let input = CommentInput {
            rating: Some("6".into()),
            content: "Tốt".into(),
        };
        assert!(validate_comment(ProductId::new("p1"), &input).is_err());

        let input = CommentInput {
            rating: Some("4".into()),
            content: "   ".into(),
        };
        assert_eq!(
            validate_comment(ProductId::new("p1"), &input),
            Err("Vui lòng nhập nội dung đánh giá")
        );

        let input = CommentInput {
            rating: Some("5".into()),
            content: " Rất đẹp ".into(),
        };
        let comment = validate_comment(ProductId::new("p1"), &input).unwrap();
        assert_eq!(comment.rating, 5);
        assert_eq!(comment.content, "Rất đẹp");
    }

    #[test]
    fn test_average_rating() {
        let comments: Vec<Comment> = serde_json::from_value(json!([
            {"_id": "c1", "rating": 5},
            {"_id": "c2", "rating": 4},
            {"_id": "c3"}
        ]))
        .unwrap();
        assert_eq!(average_rating(&comments).as_deref(), Some("4.5"));
        assert_eq!(average_rating(&[]), None);
    }
}
