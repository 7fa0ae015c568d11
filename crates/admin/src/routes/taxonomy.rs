//! Category and brand management.
//!
//! Both resources are a name, a description and one picture, so they share
//! handlers and templates. [`Taxonomy`] carries what differs: paths, labels
//! and the multipart field of the picture (`image` for categories, `logo`
//! for brands).

use askama::Template;
use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    response::{Html, Redirect},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;
use zeal_api::{Brand, Category, MultipartForm};
use zeal_core::listing::{self, non_blank};
use zeal_core::pagination::{DEFAULT_PER_PAGE, Page};
use zeal_core::{BrandId, CategoryId};

use crate::components::{DataTableConfig, Pager, TableColumn, TableState};
use crate::error::{AppError, OrRedirect};
use crate::filters;
use crate::middleware::{CurrentAdmin, Notifier, RequireAdmin};
use crate::routes::forms::{UPLOAD_LIMIT, read_multipart, require_text};
use crate::routes::{Layout, page_param, render};
use crate::state::AppState;

/// Which catalog grouping a page manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taxonomy {
    Category,
    Brand,
}

impl Taxonomy {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Category => "/categories",
            Self::Brand => "/brands",
        }
    }

    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Category => "Danh mục",
            Self::Brand => "Thương hiệu",
        }
    }

    /// Lowercase noun for toasts and headings.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Category => "danh mục",
            Self::Brand => "thương hiệu",
        }
    }

    /// Multipart field carrying the picture.
    #[must_use]
    pub const fn image_field(self) -> &'static str {
        match self {
            Self::Category => "image",
            Self::Brand => "logo",
        }
    }
}

/// Category or brand as shown in lists and forms.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
}

impl From<Category> for TaxonomyItem {
    fn from(c: Category) -> Self {
        Self {
            id: c.id.into_inner(),
            name: c.name,
            description: c.description.unwrap_or_default(),
            image: c.image,
        }
    }
}

impl From<Brand> for TaxonomyItem {
    fn from(b: Brand) -> Self {
        Self {
            id: b.id.into_inner(),
            name: b.name,
            description: b.description.unwrap_or_default(),
            image: b.logo,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TaxonomyQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub page: Option<String>,
}

#[derive(Template)]
#[template(path = "catalog/index.html")]
pub struct TaxonomyIndexTemplate {
    pub layout: Layout,
    pub kind: Taxonomy,
    pub table: DataTableConfig,
    pub state: TableState,
    pub items: Vec<TaxonomyItem>,
    pub pager: Pager,
}

#[derive(Template)]
#[template(path = "catalog/form.html")]
pub struct TaxonomyFormTemplate {
    pub layout: Layout,
    pub kind: Taxonomy,
    pub action: String,
    pub item: TaxonomyItem,
    pub editing: bool,
}

/// Build the categories and brands router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(category_index).post(category_create))
        .route("/categories/new", get(category_new))
        .route("/categories/{id}", get(category_edit).post(category_update))
        .route("/categories/{id}/delete", post(category_delete))
        .route("/brands", get(brand_index).post(brand_create))
        .route("/brands/new", get(brand_new))
        .route("/brands/{id}", get(brand_edit).post(brand_update))
        .route("/brands/{id}/delete", post(brand_delete))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT))
}

// =============================================================================
// Backend dispatch
// =============================================================================

async fn fetch_all(
    kind: Taxonomy,
    admin: &CurrentAdmin,
    state: &AppState,
) -> Result<Vec<TaxonomyItem>, zeal_api::ApiError> {
    let api = state.api().with(admin.store());
    Ok(match kind {
        Taxonomy::Category => api.list_categories().await?.into_iter().map(Into::into).collect(),
        Taxonomy::Brand => api.list_brands().await?.into_iter().map(Into::into).collect(),
    })
}

async fn fetch_one(
    kind: Taxonomy,
    id: String,
    admin: &CurrentAdmin,
    state: &AppState,
) -> Result<TaxonomyItem, zeal_api::ApiError> {
    let api = state.api().with(admin.store());
    Ok(match kind {
        Taxonomy::Category => api.get_category(&CategoryId::new(id)).await?.into(),
        Taxonomy::Brand => api.get_brand(&BrandId::new(id)).await?.into(),
    })
}

async fn save(
    kind: Taxonomy,
    id: Option<String>,
    form: &MultipartForm,
    admin: &CurrentAdmin,
    state: &AppState,
) -> Result<(), zeal_api::ApiError> {
    let api = state.api().with(admin.store());
    match (kind, id) {
        (Taxonomy::Category, None) => api.create_category(form).await,
        (Taxonomy::Category, Some(id)) => api.update_category(&CategoryId::new(id), form).await,
        (Taxonomy::Brand, None) => api.create_brand(form).await,
        (Taxonomy::Brand, Some(id)) => api.update_brand(&BrandId::new(id), form).await,
    }
}

async fn remove(
    kind: Taxonomy,
    id: String,
    admin: &CurrentAdmin,
    state: &AppState,
) -> Result<(), zeal_api::ApiError> {
    let api = state.api().with(admin.store());
    match kind {
        Taxonomy::Category => api.delete_category(&CategoryId::new(id)).await,
        Taxonomy::Brand => api.delete_brand(&BrandId::new(id)).await,
    }
}

// =============================================================================
// Shared handlers
// =============================================================================

/// Search and sort by name; unsorted lists keep backend order.
pub fn apply_query(items: &mut Vec<TaxonomyItem>, query: &TaxonomyQuery) {
    if let Some(q) = non_blank(query.q.as_deref()) {
        listing::filter_by_query(items, q, |i| vec![i.name.as_str(), i.description.as_str()]);
    }
    if non_blank(query.sort.as_deref()) == Some("name") {
        let dir = query
            .dir
            .as_deref()
            .and_then(|d| d.parse().ok())
            .unwrap_or_default();
        listing::sort_by_key(items, dir, |i| listing::fold(&i.name));
    }
}

#[instrument(skip(admin, state, notifier, query))]
async fn index(
    kind: Taxonomy,
    admin: CurrentAdmin,
    state: AppState,
    notifier: Notifier,
    query: TaxonomyQuery,
) -> Result<Html<String>, AppError> {
    let mut items = fetch_all(kind, &admin, &state).await?;
    apply_query(&mut items, &query);
    let page = Page::paginate(items, page_param(query.page.as_deref()), DEFAULT_PER_PAGE);

    let dir = query
        .dir
        .as_deref()
        .and_then(|d| d.parse().ok())
        .unwrap_or_default();
    let table_state =
        TableState::new(kind.path(), query.q.as_deref()).sorted(query.sort.as_deref(), dir);
    let pager = Pager::new(&page, &table_state);

    let new_href = match kind {
        Taxonomy::Category => "/categories/new",
        Taxonomy::Brand => "/brands/new",
    };
    let table = DataTableConfig::new(kind.path().trim_start_matches('/'))
        .column(TableColumn::new("image", "Ảnh"))
        .column(TableColumn::sortable("name", "Tên"))
        .column(TableColumn::new("description", "Mô tả"))
        .search_placeholder("Tìm theo tên...")
        .new_href(new_href);

    let template = TaxonomyIndexTemplate {
        layout: Layout::new(&admin, &notifier, kind.path()).await,
        kind,
        table,
        state: table_state,
        items: page.items,
        pager,
    };
    Ok(render(&template))
}

async fn form_page(
    kind: Taxonomy,
    admin: CurrentAdmin,
    state: AppState,
    notifier: Notifier,
    id: Option<String>,
) -> Result<Html<String>, AppError> {
    let (item, action) = match id {
        Some(id) => {
            let item = fetch_one(kind, id, &admin, &state).await?;
            let action = format!("{}/{}", kind.path(), item.id);
            (item, action)
        }
        None => (TaxonomyItem::default(), kind.path().to_owned()),
    };

    let template = TaxonomyFormTemplate {
        layout: Layout::new(&admin, &notifier, kind.path()).await,
        kind,
        editing: !item.id.is_empty(),
        action,
        item,
    };
    Ok(render(&template))
}

#[instrument(skip(admin, state, notifier, multipart))]
async fn submit(
    kind: Taxonomy,
    admin: CurrentAdmin,
    state: AppState,
    notifier: Notifier,
    id: Option<String>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let back = match &id {
        Some(id) => format!("{}/{id}", kind.path()),
        None => format!("{}/new", kind.path()),
    };
    let form = read_multipart(multipart, &back).await?;
    require_text(&form, "name", "Vui lòng nhập tên", &back)?;

    let created = id.is_none();
    save(kind, id, &form, &admin, &state).await.or_redirect(&back)?;
    let verb = if created { "Đã thêm" } else { "Đã cập nhật" };
    notifier.success(format!("{verb} {}", kind.noun())).await;
    Ok(Redirect::to(kind.path()))
}

async fn delete(
    kind: Taxonomy,
    admin: CurrentAdmin,
    state: AppState,
    notifier: Notifier,
    id: String,
) -> Result<Redirect, AppError> {
    remove(kind, id, &admin, &state)
        .await
        .or_redirect(kind.path())?;
    notifier.success(format!("Đã xóa {}", kind.noun())).await;
    Ok(Redirect::to(kind.path()))
}

// =============================================================================
// Route entry points
// =============================================================================

/// GET /categories
async fn category_index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Query(query): Query<TaxonomyQuery>,
) -> Result<Html<String>, AppError> {
    index(Taxonomy::Category, admin, state, notifier, query).await
}

/// GET /categories/new
async fn category_new(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
) -> Result<Html<String>, AppError> {
    form_page(Taxonomy::Category, admin, state, notifier, None).await
}

/// GET /categories/{id}
async fn category_edit(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    form_page(Taxonomy::Category, admin, state, notifier, Some(id)).await
}

/// POST /categories
async fn category_create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    submit(Taxonomy::Category, admin, state, notifier, None, multipart).await
}

/// POST /categories/{id}
async fn category_update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    submit(Taxonomy::Category, admin, state, notifier, Some(id), multipart).await
}

/// POST /categories/{id}/delete
async fn category_delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    delete(Taxonomy::Category, admin, state, notifier, id).await
}

/// GET /brands
async fn brand_index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Query(query): Query<TaxonomyQuery>,
) -> Result<Html<String>, AppError> {
    index(Taxonomy::Brand, admin, state, notifier, query).await
}

/// GET /brands/new
async fn brand_new(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
) -> Result<Html<String>, AppError> {
    form_page(Taxonomy::Brand, admin, state, notifier, None).await
}

/// GET /brands/{id}
async fn brand_edit(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    form_page(Taxonomy::Brand, admin, state, notifier, Some(id)).await
}

/// POST /brands
async fn brand_create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    submit(Taxonomy::Brand, admin, state, notifier, None, multipart).await
}

/// POST /brands/{id}
async fn brand_update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    submit(Taxonomy::Brand, admin, state, notifier, Some(id), multipart).await
}

/// POST /brands/{id}/delete
async fn brand_delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    delete(Taxonomy::Brand, admin, state, notifier, id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str) -> TaxonomyItem {
        TaxonomyItem {
            id: id.to_owned(),
            name: name.to_owned(),
            ..TaxonomyItem::default()
        }
    }

    #[test]
    fn test_kind_fields() {
        assert_eq!(Taxonomy::Category.image_field(), "image");
        assert_eq!(Taxonomy::Brand.image_field(), "logo");
        assert_eq!(Taxonomy::Brand.path(), "/brands");
    }

    #[test]
    fn test_apply_query_search_and_sort() {
        let mut items = vec![item("c1", "Đồng hồ"), item("c2", "Áo"), item("c3", "Dép")];
        apply_query(
            &mut items,
            &TaxonomyQuery {
                sort: Some("name".into()),
                ..TaxonomyQuery::default()
            },
        );
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Áo", "Dép", "Đồng hồ"]);

        apply_query(
            &mut items,
            &TaxonomyQuery {
                q: Some("dong".into()),
                ..TaxonomyQuery::default()
            },
        );
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "c1");
    }
}
