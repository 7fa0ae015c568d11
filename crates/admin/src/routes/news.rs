//! News article management.
//!
//! Multipart fields sent to the backend: `title`, `description`, `content`
//! (HTML from the editor) and the `image` file.

use askama::Template;
use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    response::{Html, Redirect},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;
use zeal_api::News;
use zeal_core::listing::{self, SortDirection, non_blank};
use zeal_core::pagination::{DEFAULT_PER_PAGE, Page};
use zeal_core::{NewsId, display_date};

use crate::components::{DataTableConfig, Pager, TableColumn, TableState};
use crate::error::{AppError, OrRedirect};
use crate::filters;
use crate::middleware::{Notifier, RequireAdmin};
use crate::routes::forms::{UPLOAD_LIMIT, read_multipart, require_text};
use crate::routes::{Layout, page_param, render};
use crate::state::AppState;

/// Characters of the excerpt shown in the list.
const EXCERPT_CHARS: usize = 120;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/news", get(index).post(create))
        .route("/news/new", get(new_form))
        .route("/news/{id}", get(edit_form).post(update))
        .route("/news/{id}/delete", post(delete))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT))
}

#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewsRowView {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub thumbnail: Option<String>,
    pub author: String,
    pub created_at: String,
}

impl From<&News> for NewsRowView {
    fn from(news: &News) -> Self {
        Self {
            id: news.id.to_string(),
            title: news.title.clone(),
            excerpt: news.excerpt(EXCERPT_CHARS),
            thumbnail: news.thumbnail.clone(),
            author: news
                .author
                .as_ref()
                .and_then(zeal_api::DocRef::name)
                .unwrap_or("-")
                .to_owned(),
            created_at: display_date(news.created_at.as_ref()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewsFormView {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub thumbnail: Option<String>,
}

#[derive(Template)]
#[template(path = "news/index.html")]
pub struct NewsIndexTemplate {
    pub layout: Layout,
    pub table: DataTableConfig,
    pub state: TableState,
    pub articles: Vec<NewsRowView>,
    pub pager: Pager,
}

#[derive(Template)]
#[template(path = "news/form.html")]
pub struct NewsFormTemplate {
    pub layout: Layout,
    pub action: String,
    pub article: NewsFormView,
    pub editing: bool,
}

/// Search titles and content; newest first unless sorted by title.
pub fn apply_query(articles: &mut Vec<News>, query: &NewsQuery) {
    if let Some(q) = non_blank(query.q.as_deref()) {
        listing::filter_by_query(articles, q, |n| vec![n.title.as_str(), n.content.as_str()]);
    }
    let dir: SortDirection = query
        .dir
        .as_deref()
        .and_then(|d| d.parse().ok())
        .unwrap_or_default();
    match non_blank(query.sort.as_deref()) {
        Some("title") => listing::sort_by_key(articles, dir, |n| listing::fold(&n.title)),
        Some("created") => listing::sort_by_key(articles, dir, |n| n.created_at),
        _ => listing::sort_by_key(articles, SortDirection::Desc, |n| n.created_at),
    }
}

/// GET /news
#[instrument(skip(admin, state, notifier))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Query(query): Query<NewsQuery>,
) -> Result<Html<String>, AppError> {
    let mut articles = state.api().with(admin.store()).list_news().await?;
    apply_query(&mut articles, &query);
    let page = Page::paginate(articles, page_param(query.page.as_deref()), DEFAULT_PER_PAGE);

    let dir = query
        .dir
        .as_deref()
        .and_then(|d| d.parse().ok())
        .unwrap_or_default();
    let table_state =
        TableState::new("/news", query.q.as_deref()).sorted(query.sort.as_deref(), dir);
    let pager = Pager::new(&page, &table_state);

    let table = DataTableConfig::new("news")
        .column(TableColumn::sortable("title", "Tiêu đề"))
        .column(TableColumn::new("author", "Tác giả"))
        .column(TableColumn::sortable("created", "Ngày đăng"))
        .search_placeholder("Tìm bài viết...")
        .empty_state("Chưa có bài viết", None)
        .new_href("/news/new");

    let template = NewsIndexTemplate {
        layout: Layout::new(&admin, &notifier, "/news").await,
        table,
        state: table_state,
        articles: page.items.iter().map(NewsRowView::from).collect(),
        pager,
    };
    Ok(render(&template))
}

/// GET /news/new
pub async fn new_form(RequireAdmin(admin): RequireAdmin, notifier: Notifier) -> Html<String> {
    render(&NewsFormTemplate {
        layout: Layout::new(&admin, &notifier, "/news").await,
        action: "/news".to_owned(),
        article: NewsFormView::default(),
        editing: false,
    })
}

/// GET /news/{id}
#[instrument(skip(admin, state, notifier))]
pub async fn edit_form(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let news = state
        .api()
        .with(admin.store())
        .get_news(&NewsId::new(id))
        .await?;
    Ok(render(&NewsFormTemplate {
        layout: Layout::new(&admin, &notifier, "/news").await,
        action: format!("/news/{}", news.id),
        article: NewsFormView {
            title: news.title,
            summary: news.summary.unwrap_or_default(),
            content: news.content,
            thumbnail: news.thumbnail,
        },
        editing: true,
    }))
}

/// POST /news
#[instrument(skip(admin, state, notifier, multipart))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let back = "/news/new";
    let form = read_multipart(multipart, back).await?;
    require_text(&form, "title", "Vui lòng nhập tiêu đề", back)?;
    require_text(&form, "content", "Vui lòng nhập nội dung", back)?;

    state
        .api()
        .with(admin.store())
        .create_news(&form)
        .await
        .or_redirect(back)?;
    notifier.success("Đã đăng bài viết").await;
    Ok(Redirect::to("/news"))
}

/// POST /news/{id}
#[instrument(skip(admin, state, notifier, multipart))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let back = format!("/news/{id}");
    let form = read_multipart(multipart, &back).await?;
    require_text(&form, "title", "Vui lòng nhập tiêu đề", &back)?;
    require_text(&form, "content", "Vui lòng nhập nội dung", &back)?;

    state
        .api()
        .with(admin.store())
        .update_news(&NewsId::new(id), &form)
        .await
        .or_redirect(&back)?;
    notifier.success("Đã cập nhật bài viết").await;
    Ok(Redirect::to("/news"))
}

/// POST /news/{id}/delete
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
        .delete_news(&NewsId::new(id))
        .await
        .or_redirect("/news")?;
    notifier.success("Đã xóa bài viết").await;
    Ok(Redirect::to("/news"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_newest_first_and_search() {
        let mut articles: Vec<News> = serde_json::from_value(json!([
            {"_id": "n1", "title": "Khai trương", "content": "<p>Cửa hàng mới</p>",
             "createdAt": "2026-09-01T00:00:00Z"},
            {"_id": "n2", "title": "Bộ sưu tập thu đông", "content": "<p>Áo len</p>",
             "createdAt": "2026-10-01T00:00:00Z", "author": {"_id": "u1", "username": "lan"}}
        ]))
        .unwrap();
        apply_query(&mut articles, &NewsQuery::default());
        assert_eq!(articles[0].id.as_str(), "n2");

        let row = NewsRowView::from(&articles[0]);
        assert_eq!(row.author, "lan");
        assert_eq!(row.excerpt, "Áo len");

        apply_query(
            &mut articles,
            &NewsQuery {
                q: Some("cua hang".into()),
                ..NewsQuery::default()
            },
        );
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].id.as_str(), "n1");
    }
}
