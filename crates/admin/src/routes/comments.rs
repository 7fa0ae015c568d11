//! Product comment moderation.

use askama::Template;
use axum::{
    Router,
    extract::{Path, Query, State},
    response::{Html, Redirect},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;
use zeal_api::{Comment, DocRef};
use zeal_core::listing::{self, SortDirection, non_blank};
use zeal_core::pagination::{DEFAULT_PER_PAGE, Page};
use zeal_core::{CommentId, display_datetime};

use crate::components::{DataTableConfig, Pager, TableColumn, TableFilter, TableState};
use crate::error::{AppError, OrRedirect};
use crate::filters;
use crate::middleware::{Notifier, RequireAdmin};
use crate::routes::{Layout, page_param, render};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/comments", get(index))
        .route("/comments/{id}/delete", post(delete))
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentsQuery {
    pub q: Option<String>,
    pub rating: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CommentRowView {
    pub id: String,
    pub author: String,
    pub product: String,
    pub product_id: Option<String>,
    pub content: String,
    /// Filled and empty stars, e.g. `★★★★☆`.
    pub stars: String,
    pub created_at: String,
}

impl From<&Comment> for CommentRowView {
    fn from(comment: &Comment) -> Self {
        let rating = usize::from(comment.rating.unwrap_or(0).min(5));
        Self {
            id: comment.id.to_string(),
            author: comment.author_name().to_owned(),
            product: comment
                .product
                .as_ref()
                .map(|p| p.name().unwrap_or(p.id()).to_owned())
                .unwrap_or_default(),
            product_id: comment.product.as_ref().map(|p| DocRef::id(p).to_owned()),
            content: comment.content.clone(),
            stars: format!("{}{}", "★".repeat(rating), "☆".repeat(5 - rating)),
            created_at: display_datetime(comment.created_at.as_ref()),
        }
    }
}

#[derive(Template)]
#[template(path = "comments/index.html")]
pub struct CommentsIndexTemplate {
    pub layout: Layout,
    pub table: DataTableConfig,
    pub state: TableState,
    pub comments: Vec<CommentRowView>,
    pub pager: Pager,
}

/// Newest first, filtered by rating and text.
pub fn apply_query(comments: &mut Vec<Comment>, query: &CommentsQuery) {
    if let Some(rating) = non_blank(query.rating.as_deref()).and_then(|r| r.parse::<u8>().ok()) {
        comments.retain(|c| c.rating == Some(rating));
    }
    if let Some(q) = non_blank(query.q.as_deref()) {
        listing::filter_by_query(comments, q, |c| vec![c.content.as_str(), c.author_name()]);
    }
    listing::sort_by_key(comments, SortDirection::Desc, |c| c.created_at);
}

/// GET /comments
#[instrument(skip(admin, state, notifier))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Query(query): Query<CommentsQuery>,
) -> Result<Html<String>, AppError> {
    let mut comments = state.api().with(admin.store()).list_comments().await?;
    apply_query(&mut comments, &query);
    let page = Page::paginate(comments, page_param(query.page.as_deref()), DEFAULT_PER_PAGE);

    let table_state = TableState::new("/comments", query.q.as_deref())
        .filtered("rating", query.rating.as_deref());
    let pager = Pager::new(&page, &table_state);

    let table = DataTableConfig::new("comments")
        .column(TableColumn::new("author", "Người viết"))
        .column(TableColumn::new("product", "Sản phẩm"))
        .column(TableColumn::new("rating", "Đánh giá"))
        .column(TableColumn::new("content", "Nội dung"))
        .column(TableColumn::new("created", "Thời gian"))
        .filter(
            TableFilter::from_pairs(
                "rating",
                "Số sao",
                [("5", "5 sao"), ("4", "4 sao"), ("3", "3 sao"), ("2", "2 sao"), ("1", "1 sao")],
            )
            .with_selected(query.rating.as_deref()),
        )
        .search_placeholder("Tìm trong bình luận...")
        .empty_state("Chưa có bình luận", None);

    let template = CommentsIndexTemplate {
        layout: Layout::new(&admin, &notifier, "/comments").await,
        table,
        state: table_state,
        comments: page.items.iter().map(CommentRowView::from).collect(),
        pager,
    };
    Ok(render(&template))
}

/// POST /comments/{id}/delete
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
        .delete_comment(&CommentId::new(id))
        .await
        .or_redirect("/comments")?;
    notifier.success("Đã xóa bình luận").await;
    Ok(Redirect::to("/comments"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_rating_filter_and_stars() {
        let mut comments: Vec<Comment> = serde_json::from_value(json!([
            {"_id": "c1", "content": "Tốt", "rating": 4, "product": {"_id": "p1", "name": "Áo"}},
            {"_id": "c2", "content": "Tệ", "rating": 1}
        ]))
        .unwrap();
        apply_query(
            &mut comments,
            &CommentsQuery {
                rating: Some("4".into()),
                ..CommentsQuery::default()
            },
        );
        assert_eq!(comments.len(), 1);

        let row = CommentRowView::from(&comments[0]);
        assert_eq!(row.stars, "★★★★☆");
        assert_eq!(row.product, "Áo");
        assert_eq!(row.product_id.as_deref(), Some("p1"));
    }
}
