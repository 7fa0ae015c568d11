//! News listing and articles.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use zeal_api::{DocRef, News};
use zeal_core::listing::{self, SortDirection};
use zeal_core::pagination::Page;
use zeal_core::{NewsId, display_date};

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::pager::Pager;
use crate::routes::{Layout, page_param};
use crate::state::AppState;

/// Articles per listing page.
pub const NEWS_PER_PAGE: usize = 9;
const EXCERPT_CHARS: usize = 160;

#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    pub page: Option<String>,
}

/// Article tile for listings.
#[derive(Debug, Clone)]
pub struct NewsCardView {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub thumbnail: Option<String>,
    pub published: String,
}

impl From<&News> for NewsCardView {
    fn from(news: &News) -> Self {
        Self {
            id: news.id.to_string(),
            title: news.title.clone(),
            excerpt: news.excerpt(EXCERPT_CHARS),
            thumbnail: news.thumbnail.clone(),
            published: display_date(news.created_at.as_ref()),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "news/index.html")]
pub struct NewsIndexTemplate {
    pub layout: Layout,
    pub articles: Vec<NewsCardView>,
    pub pager: Pager,
}

/// GET /news
#[instrument(skip(state, user, session))]
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    session: Session,
    Query(query): Query<NewsQuery>,
) -> Result<NewsIndexTemplate> {
    let mut news = state.api().anonymous().list_news().await?;
    listing::sort_by_key(&mut news, SortDirection::Desc, |n| n.created_at);

    let page = Page::paginate(news, page_param(query.page.as_deref()), NEWS_PER_PAGE);
    let pager = Pager::new(&page, |n| format!("/news?page={n}"));

    Ok(NewsIndexTemplate {
        layout: Layout::new(user.as_ref(), &session, "/news").await,
        articles: page.items.iter().map(NewsCardView::from).collect(),
        pager,
    })
}

#[derive(Template, WebTemplate)]
#[template(path = "news/show.html")]
pub struct NewsShowTemplate {
    pub layout: Layout,
    pub title: String,
    pub author: Option<String>,
    pub published: String,
    pub thumbnail: Option<String>,
    /// Article body as authored in the admin editor.
    pub content: String,
}

/// GET /news/{id}
#[instrument(skip(state, user, session))]
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    session: Session,
    Path(id): Path<String>,
) -> Result<NewsShowTemplate> {
    let news = state.api().anonymous().get_news(&NewsId::new(id)).await?;

    Ok(NewsShowTemplate {
        layout: Layout::new(user.as_ref(), &session, "/news").await,
        author: news.author.as_ref().and_then(DocRef::name).map(str::to_owned),
        published: display_date(news.created_at.as_ref()),
        thumbnail: news.thumbnail.clone(),
        title: news.title,
        content: news.content,
    })
}
