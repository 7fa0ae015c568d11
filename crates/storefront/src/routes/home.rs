//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;
use zeal_api::{Banner, Category};
use zeal_core::listing::{self, SortDirection};

use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::routes::Layout;
use crate::routes::favorites::Favorites;
use crate::routes::news::NewsCardView;
use crate::routes::products::ProductCardView;
use crate::state::AppState;

/// Products in the "new arrivals" strip.
const NEW_ARRIVALS: usize = 8;
/// Articles in the news strip.
const LATEST_NEWS: usize = 3;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub banners: Vec<Banner>,
    pub categories: Vec<Category>,
    pub new_arrivals: Vec<ProductCardView>,
    pub news: Vec<NewsCardView>,
}

/// Display home page.
///
/// Only the product list is required; banners, categories and news are
/// left out when the backend cannot provide them.
#[instrument(skip(state, user, session))]
pub async fn home(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    session: Session,
) -> Result<HomeTemplate> {
    let api = state.api().anonymous();

    let (products, banners, categories, news) = tokio::join!(
        api.list_products(),
        state.catalog().banners(&api),
        state.catalog().categories(&api),
        api.list_news(),
    );

    let mut products = products?;
    listing::sort_by_key(&mut products, SortDirection::Desc, |p| p.created_at);
    let favorite_ids = Favorites::new(session.clone()).ids().await;

    let mut news = news.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load news for home page");
        Vec::new()
    });
    listing::sort_by_key(&mut news, SortDirection::Desc, |n| n.created_at);

    Ok(HomeTemplate {
        layout: Layout::new(user.as_ref(), &session, "/").await,
        banners,
        categories: categories.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load categories for home page");
            Vec::new()
        }),
        new_arrivals: products
            .iter()
            .take(NEW_ARRIVALS)
            .map(|p| ProductCardView::new(p, favorite_ids.iter().any(|f| f == p.id.as_str())))
            .collect(),
        news: news.iter().take(LATEST_NEWS).map(NewsCardView::from).collect(),
    })
}
