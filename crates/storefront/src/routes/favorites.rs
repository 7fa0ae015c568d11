//! Favorite products, kept in the visitor's session under
//! `favoriteProducts`. No login needed; favorites end with the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{Notifier, OptionalUser, session_keys};
use crate::routes::Layout;
use crate::routes::products::ProductCardView;
use crate::state::AppState;

/// Most favorites one session keeps; the oldest are dropped first.
pub const MAX_FAVORITES: usize = 100;

/// Session-backed favorite list (product IDs, oldest first).
#[derive(Debug, Clone)]
pub struct Favorites {
    session: Session,
}

impl Favorites {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn ids(&self) -> Vec<String> {
        self.session
            .get(session_keys::FAVORITES)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    async fn save(&self, ids: &[String]) {
        if let Err(e) = self.session.insert(session_keys::FAVORITES, ids).await {
            tracing::error!(error = %e, "Failed to store favorites");
        }
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.ids().await.iter().any(|f| f == id)
    }

    /// Add or remove `id`; returns whether it is now a favorite.
    pub async fn toggle(&self, id: &str) -> bool {
        let mut ids = self.ids().await;
        let added = toggle_id(&mut ids, id);
        self.save(&ids).await;
        added
    }

    /// Keep only the IDs in `existing`.
    pub async fn retain(&self, existing: impl Fn(&str) -> bool) {
        let mut ids = self.ids().await;
        let before = ids.len();
        ids.retain(|id| existing(id));
        if ids.len() != before {
            self.save(&ids).await;
        }
    }
}

fn toggle_id(ids: &mut Vec<String>, id: &str) -> bool {
    if let Some(pos) = ids.iter().position(|f| f == id) {
        ids.remove(pos);
        return false;
    }
    ids.push(id.to_owned());
    if ids.len() > MAX_FAVORITES {
        ids.drain(..ids.len() - MAX_FAVORITES);
    }
    true
}

/// Redirect target from a form; only same-site paths are accepted.
#[must_use]
pub fn safe_back(back: Option<&str>, fallback: &str) -> String {
    back.map(str::trim)
        .filter(|b| b.starts_with('/') && !b.starts_with("//"))
        .unwrap_or(fallback)
        .to_owned()
}

#[derive(Template, WebTemplate)]
#[template(path = "favorites.html")]
pub struct FavoritesTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCardView>,
}

/// GET /favorites
#[instrument(skip(state, user, session))]
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    session: Session,
) -> Result<FavoritesTemplate> {
    let favorites = Favorites::new(session.clone());
    let ids = favorites.ids().await;

    let products = if ids.is_empty() {
        Vec::new()
    } else {
        let all = state.api().anonymous().list_products().await?;
        favorites
            .retain(|id| all.iter().any(|p| p.id.as_str() == id))
            .await;
        ids.iter()
            .rev()
            .filter_map(|id| all.iter().find(|p| p.id.as_str() == id))
            .map(|p| ProductCardView::new(p, true))
            .collect()
    };

    Ok(FavoritesTemplate {
        layout: Layout::new(user.as_ref(), &session, "/favorites").await,
        products,
    })
}

#[derive(Debug, Deserialize)]
pub struct ToggleInput {
    pub back: Option<String>,
}

/// POST /favorites/{id}/toggle
#[instrument(skip(session, notifier, input))]
pub async fn toggle(
    session: Session,
    notifier: Notifier,
    Path(id): Path<String>,
    Form(input): Form<ToggleInput>,
) -> Redirect {
    let added = Favorites::new(session).toggle(&id).await;
    if added {
        notifier.success("Đã thêm vào yêu thích").await;
    } else {
        notifier.info("Đã bỏ khỏi yêu thích").await;
    }
    Redirect::to(&safe_back(input.back.as_deref(), "/favorites"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut ids = Vec::new();
        assert!(toggle_id(&mut ids, "p1"));
        assert!(toggle_id(&mut ids, "p2"));
        assert!(!toggle_id(&mut ids, "p1"));
        assert_eq!(ids, vec!["p2".to_owned()]);
    }

    #[test]
    fn test_oldest_favorite_dropped_at_capacity() {
        let mut ids: Vec<String> = (0..MAX_FAVORITES).map(|i| format!("p{i}")).collect();
        assert!(toggle_id(&mut ids, "new"));
        assert_eq!(ids.len(), MAX_FAVORITES);
        assert_eq!(ids.first().map(String::as_str), Some("p1"));
        assert_eq!(ids.last().map(String::as_str), Some("new"));
    }

    #[test]
    fn test_safe_back_rejects_offsite_targets() {
        assert_eq!(safe_back(Some("/products/p1"), "/favorites"), "/products/p1");
        assert_eq!(safe_back(Some("//evil.example"), "/favorites"), "/favorites");
        assert_eq!(safe_back(Some("https://evil.example"), "/favorites"), "/favorites");
        assert_eq!(safe_back(None, "/favorites"), "/favorites");
    }
}
