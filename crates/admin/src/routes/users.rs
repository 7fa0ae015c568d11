//! User accounts: role changes and deletion.
//!
//! An admin cannot demote or delete their own account from here; doing so
//! would lock them out mid-session.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{Html, Redirect},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;
use zeal_api::{TokenStore, User};
use zeal_core::listing::{self, SortDirection, non_blank};
use zeal_core::pagination::{DEFAULT_PER_PAGE, Page};
use zeal_core::{Role, UserId, display_date};

use crate::components::{DataTableConfig, Pager, TableColumn, TableFilter, TableState};
use crate::error::{AppError, OrRedirect};
use crate::filters;
use crate::middleware::{CurrentAdmin, Notifier, RequireAdmin};
use crate::routes::{Layout, page_param, render};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(index))
        .route("/users/{id}/role", post(set_role))
        .route("/users/{id}/delete", post(delete))
}

#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub q: Option<String>,
    pub role: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoleInput {
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct UserRowView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: &'static str,
    pub created_at: String,
    /// The signed-in admin's own row: no role or delete controls.
    pub is_self: bool,
}

impl UserRowView {
    fn new(user: &User, own_id: Option<&str>) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.display_name().to_owned(),
            email: user.email.clone(),
            phone: user.phone.clone().unwrap_or_default(),
            role: user.role.as_str(),
            created_at: display_date(user.created_at.as_ref()),
            is_self: own_id == Some(user.id.as_str()),
        }
    }
}

#[derive(Template)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub layout: Layout,
    pub table: DataTableConfig,
    pub state: TableState,
    pub users: Vec<UserRowView>,
    pub pager: Pager,
    pub roles: [Role; 2],
}

pub fn apply_query(users: &mut Vec<User>, query: &UsersQuery) {
    if let Some(role) = non_blank(query.role.as_deref()).and_then(|r| r.parse::<Role>().ok()) {
        users.retain(|u| u.role == role);
    }
    if let Some(q) = non_blank(query.q.as_deref()) {
        listing::filter_by_query(users, q, |u| {
            vec![
                u.display_name(),
                u.email.as_str(),
                u.phone.as_deref().unwrap_or_default(),
            ]
        });
    }
    let dir: SortDirection = query
        .dir
        .as_deref()
        .and_then(|d| d.parse().ok())
        .unwrap_or_default();
    match non_blank(query.sort.as_deref()) {
        Some("name") => listing::sort_by_key(users, dir, |u| listing::fold(u.display_name())),
        Some("email") => listing::sort_by_key(users, dir, |u| u.email.to_lowercase()),
        _ => listing::sort_by_key(users, SortDirection::Desc, |u| u.created_at),
    }
}

async fn own_user_id(admin: &CurrentAdmin) -> Option<String> {
    admin
        .store()
        .load()
        .await
        .and_then(|c| c.user_id)
        .map(|id| id.to_string())
}

/// GET /users
#[instrument(skip(admin, state, notifier))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Query(query): Query<UsersQuery>,
) -> Result<Html<String>, AppError> {
    let mut users = state.api().with(admin.store()).list_users().await?;
    apply_query(&mut users, &query);
    let own_id = own_user_id(&admin).await;
    let page = Page::paginate(users, page_param(query.page.as_deref()), DEFAULT_PER_PAGE);

    let dir = query
        .dir
        .as_deref()
        .and_then(|d| d.parse().ok())
        .unwrap_or_default();
    let table_state = TableState::new("/users", query.q.as_deref())
        .filtered("role", query.role.as_deref())
        .sorted(query.sort.as_deref(), dir);
    let pager = Pager::new(&page, &table_state);

    let table = DataTableConfig::new("users")
        .column(TableColumn::sortable("name", "Tên"))
        .column(TableColumn::sortable("email", "Email"))
        .column(TableColumn::new("phone", "Điện thoại"))
        .column(TableColumn::new("role", "Vai trò"))
        .column(TableColumn::new("created", "Ngày tạo"))
        .filter(
            TableFilter::from_pairs(
                "role",
                "Vai trò",
                [Role::User, Role::Admin].map(|r| (r.as_str(), role_label(r))),
            )
            .with_selected(query.role.as_deref()),
        )
        .search_placeholder("Tìm theo tên, email, điện thoại...")
        .empty_state("Chưa có người dùng", None);

    let template = UsersIndexTemplate {
        layout: Layout::new(&admin, &notifier, "/users").await,
        table,
        state: table_state,
        users: page
            .items
            .iter()
            .map(|u| UserRowView::new(u, own_id.as_deref()))
            .collect(),
        pager,
        roles: [Role::User, Role::Admin],
    };
    Ok(render(&template))
}

/// Vietnamese label for a role.
#[must_use]
pub const fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "Quản trị",
        Role::User => "Khách hàng",
    }
}

/// POST /users/{id}/role
#[instrument(skip(admin, state, notifier, input), fields(role = %input.role))]
pub async fn set_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
    Form(input): Form<RoleInput>,
) -> Result<Redirect, AppError> {
    let role: Role = input
        .role
        .parse()
        .map_err(|_| AppError::rejected("Vai trò không hợp lệ", "/users"))?;
    if own_user_id(&admin).await.as_deref() == Some(id.as_str()) {
        return Err(AppError::rejected(
            "Không thể thay đổi vai trò của chính bạn",
            "/users",
        ));
    }

    state
        .api()
        .with(admin.store())
        .set_user_role(&UserId::new(id), role)
        .await
        .or_redirect("/users")?;
    notifier
        .success(format!("Đã đổi vai trò thành {}", role_label(role)))
        .await;
    Ok(Redirect::to("/users"))
}

/// POST /users/{id}/delete
#[instrument(skip(admin, state, notifier))]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    if own_user_id(&admin).await.as_deref() == Some(id.as_str()) {
        return Err(AppError::rejected("Không thể xóa tài khoản của chính bạn", "/users"));
    }
    state
        .api()
        .with(admin.store())
        .delete_user(&UserId::new(id))
        .await
        .or_redirect("/users")?;
    notifier.success("Đã xóa người dùng").await;
    Ok(Redirect::to("/users"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_role_filter_and_self_flag() {
        let mut users: Vec<User> = serde_json::from_value(json!([
            {"_id": "u1", "email": "a@zeal.vn", "role": "admin", "username": "An"},
            {"_id": "u2", "email": "b@zeal.vn", "role": "user"}
        ]))
        .unwrap();
        apply_query(
            &mut users,
            &UsersQuery {
                role: Some("admin".into()),
                ..UsersQuery::default()
            },
        );
        assert_eq!(users.len(), 1);
        let row = UserRowView::new(&users[0], Some("u1"));
        assert!(row.is_self);
        assert_eq!(row.role, "admin");
        assert_eq!(role_label(Role::User), "Khách hàng");
    }
}
