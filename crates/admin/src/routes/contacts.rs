//! Contact form submissions.

use askama::Template;
use axum::{
    Router,
    extract::{Path, Query, State},
    response::{Html, Redirect},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;
use zeal_api::Contact;
use zeal_core::listing::{self, SortDirection, non_blank};
use zeal_core::pagination::{DEFAULT_PER_PAGE, Page};
use zeal_core::{ContactId, display_datetime};

use crate::components::{DataTableConfig, Pager, TableColumn, TableState};
use crate::error::{AppError, OrRedirect};
use crate::filters;
use crate::middleware::{Notifier, RequireAdmin};
use crate::routes::{Layout, page_param, render};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(index))
        .route("/contacts/{id}/delete", post(delete))
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactsQuery {
    pub q: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ContactRowView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub created_at: String,
}

impl From<&Contact> for ContactRowView {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.to_string(),
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone().unwrap_or_default(),
            subject: contact.subject.clone().unwrap_or_default(),
            message: contact.message.clone(),
            created_at: display_datetime(contact.created_at.as_ref()),
        }
    }
}

#[derive(Template)]
#[template(path = "contacts/index.html")]
pub struct ContactsIndexTemplate {
    pub layout: Layout,
    pub table: DataTableConfig,
    pub state: TableState,
    pub contacts: Vec<ContactRowView>,
    pub pager: Pager,
}

/// GET /contacts
#[instrument(skip(admin, state, notifier))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    notifier: Notifier,
    Query(query): Query<ContactsQuery>,
) -> Result<Html<String>, AppError> {
    let mut contacts = state.api().with(admin.store()).list_contacts().await?;
    if let Some(q) = non_blank(query.q.as_deref()) {
        listing::filter_by_query(&mut contacts, q, |c| {
            vec![
                c.name.as_str(),
                c.email.as_str(),
                c.subject.as_deref().unwrap_or_default(),
                c.message.as_str(),
            ]
        });
    }
    listing::sort_by_key(&mut contacts, SortDirection::Desc, |c| c.created_at);
    let page = Page::paginate(contacts, page_param(query.page.as_deref()), DEFAULT_PER_PAGE);

    let table_state = TableState::new("/contacts", query.q.as_deref());
    let pager = Pager::new(&page, &table_state);

    let table = DataTableConfig::new("contacts")
        .column(TableColumn::new("name", "Người gửi"))
        .column(TableColumn::new("subject", "Chủ đề"))
        .column(TableColumn::new("message", "Nội dung"))
        .column(TableColumn::new("created", "Thời gian"))
        .search_placeholder("Tìm theo tên, email, nội dung...")
        .empty_state("Chưa có liên hệ", None);

    let template = ContactsIndexTemplate {
        layout: Layout::new(&admin, &notifier, "/contacts").await,
        table,
        state: table_state,
        contacts: page.items.iter().map(ContactRowView::from).collect(),
        pager,
    };
    Ok(render(&template))
}

/// POST /contacts/{id}/delete
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
        .delete_contact(&ContactId::new(id))
        .await
        .or_redirect("/contacts")?;
    notifier.success("Đã xóa liên hệ").await;
    Ok(Redirect::to("/contacts"))
}
