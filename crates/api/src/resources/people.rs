//! `/api/users`, `/api/contacts`, `/api/payments`.

use std::time::Duration;

use serde::Serialize;
use tracing::instrument;
use zeal_core::{ContactId, Role, UserId};

use crate::ApiError;
use crate::client::{Api, ApiRequest};
use crate::credentials::TokenStore;
use crate::types::{Contact, NewContact, Payment, User};

/// Timeout for contact form submission.
pub const CONTACT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct RoleUpdate {
    role: Role,
}

impl<S: TokenStore> Api<'_, S> {
    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/users")).await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self), fields(user_id = %id, role = %role))]
    pub async fn set_user_role(&self, id: &UserId, role: Role) -> Result<(), ApiError> {
        self.execute(ApiRequest::put(format!("/api/users/{id}")).json(&RoleUpdate { role })?)
            .await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: &UserId) -> Result<(), ApiError> {
        self.execute(ApiRequest::delete(format!("/api/users/{id}"))).await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self))]
    pub async fn list_contacts(&self) -> Result<Vec<Contact>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/contacts")).await
    }

    /// Submit the public contact form, bounded by [`CONTACT_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// [`ApiError::Timeout`] when the backend is too slow; otherwise see
    /// [`Api::send`].
    #[instrument(skip(self, contact), fields(email = %contact.email))]
    pub async fn create_contact(&self, contact: &NewContact) -> Result<(), ApiError> {
        self.execute(
            ApiRequest::post("/api/contacts")
                .json(contact)?
                .timeout(CONTACT_TIMEOUT),
        )
        .await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self), fields(contact_id = %id))]
    pub async fn delete_contact(&self, id: &ContactId) -> Result<(), ApiError> {
        self.execute(ApiRequest::delete(format!("/api/contacts/{id}")))
            .await
    }

    /// Payment history (admin, read-only).
    ///
    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self))]
    pub async fn list_payments(&self) -> Result<Vec<Payment>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/payments")).await
    }
}
