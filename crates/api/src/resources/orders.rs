//! `/api/orders`.

use tracing::instrument;
use zeal_core::{Order, OrderId, OrderStatusUpdate};

use crate::client::{Api, ApiRequest};
use crate::credentials::TokenStore;
use crate::ApiError;

impl<S: TokenStore> Api<'_, S> {
    /// Every order (admin).
    ///
    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/orders")).await
    }

    /// Orders placed by the logged-in customer.
    ///
    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/orders/user")).await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.fetch(ApiRequest::get(format!("/api/orders/{id}"))).await
    }

    /// Commit a status change and return the order as the backend stored it.
    ///
    /// # Errors
    ///
    /// See [`Api::send`]. No retry happens beyond the token refresh.
    #[instrument(skip(self, update), fields(order_id = %id))]
    pub async fn update_order(
        &self,
        id: &OrderId,
        update: &OrderStatusUpdate,
    ) -> Result<Order, ApiError> {
        let request = ApiRequest::put(format!("/api/orders/update/{id}")).json(update)?;
        let order: Order = self.fetch(request).await?;
        tracing::info!(
            shipping_status = %order.shipping_status,
            payment_status = %order.payment_status,
            return_status = %order.return_status,
            "Order updated"
        );
        Ok(order)
    }
}
