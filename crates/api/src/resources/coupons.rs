//! `/api/coupons`.

use tracing::instrument;
use zeal_core::CouponId;
use zeal_core::coupon::{Coupon, ValidCoupon};

use crate::client::{Api, ApiRequest};
use crate::credentials::TokenStore;
use crate::ApiError;

impl<S: TokenStore> Api<'_, S> {
    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self))]
    pub async fn list_coupons(&self) -> Result<Vec<Coupon>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/coupons")).await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self), fields(coupon_id = %id))]
    pub async fn get_coupon(&self, id: &CouponId) -> Result<Coupon, ApiError> {
        self.fetch(ApiRequest::get(format!("/api/coupons/{id}"))).await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self, coupon), fields(code = %coupon.code))]
    pub async fn create_coupon(&self, coupon: &ValidCoupon) -> Result<(), ApiError> {
        self.execute(ApiRequest::post("/api/coupons").json(coupon)?).await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self, coupon), fields(coupon_id = %id))]
    pub async fn update_coupon(&self, id: &CouponId, coupon: &ValidCoupon) -> Result<(), ApiError> {
        self.execute(ApiRequest::put(format!("/api/coupons/{id}")).json(coupon)?)
            .await
    }

    /// # Errors
    ///
    /// See [`Api::send`].
    #[instrument(skip(self), fields(coupon_id = %id))]
    pub async fn delete_coupon(&self, id: &CouponId) -> Result<(), ApiError> {
        self.execute(ApiRequest::delete(format!("/api/coupons/{id}"))).await
    }
}
