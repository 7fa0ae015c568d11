//! Payloads sent for each order status change.

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use zeal_api::{ApiClient, ApiConfig, MemoryTokenStore};
use zeal_core::workflow::{confirm_cancel, request_return, request_transition};
use zeal_core::{
    CancelReason, Email, Order, OrderId, ReturnStatus, ShippingStatus, TransitionKind,
    TransitionPlan,
};
use zeal_integration_tests::{ADMIN_EMAIL, CUSTOMER_EMAIL, MockBackend, PASSWORD, order_doc};

const ORDER_ID: &str = "6650a1b2c3d4e5f6a7b8c9d0";

struct Session {
    backend: MockBackend,
    client: ApiClient,
    store: MemoryTokenStore,
}

impl Session {
    async fn start(email: &str, shipping: &str, payment: &str, return_status: &str) -> Self {
        let backend =
            MockBackend::start(vec![order_doc(ORDER_ID, shipping, payment, return_status)]).await;
        let config = ApiConfig::new(&backend.url(), Duration::from_secs(5)).expect("config");
        let client = ApiClient::new(config).expect("client");
        let store = MemoryTokenStore::new();
        client
            .with(&store)
            .login(&Email::parse(email).expect("email"), &SecretString::from(PASSWORD))
            .await
            .expect("login");
        Self {
            backend,
            client,
            store,
        }
    }

    async fn order(&self) -> Order {
        self.client
            .with(&self.store)
            .get_order(&OrderId::new(ORDER_ID))
            .await
            .expect("order")
    }
}

#[tokio::test]
async fn test_delivered_sends_completed_payment() {
    let session = Session::start(ADMIN_EMAIL, "in_transit", "pending", "none").await;
    let order = session.order().await;

    let TransitionPlan::Submit(update) =
        request_transition(&order, TransitionKind::Shipping, "delivered").expect("allowed")
    else {
        panic!("delivered should submit directly");
    };
    let updated = session
        .client
        .with(&session.store)
        .update_order(&order.id, &update)
        .await
        .expect("update");

    assert_eq!(updated.shipping_status, ShippingStatus::Delivered);
    let updates = session.backend.updates().await;
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].order_id, ORDER_ID);
    assert_eq!(
        updates[0].body,
        json!({"shippingStatus": "delivered", "paymentStatus": "completed"})
    );
}

#[tokio::test]
async fn test_cancel_sends_reason() {
    let session = Session::start(ADMIN_EMAIL, "pending", "completed", "none").await;
    let order = session.order().await;

    assert_eq!(
        request_transition(&order, TransitionKind::Shipping, "cancelled").expect("allowed"),
        TransitionPlan::ConfirmCancel
    );
    let update = confirm_cancel(&order, Some(CancelReason::OutOfStock)).expect("cancellable");
    session
        .client
        .with(&session.store)
        .update_order(&order.id, &update)
        .await
        .expect("update");

    let updates = session.backend.updates().await;
    assert_eq!(
        updates[0].body,
        json!({
            "shippingStatus": "cancelled",
            "paymentStatus": "cancelled",
            "cancelReason": "out_of_stock"
        })
    );
    let stored = session.backend.order(ORDER_ID).await.expect("stored order");
    assert_eq!(stored["cancelReason"], "out_of_stock");
}

#[tokio::test]
async fn test_free_text_cancel_reason_sent_verbatim() {
    let session = Session::start(ADMIN_EMAIL, "pending", "pending", "none").await;
    let order = session.order().await;

    let reason = CancelReason::from_form("other", Some("  Khách đặt trùng đơn  "));
    let update = confirm_cancel(&order, reason).expect("cancellable");
    session
        .client
        .with(&session.store)
        .update_order(&order.id, &update)
        .await
        .expect("update");

    let updates = session.backend.updates().await;
    assert_eq!(
        updates[0].body,
        json!({"shippingStatus": "cancelled", "cancelReason": "Khách đặt trùng đơn"})
    );
}

#[tokio::test]
async fn test_refused_transition_sends_nothing() {
    let session = Session::start(ADMIN_EMAIL, "delivered", "completed", "none").await;
    let order = session.order().await;

    assert!(request_transition(&order, TransitionKind::Shipping, "pending").is_err());
    assert!(confirm_cancel(&order, Some(CancelReason::CustomerRequest)).is_err());
    assert!(session.backend.updates().await.is_empty());
}

#[tokio::test]
async fn test_customer_return_request_then_admin_approval() {
    let customer = Session::start(CUSTOMER_EMAIL, "delivered", "completed", "none").await;
    let order = customer.order().await;

    let update = request_return(&order, "Sản phẩm bị lỗi đường may").expect("returnable");
    let updated = customer
        .client
        .with(&customer.store)
        .update_order(&order.id, &update)
        .await
        .expect("update");
    assert_eq!(updated.return_status, ReturnStatus::Requested);
    assert_eq!(
        customer.backend.updates().await[0].body,
        json!({"returnStatus": "requested", "returnReason": "Sản phẩm bị lỗi đường may"})
    );

    // A second request is refused locally.
    assert!(request_return(&updated, "Đổi ý").is_err());

    let TransitionPlan::Submit(approval) =
        request_transition(&updated, TransitionKind::Return, "approved").expect("allowed")
    else {
        panic!("return decisions submit directly");
    };
    assert_eq!(approval.shipping_status, Some(ShippingStatus::Returned));
    assert_eq!(approval.return_status, Some(ReturnStatus::Approved));
}
