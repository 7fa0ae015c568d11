//! Bearer auth and the refresh-once policy against the mock backend.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use zeal_api::{ApiClient, ApiConfig, ApiError, MemoryTokenStore, TokenStore};
use zeal_core::{Email, OrderId};
use zeal_integration_tests::{
    ADMIN_EMAIL, CUSTOMER_EMAIL, MockBackend, PASSWORD, REFRESHED_TOKEN, order_doc,
};

const ORDER_ID: &str = "6650a1b2c3d4e5f6a7b8c9d0";

fn client(backend: &MockBackend) -> ApiClient {
    let config = ApiConfig::new(&backend.url(), Duration::from_secs(5)).expect("config");
    ApiClient::new(config).expect("client")
}

async fn logged_in(client: &ApiClient, email: &str) -> MemoryTokenStore {
    let store = MemoryTokenStore::new();
    client
        .with(&store)
        .login(
            &Email::parse(email).expect("email"),
            &SecretString::from(PASSWORD),
        )
        .await
        .expect("login");
    store
}

#[tokio::test]
async fn test_login_stores_role_and_user() {
    let backend = MockBackend::start(vec![]).await;
    let client = client(&backend);

    let admin = logged_in(&client, ADMIN_EMAIL).await;
    let credentials = admin.load().await.expect("stored credentials");
    assert!(credentials.is_admin());
    assert_eq!(credentials.email.as_deref(), Some(ADMIN_EMAIL));

    let customer = logged_in(&client, CUSTOMER_EMAIL).await;
    let credentials = customer.load().await.expect("stored credentials");
    assert!(!credentials.is_admin());
    assert!(credentials.user_id.is_some());
}

#[tokio::test]
async fn test_wrong_password_is_not_refreshed() {
    let backend = MockBackend::start(vec![]).await;
    let client = client(&backend);
    let store = MemoryTokenStore::new();

    let err = client
        .with(&store)
        .login(
            &Email::parse(ADMIN_EMAIL).expect("email"),
            &SecretString::from("sai-mat-khau"),
        )
        .await
        .expect_err("login should fail");

    assert!(matches!(err, ApiError::Status { status: 401, .. }));
    assert_eq!(backend.refresh_calls(), 0);
    assert!(store.load().await.is_none());
}

#[tokio::test]
async fn test_expired_token_refreshes_once_and_retries() {
    let backend = MockBackend::start(vec![order_doc(ORDER_ID, "pending", "pending", "none")]).await;
    let client = client(&backend);
    let store = logged_in(&client, ADMIN_EMAIL).await;

    backend.expire_token().await;
    let order = client
        .with(&store)
        .get_order(&OrderId::new(ORDER_ID))
        .await
        .expect("retried request succeeds");

    assert_eq!(order.id.as_str(), ORDER_ID);
    assert_eq!(backend.refresh_calls(), 1);
    let credentials = store.load().await.expect("credentials kept");
    assert_eq!(credentials.token.expose_secret(), REFRESHED_TOKEN);
}

#[tokio::test]
async fn test_failed_refresh_clears_credentials() {
    let backend = MockBackend::start(vec![order_doc(ORDER_ID, "pending", "pending", "none")]).await;
    let client = client(&backend);
    let store = logged_in(&client, ADMIN_EMAIL).await;

    backend.expire_token().await;
    backend.fail_refresh();
    let err = client
        .with(&store)
        .list_orders()
        .await
        .expect_err("request should fail");

    assert!(matches!(err, ApiError::AuthExpired));
    assert!(err.is_auth());
    assert_eq!(backend.refresh_calls(), 1);
    assert!(store.load().await.is_none());
}

#[tokio::test]
async fn test_forbidden_clears_credentials_without_refresh() {
    let backend = MockBackend::start(vec![]).await;
    let client = client(&backend);
    let store = logged_in(&client, CUSTOMER_EMAIL).await;

    backend.forbid();
    let err = client
        .with(&store)
        .list_orders()
        .await
        .expect_err("request should fail");

    assert!(matches!(err, ApiError::Forbidden));
    assert_eq!(backend.refresh_calls(), 0);
    assert!(store.load().await.is_none());
}

#[tokio::test]
async fn test_missing_order_is_not_found() {
    let backend = MockBackend::start(vec![]).await;
    let client = client(&backend);
    let store = logged_in(&client, ADMIN_EMAIL).await;

    let err = client
        .with(&store)
        .get_order(&OrderId::new("000000000000000000000000"))
        .await
        .expect_err("order should be missing");

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_customer_sees_own_orders() {
    let backend = MockBackend::start(vec![
        order_doc(ORDER_ID, "delivered", "completed", "none"),
        order_doc("6650a1b2c3d4e5f6a7b8c9d1", "pending", "pending", "none"),
    ])
    .await;
    let client = client(&backend);
    let store = logged_in(&client, CUSTOMER_EMAIL).await;

    let orders = client.with(&store).my_orders().await.expect("orders");
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o.customer_id().is_some()));
}
