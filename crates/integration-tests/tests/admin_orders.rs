//! Admin dashboard order pages, driven over HTTP against the mock backend.

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::{Client, StatusCode, header, redirect};
use serde_json::json;
use zeal_admin::config::{AdminConfig, BackendConfig};
use zeal_admin::state::AppState;
use zeal_integration_tests::{ADMIN_EMAIL, CUSTOMER_EMAIL, MockBackend, PASSWORD, order_doc};

const ORDER_ID: &str = "6650a1b2c3d4e5f6a7b8c9d0";

struct Dashboard {
    backend: MockBackend,
    base: String,
    http: Client,
}

impl Dashboard {
    /// Start the admin router in front of a mock backend holding one order.
    async fn start(shipping: &str, payment: &str, return_status: &str) -> Self {
        let backend =
            MockBackend::start(vec![order_doc(ORDER_ID, shipping, payment, return_status)]).await;

        let config = AdminConfig {
            host: "127.0.0.1".parse().expect("host"),
            port: 0,
            base_url: "http://127.0.0.1".to_owned(),
            backend: BackendConfig {
                url: backend.url(),
                timeout: Duration::from_secs(5),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        };
        let app = zeal_admin::app(AppState::new(config).expect("state"));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind admin");
        let addr: SocketAddr = listener.local_addr().expect("admin address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("admin server");
        });

        let http = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("http client");

        Self {
            backend,
            base: format!("http://{addr}"),
            http,
        }
    }

    async fn login(&self, email: &str) -> String {
        let response = self
            .http
            .post(format!("{}/auth/login", self.base))
            .form(&[("email", email), ("password", PASSWORD)])
            .send()
            .await
            .expect("login request");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        location(&response)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.http
            .get(format!("{}{path}", self.base))
            .send()
            .await
            .expect("GET request")
    }

    async fn post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.http
            .post(format!("{}{path}", self.base))
            .form(form)
            .send()
            .await
            .expect("POST request")
    }
}

fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

#[tokio::test]
async fn test_orders_require_login() {
    let dashboard = Dashboard::start("pending", "pending", "none").await;

    let response = dashboard.get("/orders").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");
}

#[tokio::test]
async fn test_customer_account_cannot_enter() {
    let dashboard = Dashboard::start("pending", "pending", "none").await;

    assert_eq!(dashboard.login(CUSTOMER_EMAIL).await, "/auth/login");
    let response = dashboard.get("/orders").await;
    assert_eq!(location(&response), "/auth/login");
}

#[tokio::test]
async fn test_order_pages_render() {
    let dashboard = Dashboard::start("pending", "pending", "none").await;
    assert_eq!(dashboard.login(ADMIN_EMAIL).await, "/");

    let list = dashboard.get("/orders").await;
    assert_eq!(list.status(), StatusCode::OK);
    let body = list.text().await.expect("list body");
    assert!(body.contains("A7B8C9D0"));

    let detail = dashboard.get(&format!("/orders/{ORDER_ID}")).await;
    assert_eq!(detail.status(), StatusCode::OK);
    let body = detail.text().await.expect("detail body");
    assert!(body.contains("Nguyễn Văn A"));
    assert!(body.contains("Áo khoác gió"));
}

#[tokio::test]
async fn test_ship_then_deliver() {
    let dashboard = Dashboard::start("pending", "pending", "none").await;
    dashboard.login(ADMIN_EMAIL).await;
    let path = format!("/orders/{ORDER_ID}/transition");

    let response = dashboard
        .post(&path, &[("kind", "shipping"), ("target", "in_transit")])
        .await;
    assert_eq!(location(&response), format!("/orders/{ORDER_ID}"));

    dashboard
        .post(&path, &[("kind", "shipping"), ("target", "delivered")])
        .await;

    let updates = dashboard.backend.updates().await;
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].body, json!({"shippingStatus": "in_transit"}));
    assert_eq!(
        updates[1].body,
        json!({"shippingStatus": "delivered", "paymentStatus": "completed"})
    );
}

#[tokio::test]
async fn test_skipping_a_step_is_refused() {
    let dashboard = Dashboard::start("pending", "pending", "none").await;
    dashboard.login(ADMIN_EMAIL).await;

    let response = dashboard
        .post(
            &format!("/orders/{ORDER_ID}/transition"),
            &[("kind", "shipping"), ("target", "delivered")],
        )
        .await;

    assert_eq!(location(&response), format!("/orders/{ORDER_ID}"));
    assert!(dashboard.backend.updates().await.is_empty());
}

#[tokio::test]
async fn test_cancel_goes_through_confirmation() {
    let dashboard = Dashboard::start("pending", "pending", "none").await;
    dashboard.login(ADMIN_EMAIL).await;

    let response = dashboard
        .post(
            &format!("/orders/{ORDER_ID}/transition"),
            &[("kind", "shipping"), ("target", "cancelled")],
        )
        .await;
    assert_eq!(location(&response), format!("/orders/{ORDER_ID}/cancel"));
    assert!(dashboard.backend.updates().await.is_empty());

    let confirm = dashboard.get(&format!("/orders/{ORDER_ID}/cancel")).await;
    assert_eq!(confirm.status(), StatusCode::OK);

    // "Other" with a blank note is refused.
    let response = dashboard
        .post(
            &format!("/orders/{ORDER_ID}/cancel"),
            &[("reason", "other"), ("other_reason", "  ")],
        )
        .await;
    assert_eq!(location(&response), format!("/orders/{ORDER_ID}/cancel"));
    assert!(dashboard.backend.updates().await.is_empty());

    let response = dashboard
        .post(
            &format!("/orders/{ORDER_ID}/cancel"),
            &[("reason", "customer_request")],
        )
        .await;
    assert_eq!(location(&response), format!("/orders/{ORDER_ID}"));

    let updates = dashboard.backend.updates().await;
    assert_eq!(
        updates[0].body,
        json!({"shippingStatus": "cancelled", "cancelReason": "customer_request"})
    );
}

#[tokio::test]
async fn test_return_decision() {
    let dashboard = Dashboard::start("delivered", "completed", "requested").await;
    dashboard.login(ADMIN_EMAIL).await;

    dashboard
        .post(
            &format!("/orders/{ORDER_ID}/transition"),
            &[("kind", "return"), ("target", "rejected")],
        )
        .await;

    let updates = dashboard.backend.updates().await;
    assert_eq!(updates[0].body, json!({"returnStatus": "rejected"}));
    let stored = dashboard.backend.order(ORDER_ID).await.expect("stored order");
    assert_eq!(stored["shippingStatus"], "delivered");
}

#[tokio::test]
async fn test_expired_session_sends_admin_to_login() {
    let dashboard = Dashboard::start("pending", "pending", "none").await;
    dashboard.login(ADMIN_EMAIL).await;

    dashboard.backend.expire_token().await;
    dashboard.backend.fail_refresh();
    let response = dashboard.get("/orders").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login");
    assert_eq!(dashboard.backend.refresh_calls(), 1);

    let login_page = dashboard.get("/auth/login").await;
    assert_eq!(login_page.status(), StatusCode::OK);
    let body = login_page.text().await.expect("login body");
    assert!(body.contains("Phiên đăng nhập đã hết hạn"));

    // The session no longer holds a token, so nothing reaches the backend.
    let response = dashboard.get("/orders").await;
    assert_eq!(location(&response), "/auth/login");
    assert_eq!(dashboard.backend.refresh_calls(), 1);
}

#[tokio::test]
async fn test_backend_failure_keeps_order_and_shows_message() {
    let dashboard = Dashboard::start("pending", "pending", "none").await;
    dashboard.login(ADMIN_EMAIL).await;
    dashboard
        .backend
        .fail_updates(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"message": "Không thể cập nhật đơn hàng lúc này"}),
        )
        .await;

    let response = dashboard
        .post(
            &format!("/orders/{ORDER_ID}/transition"),
            &[("kind", "shipping"), ("target", "in_transit")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/orders/{ORDER_ID}"));

    let detail = dashboard.get(&format!("/orders/{ORDER_ID}")).await;
    assert_eq!(detail.status(), StatusCode::OK);
    let body = detail.text().await.expect("detail body");
    assert!(body.contains("Không thể cập nhật đơn hàng lúc này"));

    let stored = dashboard.backend.order(ORDER_ID).await.expect("stored order");
    assert_eq!(stored["shippingStatus"], "pending");
    assert!(dashboard.backend.updates().await.is_empty());
    assert_eq!(dashboard.backend.refresh_calls(), 0);
}
