//! Integration tests for Zeal.
//!
//! Tests run against [`MockBackend`], an in-process stand-in for the Zeal
//! REST API bound to `127.0.0.1:0`. No network access or running servers
//! are needed:
//!
//! ```bash
//! cargo test -p zeal-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `api_client` - bearer auth, refresh-once and credential clearing
//! - `order_workflow` - payloads sent for each status change
//! - `admin_orders` - admin dashboard order pages driven over HTTP

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Value, json};
use tokio::sync::Mutex;

/// Password every mock account accepts.
pub const PASSWORD: &str = "matkhau123";
pub const ADMIN_EMAIL: &str = "admin@zeal.vn";
pub const CUSTOMER_EMAIL: &str = "khach@zeal.vn";
pub const CUSTOMER_ID: &str = "665000000000000000000c01";

/// Token issued at login.
pub const FIRST_TOKEN: &str = "token-1";
/// Token issued by a successful refresh.
pub const REFRESHED_TOKEN: &str = "token-2";

/// One recorded `PUT /api/orders/update/{id}`.
#[derive(Debug, Clone)]
pub struct RecordedUpdate {
    pub order_id: String,
    pub body: Value,
}

#[derive(Default)]
struct MockState {
    orders: Mutex<Vec<Value>>,
    updates: Mutex<Vec<RecordedUpdate>>,
    valid_token: Mutex<String>,
    refresh_calls: AtomicUsize,
    refresh_fails: AtomicBool,
    forbid: AtomicBool,
    update_failure: Mutex<Option<(StatusCode, Value)>>,
}

/// In-process Zeal backend.
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockBackend {
    /// Start the backend with `orders` as its documents.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(orders: Vec<Value>) -> Self {
        let state = Arc::new(MockState {
            orders: Mutex::new(orders),
            valid_token: Mutex::new(FIRST_TOKEN.to_owned()),
            ..MockState::default()
        });

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/refresh", post(refresh))
            .route("/api/orders", get(list_orders))
            .route("/api/orders/user", get(my_orders))
            .route("/api/orders/{id}", get(get_order))
            .route("/api/orders/update/{id}", put(update_order))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend");
        });

        Self { addr, state }
    }

    /// Base URL to hand to the client.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Invalidate the current token, as an expiry would.
    pub async fn expire_token(&self) {
        *self.state.valid_token.lock().await = "expired".to_owned();
    }

    /// Make every refresh attempt fail.
    pub fn fail_refresh(&self) {
        self.state.refresh_fails.store(true, Ordering::SeqCst);
    }

    /// Answer every authenticated call with 403.
    pub fn forbid(&self) {
        self.state.forbid.store(true, Ordering::SeqCst);
    }

    /// Answer every order update with `status` and `body`, leaving the
    /// stored order untouched.
    pub async fn fail_updates(&self, status: StatusCode, body: Value) {
        *self.state.update_failure.lock().await = Some((status, body));
    }

    #[must_use]
    pub fn refresh_calls(&self) -> usize {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }

    /// Updates received so far, oldest first.
    pub async fn updates(&self) -> Vec<RecordedUpdate> {
        self.state.updates.lock().await.clone()
    }

    /// Current stored document for `id`.
    pub async fn order(&self, id: &str) -> Option<Value> {
        self.state
            .orders
            .lock()
            .await
            .iter()
            .find(|o| o["_id"] == id)
            .cloned()
    }
}

/// Order document as the backend returns it.
#[must_use]
pub fn order_doc(id: &str, shipping: &str, payment: &str, return_status: &str) -> Value {
    json!({
        "_id": id,
        "user": {"_id": CUSTOMER_ID, "username": "khachhang", "email": CUSTOMER_EMAIL},
        "fullName": "Nguyễn Văn A",
        "phone": "0901234567",
        "address": "12 Lê Lợi, Quận 1, TP.HCM",
        "paymentMethod": "COD",
        "items": [
            {"product": {"_id": "665000000000000000000p01", "name": "Áo khoác gió"}, "name": "Áo khoác gió", "quantity": 1, "price": 450000},
            {"product": "665000000000000000000p02", "name": "Mũ lưỡi trai", "quantity": 2, "price": 120000}
        ],
        "totalPrice": 690000,
        "shippingStatus": shipping,
        "paymentStatus": payment,
        "returnStatus": return_status,
        "createdAt": "2026-05-01T03:00:00Z"
    })
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"message": message}))).into_response()
}

/// 401/403 unless the request carries the current token.
async fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {}", state.valid_token.lock().await);
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if presented != expected {
        return Err(error(StatusCode::UNAUTHORIZED, "Token không hợp lệ"));
    }
    if state.forbid.load(Ordering::SeqCst) {
        return Err(error(StatusCode::FORBIDDEN, "Không có quyền"));
    }
    Ok(())
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    if body["password"] != PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "Sai email hoặc mật khẩu");
    }
    let (id, role) = if email == ADMIN_EMAIL {
        ("665000000000000000000a01", "admin")
    } else {
        (CUSTOMER_ID, "user")
    };
    let token = state.valid_token.lock().await.clone();
    Json(json!({
        "message": "Đăng nhập thành công",
        "token": token,
        "refreshToken": "refresh-1",
        "user": {"_id": id, "email": email, "role": role}
    }))
    .into_response()
}

async fn refresh(State(state): State<Arc<MockState>>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    if state.refresh_fails.load(Ordering::SeqCst) {
        return error(StatusCode::UNAUTHORIZED, "Phiên đăng nhập đã hết hạn");
    }
    REFRESHED_TOKEN.clone_into(&mut *state.valid_token.lock().await);
    Json(json!({"accessToken": REFRESHED_TOKEN})).into_response()
}

async fn list_orders(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let orders = state.orders.lock().await.clone();
    Json(json!({"data": orders})).into_response()
}

async fn my_orders(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let mine: Vec<Value> = state
        .orders
        .lock()
        .await
        .iter()
        .filter(|o| o["user"]["_id"] == CUSTOMER_ID)
        .cloned()
        .collect();
    Json(json!(mine)).into_response()
}

async fn get_order(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let orders = state.orders.lock().await;
    match orders.iter().find(|o| o["_id"] == id.as_str()) {
        Some(order) => Json(json!({"data": order})).into_response(),
        None => error(StatusCode::NOT_FOUND, "Không tìm thấy đơn hàng"),
    }
}

async fn update_order(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    if let Some((status, failure)) = state.update_failure.lock().await.clone() {
        return (status, Json(failure)).into_response();
    }
    let mut orders = state.orders.lock().await;
    let Some(order) = orders.iter_mut().find(|o| o["_id"] == id.as_str()) else {
        return error(StatusCode::NOT_FOUND, "Không tìm thấy đơn hàng");
    };
    if let (Value::Object(doc), Value::Object(changes)) = (&mut *order, &body) {
        for (key, value) in changes {
            doc.insert(key.clone(), value.clone());
        }
    }
    let updated = order.clone();
    drop(orders);

    state.updates.lock().await.push(RecordedUpdate {
        order_id: id,
        body,
    });
    Json(json!({"message": "Cập nhật đơn hàng thành công", "order": updated})).into_response()
}
