//! Integration tests for the Seller Console client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p seller-console-integration-tests
//! ```
//!
//! Every test starts its own [`FakeApi`] on an ephemeral local port, so
//! tests run in parallel without shared state and need no external services.
//!
//! # Fake API behavior
//!
//! - `POST /api/auth/login` answers `401` for the password `wrong`, omits the
//!   token for emails starting with `notoken`, and otherwise mints a fresh
//!   token `tok-<email>-<n>` with a user object.
//! - `GET /api/orders/missing` answers `404`.
//! - `GET /api/fail/{code}` answers with that status; `429` carries
//!   `Retry-After: 7`.
//! - `POST /api/password/change` answers `400` when `old_password` is
//!   `wrong`.
//! - Catalog, analytics, profile and account-link routes answer with fixed
//!   payloads.
//! - Every request's method, path, query, `Authorization` header and raw
//!   body are recorded.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::body::{Body, Bytes};
use axum::extract::{Path, Request, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use parking_lot::Mutex;
use seller_console_client::{
    AccountStore, ApiClient, ClientConfig, KeyValueStore, MemoryStore, NoReload, SessionManager,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// One request as the fake server saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: Bytes,
}

impl SeenRequest {
    /// The body parsed as JSON, if it is JSON.
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// The body as text, lossily decoded.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Whether the request was sent as `multipart/form-data`.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("multipart/form-data"))
    }
}

#[derive(Debug, Default)]
struct FakeState {
    seen: Mutex<Vec<SeenRequest>>,
    logins: AtomicUsize,
    dashboard_hits: AtomicUsize,
}

/// A marketplace API double bound to `127.0.0.1` on an ephemeral port.
///
/// The server task is aborted on drop.
pub struct FakeApi {
    base_url: Url,
    state: Arc<FakeState>,
    task: JoinHandle<()>,
}

impl FakeApi {
    /// Bind and start serving.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    #[allow(clippy::expect_used)]
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/auth/refresh", post(refresh))
            .route("/api/account/links", get(linked_accounts))
            .route("/api/account/link", post(ok))
            .route("/api/account/switch", post(switch_linked))
            .route("/api/products", post(product_saved))
            .route("/api/products/{id}", put(product_saved))
            .route("/api/products/bulk", post(bulk_update))
            .route("/api/products/import", post(import_products))
            .route("/api/products/categories", get(categories))
            .route("/api/dashboard/sales-chart", get(sales_chart))
            .route("/api/analytics/categories", get(category_analytics))
            .route("/api/password/change", post(change_password))
            .route("/api/orders", get(list_orders))
            .route("/api/orders/{id}", get(get_order))
            .route("/api/orders/{id}/status", put(update_status))
            .route("/api/dashboard/stats", get(dashboard_stats))
            .route("/api/profile", get(profile).put(ok))
            .route("/api/fail/{code}", get(fail))
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind local port");
        let addr = listener.local_addr().expect("local address");
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let base_url = Url::parse(&format!("http://{addr}")).expect("valid local URL");
        Self {
            base_url,
            state,
            task,
        }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Configuration pointing at this server with state under `state_dir`.
    #[must_use]
    pub fn config(&self, state_dir: impl Into<std::path::PathBuf>) -> ClientConfig {
        ClientConfig::new(self.base_url.clone(), state_dir.into())
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn seen(&self) -> Vec<SeenRequest> {
        self.state.seen.lock().clone()
    }

    /// Requests received for `path`.
    #[must_use]
    pub fn seen_at(&self, path: &str) -> Vec<SeenRequest> {
        self.seen().into_iter().filter(|r| r.path == path).collect()
    }

    /// The most recent request, if any.
    #[must_use]
    pub fn last(&self) -> Option<SeenRequest> {
        self.state.seen.lock().last().cloned()
    }

    #[must_use]
    pub fn login_count(&self) -> usize {
        self.state.logins.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn dashboard_hits(&self) -> usize {
        self.state.dashboard_hits.load(Ordering::SeqCst)
    }
}

impl Drop for FakeApi {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A wired client stack sharing one key-value store, the way an application
/// assembles it.
pub struct Harness {
    pub kv: Arc<dyn KeyValueStore>,
    pub api: ApiClient,
    pub session: SessionManager<ApiClient>,
}

impl Harness {
    /// Wire a session and API client over `kv` against `server`, then
    /// initialize the session.
    ///
    /// # Panics
    ///
    /// Panics if the API client cannot be built.
    #[allow(clippy::expect_used)]
    #[must_use]
    pub fn over(server: &FakeApi, kv: Arc<dyn KeyValueStore>) -> Self {
        let config = server.config(std::env::temp_dir());
        let store = AccountStore::new(kv.clone());
        let api = ApiClient::new(&config, Arc::new(store.clone())).expect("client builds");
        let mut session = SessionManager::new(store, api.clone(), Arc::new(NoReload));
        session.initialize();
        Self { kv, api, session }
    }

    /// Same as [`Harness::over`] with a fresh in-memory store.
    #[must_use]
    pub fn in_memory(server: &FakeApi) -> Self {
        Self::over(server, Arc::new(MemoryStore::new()))
    }
}

async fn record(State(state): State<Arc<FakeState>>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let header = |name: HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };

    state.seen.lock().push(SeenRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_owned(),
        query: parts.uri.query().map(str::to_owned),
        content_type: header(CONTENT_TYPE),
        authorization: header(AUTHORIZATION),
        body: body.clone(),
    });
    next.run(Request::from_parts(parts, Body::from(body))).await
}

async fn ok() -> Json<Value> {
    Json(json!({"success": true}))
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(State(state): State<Arc<FakeState>>, Json(body): Json<LoginBody>) -> Response {
    if body.password == "wrong" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid credentials"})),
        )
            .into_response();
    }
    if body.email.starts_with("notoken") {
        return Json(json!({"message": "ok"})).into_response();
    }

    let n = state.logins.fetch_add(1, Ordering::SeqCst) + 1;
    let shop = body.email.split('@').next().unwrap_or_default().to_owned();
    Json(json!({
        "token": format!("tok-{}-{n}", body.email),
        "expires_in": 86_400,
        "user": {
            "id": format!("u-{shop}"),
            "email": body.email,
            "name": shop,
            "shop_name": format!("{shop} shop"),
        }
    }))
    .into_response()
}

async fn register(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "temporary_password": "Temp-1234",
        "user_id": "u-new",
        "message": format!("Registered {}", body.get("email").and_then(Value::as_str).unwrap_or_default()),
    }))
}

fn order_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "order_number": format!("LM-{id}"),
        "date": "2024-05-01T10:00:00Z",
        "status": status,
        "items": [{"name": "Dress", "quantity": 1, "price": 2500.0, "total": 2500.0}],
        "totals": {"total": 2500.0}
    })
}

async fn list_orders() -> Json<Value> {
    Json(json!({
        "orders": [order_json("o-1", "new"), order_json("o-2", "confirmed")],
        "summary": {"total_orders": 2, "total_amount": 5000.0},
        "pagination": {"total": 2, "limit": 20, "offset": 0, "has_next": false, "has_prev": false}
    }))
}

async fn get_order(Path(id): Path<String>) -> Response {
    if id == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Order not found"})),
        )
            .into_response();
    }
    Json(order_json(&id, "new")).into_response()
}

async fn update_status(Path(id): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "success": true,
        "order": {
            "id": id,
            "status": body.get("status").cloned().unwrap_or(Value::Null),
            "updated_date": "2024-05-02T12:00:00Z"
        }
    }))
}

async fn dashboard_stats(State(state): State<Arc<FakeState>>) -> Json<Value> {
    let hits = state.dashboard_hits.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({
        "revenue": {"current": hits * 1000, "trend": "up"},
        "orders": {"current": 12.0},
        "hourly_sales": [{"hour": 9, "revenue": 100.0}, {"hour": 14, "revenue": 400.0}]
    }))
}

async fn profile() -> Json<Value> {
    Json(json!({
        "id": "u-seller",
        "name": "Seller",
        "email": "seller@example.com",
        "balance_kopecks": 150_000
    }))
}

async fn fail(Path(code): Path<u16>) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Json(json!({"error": format!("failure {code}")}))).into_response();
    if status == StatusCode::TOO_MANY_REQUESTS {
        response
            .headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from_static("7"));
    }
    response
}

async fn refresh() -> Json<Value> {
    Json(json!({"token": "tok-refreshed", "expires_in": 3600}))
}

async fn linked_accounts() -> Json<Value> {
    Json(json!([
        {"id": "u-bob", "name": "Bob", "email": "bob@example.com"},
        {"id": "u-carol", "name": "Carol", "email": "carol@example.com", "created_at": "2024-04-01T08:00:00Z"}
    ]))
}

async fn switch_linked(Json(body): Json<Value>) -> Json<Value> {
    let target = body
        .get("target_user_id")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Json(json!({"token": format!("tok-linked-{target}")}))
}

async fn product_saved(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "message": "Product saved",
        "product": {
            "id": "p-1",
            "name": body.get("name").cloned().unwrap_or(Value::Null),
            "sku": body.get("sku").cloned().unwrap_or(Value::Null),
            "price": body.get("price").cloned().unwrap_or(Value::Null),
            "status": "active",
            "description": body.get("description").cloned().unwrap_or(Value::Null),
        }
    }))
}

async fn bulk_update(Json(body): Json<Value>) -> Json<Value> {
    let count = body
        .get("updates")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    Json(json!({"updated": count, "failed": 0, "errors": []}))
}

async fn import_products() -> Json<Value> {
    Json(json!({"created": 3, "updated": 1, "failed": 1, "errors": ["row 5: missing sku"]}))
}

async fn categories() -> Json<Value> {
    Json(json!({
        "categories": [
            {"id": "clothes", "name": "Clothes", "subcategories": [{"id": "dresses", "name": "Dresses"}]},
            {"id": "shoes", "name": "Shoes"}
        ]
    }))
}

async fn sales_chart() -> Json<Value> {
    Json(json!({
        "period": "7d",
        "metric": "revenue",
        "granularity": "day",
        "data": [
            {"date": "2024-05-01", "orders_revenue": 1200.0, "orders_count": 3},
            {"date": "2024-05-02", "orders_revenue": 800.0, "orders_count": 2}
        ]
    }))
}

async fn category_analytics() -> Json<Value> {
    Json(json!({
        "period": "30d",
        "categories": [
            {"id": "dresses", "name": "Dresses", "revenue": 5000.0, "quantity": 20, "revenue_share": 62.5}
        ]
    }))
}

async fn change_password(Json(body): Json<Value>) -> Response {
    if body.get("old_password").and_then(Value::as_str) == Some("wrong") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Old password is incorrect"})),
        )
            .into_response();
    }
    Json(json!({"success": true})).into_response()
}
