//! Integration tests for Blue Flame ordering.
//!
//! Tests run the engine over real HTTP against [`FakeServer`], an in-process
//! `axum` stand-in for the ordering backend bound to `127.0.0.1:0`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p blue-flame-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `menu_loading` - Fetch, seed-if-empty, refetch
//! - `checkout` - Order submission, rejection and transport failures

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use blue_flame_ordering::{HttpBackend, OrderSession, OrderingConfig};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Boxed error for test helpers.
pub type TestError = Box<dyn std::error::Error + Send + Sync>;

/// How the fake backend behaves.
#[derive(Debug, Clone)]
pub struct Script {
    menu: Value,
    seeded_menu: Option<Value>,
    menu_failure: Option<StatusCode>,
    seed_failure: Option<StatusCode>,
    seed_despite_failure: bool,
    order_status: StatusCode,
    order_body: String,
}

impl Script {
    /// Serve `menu` (a JSON array) from the start.
    #[must_use]
    pub fn with_menu(menu: Value) -> Self {
        Self {
            menu,
            seeded_menu: None,
            menu_failure: None,
            seed_failure: None,
            seed_despite_failure: false,
            order_status: StatusCode::OK,
            order_body: json!({ "total": "0.00" }).to_string(),
        }
    }

    /// Serve an empty catalog until seeded, then `menu`.
    #[must_use]
    pub fn empty_until_seeded(menu: Value) -> Self {
        Self {
            seeded_menu: Some(menu),
            ..Self::with_menu(json!([]))
        }
    }

    #[must_use]
    pub const fn fail_menu(mut self, status: StatusCode) -> Self {
        self.menu_failure = Some(status);
        self
    }

    /// Answer the seed request with `status` and leave the catalog alone.
    #[must_use]
    pub const fn fail_seed(mut self, status: StatusCode) -> Self {
        self.seed_failure = Some(status);
        self
    }

    /// Populate the catalog but answer the seed request with `409 Conflict`,
    /// as a backend seeded by another client does.
    #[must_use]
    pub const fn seed_conflict(mut self) -> Self {
        self.seed_failure = Some(StatusCode::CONFLICT);
        self.seed_despite_failure = true;
        self
    }

    /// Answer every order with `status` and a JSON `body`.
    #[must_use]
    pub fn order_reply(self, status: StatusCode, body: &Value) -> Self {
        self.order_reply_raw(status, &body.to_string())
    }

    /// Answer every order with `status` and an arbitrary body.
    #[must_use]
    pub fn order_reply_raw(mut self, status: StatusCode, body: &str) -> Self {
        self.order_status = status;
        body.clone_into(&mut self.order_body);
        self
    }
}

/// An order as the backend received it.
#[derive(Debug, Clone)]
pub struct RecordedOrder {
    pub body: Value,
    pub request_id: Option<String>,
}

struct ServerState {
    script: Mutex<Script>,
    fetches: AtomicUsize,
    seeds: AtomicUsize,
    orders: Mutex<Vec<RecordedOrder>>,
}

impl ServerState {
    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn orders(&self) -> MutexGuard<'_, Vec<RecordedOrder>> {
        self.orders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-process ordering backend. Shut down on drop.
pub struct FakeServer {
    base_url: String,
    state: Arc<ServerState>,
    handle: JoinHandle<()>,
}

impl FakeServer {
    /// Bind to a random local port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start(script: Script) -> Result<Self, TestError> {
        let state = Arc::new(ServerState {
            script: Mutex::new(script),
            fetches: AtomicUsize::new(0),
            seeds: AtomicUsize::new(0),
            orders: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/menu", get(menu_handler))
            .route("/api/menu/seed", post(seed_handler))
            .route("/api/orders", post(order_handler))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url,
            state,
            handle,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of `GET /api/menu` requests served.
    #[must_use]
    pub fn fetches(&self) -> usize {
        self.state.fetches.load(Ordering::SeqCst)
    }

    /// Number of `POST /api/menu/seed` requests served.
    #[must_use]
    pub fn seeds(&self) -> usize {
        self.state.seeds.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn orders(&self) -> Vec<RecordedOrder> {
        self.state.orders().clone()
    }

    /// An HTTP backend client pointed at this server.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn backend(&self) -> Result<HttpBackend, TestError> {
        backend_for(&self.base_url)
    }

    /// A fresh session talking to this server.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn session(&self) -> Result<OrderSession<HttpBackend>, TestError> {
        Ok(OrderSession::new(self.backend()?))
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// An HTTP backend client for `base_url`.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the client cannot be built.
pub fn backend_for(base_url: &str) -> Result<HttpBackend, TestError> {
    let config = OrderingConfig::with_backend_url(base_url)?;
    Ok(HttpBackend::new(&config)?)
}

/// A URL on which nothing is listening.
///
/// # Errors
///
/// Returns an error if no local port can be reserved.
pub async fn unused_url() -> Result<String, TestError> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

/// A backend-shaped menu item.
#[must_use]
pub fn menu_item(id: u64, name: &str, category: &str, price: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("House {name}"),
        "price": price,
        "category": category,
    })
}

// =============================================================================
// Handlers
// =============================================================================

async fn menu_handler(State(state): State<Arc<ServerState>>) -> Response {
    state.fetches.fetch_add(1, Ordering::SeqCst);
    let script = state.script();
    match script.menu_failure {
        Some(status) => (status, Json(json!({ "detail": "menu unavailable" }))).into_response(),
        None => Json(script.menu.clone()).into_response(),
    }
}

async fn seed_handler(State(state): State<Arc<ServerState>>) -> Response {
    state.seeds.fetch_add(1, Ordering::SeqCst);
    let mut script = state.script();
    if script.seed_failure.is_none() || script.seed_despite_failure {
        if let Some(menu) = script.seeded_menu.take() {
            script.menu = menu;
        }
    }
    match script.seed_failure {
        Some(status) => (status, Json(json!({ "detail": "seed refused" }))).into_response(),
        None => Json(json!({ "message": "seeded" })).into_response(),
    }
}

async fn order_handler(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let recorded = RecordedOrder {
        body: serde_json::from_str(&body).unwrap_or(Value::String(body)),
        request_id: headers
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
    };
    state.orders().push(recorded);

    let script = state.script();
    (
        script.order_status,
        [(header::CONTENT_TYPE, "application/json")],
        script.order_body.clone(),
    )
        .into_response()
}
