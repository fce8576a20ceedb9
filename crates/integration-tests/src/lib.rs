//! Integration tests for Ticklist.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ticklist-integration-tests
//! ```
//!
//! No external services are needed. Each test starts a [`TestBackend`]: an
//! in-process axum server on `127.0.0.1:0` that implements the to-do
//! backend's endpoints over in-memory data and records every request it
//! sees, so tests can assert on headers and request counts.
//!
//! # Test Categories
//!
//! - `gateway` - Bearer header, error mapping and the 401 rule
//! - `session` - Session lifecycle, persistence and route guards
//! - `views` - Login, registration and task list flows

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use ticklist_client::session::SessionStore;
use ticklist_client::{App, ClientConfig};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Redirect delay used by [`TestBackend::app`], short enough to wait out.
pub const TEST_REDIRECT_DELAY: Duration = Duration::from_millis(20);

/// Timestamp stamped on every record the backend creates.
const CREATED_AT: &str = "2025-01-10T08:30:00Z";

/// A canned failure returned for every request while set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// `401` regardless of the token.
    Unauthorized,
    /// `500 Internal Server Error`.
    ServerError,
    /// `200` with a body that is not JSON.
    MalformedJson,
}

impl IntoResponse for Fault {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => unauthorized(),
            Self::ServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Internal server error" })),
            )
                .into_response(),
            Self::MalformedJson => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                "{\"id\": 1, \"title\": ",
            )
                .into_response(),
        }
    }
}

/// A request as the backend received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub headers: HeaderMap,
}

#[derive(Debug, Clone)]
struct StoredUser {
    id: i64,
    name: String,
    email: String,
    password: String,
}

impl StoredUser {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "email": self.email,
            "createdAt": CREATED_AT,
        })
    }
}

#[derive(Debug, Clone)]
struct StoredTask {
    id: i64,
    owner_id: i64,
    title: String,
    completed: bool,
}

impl StoredTask {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "completed": self.completed,
            "ownerId": self.owner_id,
            "createdAt": CREATED_AT,
        })
    }
}

#[derive(Debug, Default)]
struct Data {
    users: Vec<StoredUser>,
    tasks: Vec<StoredTask>,
    tokens: HashMap<String, i64>,
    next_id: i64,
    requests: Vec<RecordedRequest>,
    fault: Option<Fault>,
}

impl Data {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Default)]
struct BackendState {
    data: Mutex<Data>,
}

impl BackendState {
    fn lock(&self) -> MutexGuard<'_, Data> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve the bearer token in `headers` to a user ID.
    fn authorize(&self, headers: &HeaderMap) -> Result<i64, Response> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(unauthorized)?;

        self.lock().tokens.get(token).copied().ok_or_else(unauthorized)
    }
}

/// In-process fake of the to-do backend.
///
/// The server task is aborted when the value is dropped.
pub struct TestBackend {
    addr: SocketAddr,
    state: Arc<BackendState>,
    server: JoinHandle<()>,
}

impl TestBackend {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("Failed to bind test backend: {e}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("Failed to read test backend address: {e}"));

        let router = routes(Arc::clone(&state));
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL of the backend.
    ///
    /// # Panics
    ///
    /// Panics if the bound address does not form a URL, which cannot happen
    /// for a socket address.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr))
            .unwrap_or_else(|e| panic!("Invalid backend URL: {e}"))
    }

    /// Client configuration pointed at this backend.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.url()).with_redirect_delay(TEST_REDIRECT_DELAY)
    }

    /// A client app wired to this backend over `store`.
    #[must_use]
    pub fn app(&self, store: impl SessionStore + 'static) -> App {
        App::with_store(self.config(), store)
    }

    /// Create an account directly, bypassing the API. Returns its ID.
    pub fn seed_user(&self, name: &str, email: &str, password: &str) -> i64 {
        let mut data = self.state.lock();
        let id = data.next_id();
        data.users.push(StoredUser {
            id,
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        });
        id
    }

    /// Issue a valid token for `user_id`.
    pub fn issue_token(&self, user_id: i64) -> String {
        let mut data = self.state.lock();
        let token = format!("token-{user_id}-{}", data.tokens.len() + 1);
        data.tokens.insert(token.clone(), user_id);
        token
    }

    /// Invalidate every token, as if the server restarted with a new key.
    pub fn revoke_tokens(&self) {
        self.state.lock().tokens.clear();
    }

    /// Create a task directly. Returns its ID.
    pub fn seed_task(&self, owner_id: i64, title: &str, completed: bool) -> i64 {
        let mut data = self.state.lock();
        let id = data.next_id();
        data.tasks.push(StoredTask {
            id,
            owner_id,
            title: title.to_owned(),
            completed,
        });
        id
    }

    /// Titles and completion flags of `owner_id`'s tasks, in creation order.
    #[must_use]
    pub fn tasks_of(&self, owner_id: i64) -> Vec<(String, bool)> {
        self.state
            .lock()
            .tasks
            .iter()
            .filter(|task| task.owner_id == owner_id)
            .map(|task| (task.title.clone(), task.completed))
            .collect()
    }

    /// Make every request fail with `fault` until cleared with `None`.
    pub fn set_fault(&self, fault: Option<Fault>) {
        self.state.lock().fault = fault;
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.state.lock().requests.len()
    }

    /// The most recent request.
    ///
    /// # Panics
    ///
    /// Panics if nothing has been received yet.
    #[must_use]
    pub fn last_request(&self) -> RecordedRequest {
        self.state
            .lock()
            .requests
            .last()
            .cloned()
            .unwrap_or_else(|| panic!("Test backend has not received any request"))
    }
}

impl Drop for TestBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// A URL on which nothing is listening.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn closed_port_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|e| panic!("Failed to bind probe listener: {e}"));
    let addr = listener
        .local_addr()
        .unwrap_or_else(|e| panic!("Failed to read probe address: {e}"));
    drop(listener);

    Url::parse(&format!("http://{addr}")).unwrap_or_else(|e| panic!("Invalid probe URL: {e}"))
}

fn routes(state: Arc<BackendState>) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/profile", get(profile))
        .route("/todos/{id}", patch(update_todo).delete(delete_todo))
        .layer(middleware::from_fn_with_state(Arc::clone(&state), record))
        .with_state(state)
}

/// Record the request, then either inject the configured fault or pass it on.
async fn record(State(state): State<Arc<BackendState>>, request: Request, next: Next) -> Response {
    let headers = request.headers();
    let recorded = RecordedRequest {
        method: request.method().clone(),
        path: request.uri().path().to_owned(),
        authorization: header_str(headers, &header::AUTHORIZATION),
        content_type: header_str(headers, &header::CONTENT_TYPE),
        headers: headers.clone(),
    };

    let fault = {
        let mut data = state.lock();
        data.requests.push(recorded);
        data.fault
    };

    match fault {
        Some(fault) => fault.into_response(),
        None => next.run(request).await,
    }
}

fn header_str(headers: &HeaderMap, name: &header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthorized", "statusCode": 401 })),
    )
        .into_response()
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(State(state): State<Arc<BackendState>>, Json(body): Json<LoginBody>) -> Response {
    let mut data = state.lock();
    let Some(user_id) = data
        .users
        .iter()
        .find(|user| user.email == body.email && user.password == body.password)
        .map(|user| user.id)
    else {
        return unauthorized();
    };

    let token = format!("token-{user_id}-{}", data.tokens.len() + 1);
    data.tokens.insert(token.clone(), user_id);
    Json(json!({ "access_token": token })).into_response()
}

#[derive(Deserialize)]
struct RegisterBody {
    name: String,
    email: String,
    password: String,
}

async fn register(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<RegisterBody>,
) -> Response {
    let mut data = state.lock();
    if data.users.iter().any(|user| user.email == body.email) {
        return error(StatusCode::CONFLICT, "Email already registered");
    }

    let user = StoredUser {
        id: data.next_id(),
        name: body.name,
        email: body.email,
        password: body.password,
    };
    let json = user.to_json();
    data.users.push(user);

    (StatusCode::CREATED, Json(json)).into_response()
}

async fn list_todos(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    let user_id = match state.authorize(&headers) {
        Ok(id) => id,
        Err(rejection) => return rejection,
    };

    let tasks: Vec<Value> = state
        .lock()
        .tasks
        .iter()
        .filter(|task| task.owner_id == user_id)
        .map(StoredTask::to_json)
        .collect();
    Json(tasks).into_response()
}

#[derive(Deserialize)]
struct CreateBody {
    title: String,
}

async fn create_todo(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<CreateBody>,
) -> Response {
    let user_id = match state.authorize(&headers) {
        Ok(id) => id,
        Err(rejection) => return rejection,
    };
    if body.title.trim().is_empty() {
        return error(StatusCode::BAD_REQUEST, "title should not be empty");
    }

    let mut data = state.lock();
    let task = StoredTask {
        id: data.next_id(),
        owner_id: user_id,
        title: body.title,
        completed: false,
    };
    let json = task.to_json();
    data.tasks.push(task);

    (StatusCode::CREATED, Json(json)).into_response()
}

#[derive(Deserialize)]
struct UpdateBody {
    title: Option<String>,
    completed: Option<bool>,
}

async fn update_todo(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<UpdateBody>,
) -> Response {
    let user_id = match state.authorize(&headers) {
        Ok(id) => id,
        Err(rejection) => return rejection,
    };

    let mut data = state.lock();
    let Some(task) = data
        .tasks
        .iter_mut()
        .find(|task| task.id == id && task.owner_id == user_id)
    else {
        return error(StatusCode::NOT_FOUND, "Task not found");
    };

    if let Some(title) = body.title {
        task.title = title;
    }
    if let Some(completed) = body.completed {
        task.completed = completed;
    }
    Json(task.to_json()).into_response()
}

async fn delete_todo(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let user_id = match state.authorize(&headers) {
        Ok(id) => id,
        Err(rejection) => return rejection,
    };

    let mut data = state.lock();
    let before = data.tasks.len();
    data.tasks
        .retain(|task| !(task.id == id && task.owner_id == user_id));

    if data.tasks.len() == before {
        return error(StatusCode::NOT_FOUND, "Task not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn profile(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    let user_id = match state.authorize(&headers) {
        Ok(id) => id,
        Err(rejection) => return rejection,
    };

    state
        .lock()
        .users
        .iter()
        .find(|user| user.id == user_id)
        .map_or_else(
            || error(StatusCode::NOT_FOUND, "User not found"),
            |user| Json(user.to_json()).into_response(),
        )
}
