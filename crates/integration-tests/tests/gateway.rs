//! Integration tests for the API gateway client.
//!
//! Covers the bearer header, response decoding, error mapping and the
//! session-ending `401` rule against the in-process backend.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use secrecy::SecretString;
use serde_json::Value;
use ticklist_client::api::paths;
use ticklist_client::session::{MemorySessionStore, SessionError, SessionStore};
use ticklist_client::{ApiError, App, ClientConfig, RequestOptions, Route, SessionState};
use ticklist_core::{Credentials, TaskId};
use ticklist_integration_tests::{Fault, TestBackend, closed_port_url};

/// An app that is signed in as a freshly seeded user.
async fn signed_in(backend: &TestBackend) -> (App, i64, String) {
    let user_id = backend.seed_user("Ana", "ana@example.com", "secret");
    let token = backend.issue_token(user_id);
    let app = backend.app(MemorySessionStore::with_token(&token));
    assert_eq!(app.start().await.unwrap(), Route::Todo);
    (app, user_id, token)
}

// ============================================================================
// Headers
// ============================================================================

#[tokio::test]
async fn test_bearer_header_sent_when_signed_in() {
    let backend = TestBackend::start().await;
    let (app, _, token) = signed_in(&backend).await;

    app.client().get_todos().await.expect("list should succeed");

    let request = backend.last_request();
    assert_eq!(request.path, "/todos");
    assert_eq!(request.authorization, Some(format!("Bearer {token}")));
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_no_authorization_header_without_session() {
    let backend = TestBackend::start().await;
    backend.seed_user("Ana", "ana@example.com", "secret");
    let app = backend.app(MemorySessionStore::new());
    app.start().await.unwrap();

    let password = SecretString::from("secret".to_owned());
    let credentials = Credentials::new("ana@example.com", password).unwrap();
    app.client().login(&credentials).await.expect("login should succeed");

    let request = backend.last_request();
    assert_eq!(request.path, paths::LOGIN);
    assert!(request.authorization.is_none());
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_caller_headers_reach_backend_but_cannot_forge_token() {
    let backend = TestBackend::start().await;
    let (app, _, token) = signed_in(&backend).await;

    let options = RequestOptions::new()
        .header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("req-42"),
        )
        .header(AUTHORIZATION, HeaderValue::from_static("Bearer forged"));

    app.client()
        .request(reqwest::Method::GET, paths::TODOS, options)
        .await
        .expect("request should succeed");

    let request = backend.last_request();
    assert_eq!(request.headers.get("x-request-id").unwrap(), "req-42");
    assert_eq!(request.authorization, Some(format!("Bearer {token}")));
}

// ============================================================================
// Decoding & Errors
// ============================================================================

#[tokio::test]
async fn test_no_content_decodes_as_null() {
    let backend = TestBackend::start().await;
    let (app, user_id, _) = signed_in(&backend).await;
    let task_id = backend.seed_task(user_id, "Buy milk", false);

    let value = app
        .client()
        .delete(&paths::todo(TaskId::new(task_id)))
        .await
        .expect("delete should succeed");

    assert_eq!(value, Value::Null);
    assert!(backend.tasks_of(user_id).is_empty());
}

#[tokio::test]
async fn test_server_error_maps_to_http_error() {
    let backend = TestBackend::start().await;
    let (app, _, _) = signed_in(&backend).await;
    backend.set_fault(Some(Fault::ServerError));

    let err = app.client().get_todos().await.unwrap_err();

    match err {
        ApiError::Http {
            status,
            status_text,
        } => {
            assert_eq!(status, 500);
            assert_eq!(status_text, "Internal Server Error");
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
    // Only 401 ends the session
    assert_eq!(app.session_state().await, SessionState::Authenticated);
    assert_eq!(app.current_route(), Route::Todo);
}

#[tokio::test]
async fn test_missing_task_maps_to_not_found() {
    let backend = TestBackend::start().await;
    let (app, _, _) = signed_in(&backend).await;

    let err = app.client().delete_todo(TaskId::new(999)).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_malformed_body_maps_to_decode_error() {
    let backend = TestBackend::start().await;
    let (app, _, _) = signed_in(&backend).await;
    backend.set_fault(Some(Fault::MalformedJson));

    let err = app.client().get_todos().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn test_profile_decodes_camel_case_user() {
    let backend = TestBackend::start().await;
    let (app, user_id, _) = signed_in(&backend).await;

    let user = app.client().get_profile().await.expect("profile should load");

    assert_eq!(user.id.as_i64(), user_id);
    assert_eq!(user.email.as_str(), "ana@example.com");
    assert!(user.created_at.is_some());
}

#[tokio::test]
async fn test_unreachable_backend_maps_to_network_error() {
    let url = closed_port_url().await;
    let app = App::with_store(
        ClientConfig::new(url),
        MemorySessionStore::with_token("abc123"),
    );
    app.start().await.unwrap();

    let err = app.client().get_todos().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
    assert_eq!(app.session_state().await, SessionState::Authenticated);
}

// ============================================================================
// 401 Handling
// ============================================================================

#[tokio::test]
async fn test_rejected_token_ends_session_and_redirects() {
    let backend = TestBackend::start().await;
    let (app, _, _) = signed_in(&backend).await;
    backend.revoke_tokens();

    let err = app.client().get_todos().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(app.session_state().await, SessionState::Unauthenticated);
    assert!(app.session().get().await.unwrap().is_none());
    assert_eq!(app.current_route(), Route::Login);
}

#[tokio::test]
async fn test_requests_after_rejection_carry_no_token() {
    let backend = TestBackend::start().await;
    let (app, _, _) = signed_in(&backend).await;
    backend.set_fault(Some(Fault::Unauthorized));

    app.client().get_profile().await.unwrap_err();
    backend.set_fault(None);

    let _ = app.client().get_todos().await;
    assert!(backend.last_request().authorization.is_none());
}

/// Store that can be read but never written, like a session file on a
/// read-only mount.
struct ReadOnlyStore(MemorySessionStore);

impl SessionStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        self.0.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), SessionError> {
        Err(read_only_error())
    }

    fn remove(&self, _key: &str) -> Result<(), SessionError> {
        Err(read_only_error())
    }
}

fn read_only_error() -> SessionError {
    SessionError::Io {
        path: "session.json".into(),
        source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
    }
}

#[tokio::test]
async fn test_rejected_token_not_resent_when_storage_is_read_only() {
    let backend = TestBackend::start().await;
    let user_id = backend.seed_user("Ana", "ana@example.com", "secret");
    let token = backend.issue_token(user_id);
    let app = backend.app(ReadOnlyStore(MemorySessionStore::with_token(&token)));
    assert_eq!(app.start().await.unwrap(), Route::Todo);
    backend.revoke_tokens();

    let err = app.client().get_todos().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(app.session_state().await, SessionState::Unauthenticated);
    assert_eq!(app.current_route(), Route::Login);

    let _ = app.client().get_todos().await;
    assert!(backend.last_request().authorization.is_none());
}
