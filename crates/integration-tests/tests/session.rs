//! Integration tests for the session lifecycle and route guards.
//!
//! Sessions here are persisted through `FileSessionStore`, so each test
//! also checks what survives a restart of the client.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;

use secrecy::SecretString;
use ticklist_client::session::MemorySessionStore;
use ticklist_client::{App, Route, SessionState};
use ticklist_integration_tests::TestBackend;

fn password() -> SecretString {
    SecretString::from("secret".to_owned())
}

/// A fresh client process sharing the session file at `path`.
fn restart(backend: &TestBackend, path: &Path) -> App {
    App::from_config(backend.config().with_session_file(path))
}

// ============================================================================
// Persistence
// ============================================================================

#[tokio::test]
async fn test_login_survives_restart() {
    let backend = TestBackend::start().await;
    backend.seed_user("Ana", "ana@example.com", "secret");
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("ticklist").join("session.json");

    let app = restart(&backend, &path);
    assert_eq!(app.start().await.unwrap(), Route::Login);
    app.login_view()
        .submit("ana@example.com", password())
        .await
        .expect("login should succeed");
    assert!(path.exists());

    let app = restart(&backend, &path);
    assert_eq!(app.session_state().await, SessionState::Unknown);
    assert_eq!(app.start().await.unwrap(), Route::Todo);

    app.client().get_todos().await.expect("token should still be valid");
    assert!(backend.last_request().authorization.is_some());
}

#[tokio::test]
async fn test_logout_survives_restart() {
    let backend = TestBackend::start().await;
    backend.seed_user("Ana", "ana@example.com", "secret");
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("session.json");

    let app = restart(&backend, &path);
    app.start().await.unwrap();
    app.login_view()
        .submit("ana@example.com", password())
        .await
        .unwrap();

    app.todo_view().logout().await.expect("logout should succeed");
    assert_eq!(app.current_route(), Route::Login);
    assert_eq!(app.session_state().await, SessionState::Unauthenticated);

    let app = restart(&backend, &path);
    assert_eq!(app.start().await.unwrap(), Route::Login);
}

#[tokio::test]
async fn test_rejected_token_is_removed_from_disk() {
    let backend = TestBackend::start().await;
    backend.seed_user("Ana", "ana@example.com", "secret");
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("session.json");

    let app = restart(&backend, &path);
    app.start().await.unwrap();
    app.login_view()
        .submit("ana@example.com", password())
        .await
        .unwrap();

    backend.revoke_tokens();
    assert!(app.client().get_todos().await.unwrap_err().is_unauthorized());

    let app = restart(&backend, &path);
    assert_eq!(app.start().await.unwrap(), Route::Login);
}

// ============================================================================
// Guards
// ============================================================================

#[tokio::test]
async fn test_guards_when_signed_out() {
    let backend = TestBackend::start().await;
    let app = backend.app(MemorySessionStore::new());

    assert_eq!(app.start().await.unwrap(), Route::Login);
    assert_eq!(app.open("/todo").await, Route::Login);
    assert_eq!(app.open("/register").await, Route::Register);
    assert_eq!(app.open("/login").await, Route::Login);
    assert_eq!(app.open("/no-such-page").await, Route::Login);

    assert_eq!(
        app.history().entries(),
        vec![
            Route::Root,
            Route::Login,
            Route::Login,
            Route::Register,
            Route::Login,
            Route::Login
        ]
    );
}

#[tokio::test]
async fn test_guards_when_signed_in() {
    let backend = TestBackend::start().await;
    let user_id = backend.seed_user("Ana", "ana@example.com", "secret");
    let app = backend.app(MemorySessionStore::with_token(&backend.issue_token(user_id)));

    assert_eq!(app.start().await.unwrap(), Route::Todo);
    assert_eq!(app.open("/login").await, Route::Todo);
    assert_eq!(app.open("/register/").await, Route::Todo);
    assert_eq!(app.open("/todo").await, Route::Todo);
}

#[tokio::test]
async fn test_start_does_not_contact_backend() {
    let backend = TestBackend::start().await;
    let app = backend.app(MemorySessionStore::with_token("stale-token"));

    // The stored token is trusted until the backend rejects it
    assert_eq!(app.start().await.unwrap(), Route::Todo);
    assert_eq!(backend.request_count(), 0);

    assert!(app.client().get_todos().await.unwrap_err().is_unauthorized());
    assert_eq!(app.current_route(), Route::Login);
}
