//! Client-side routes and navigation.
//!
//! Four views exist: the root redirect, login, registration and the task
//! list. [`resolve`] applies the authentication guards; a [`Navigator`]
//! records where the client currently is.

use std::sync::{Mutex, PoisonError};

use crate::session::SessionState;

/// A client view addressable by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Root,
    /// `/login`
    Login,
    /// `/register`
    Register,
    /// `/todo`
    Todo,
}

impl Route {
    /// Path of the route.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Todo => "/todo",
        }
    }

    /// Match a path, ignoring a trailing slash. Unknown paths yield `None`.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };

        match normalized {
            "/" | "" => Some(Self::Root),
            "/login" => Some(Self::Login),
            "/register" => Some(Self::Register),
            "/todo" => Some(Self::Todo),
            _ => None,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Apply the authentication guards to a requested route.
///
/// - `/` lands on `/todo` when signed in and on `/login` otherwise
/// - `/todo` requires a session
/// - `/login` and `/register` are skipped when already signed in
///
/// `Unknown` is treated like `Unauthenticated`.
#[must_use]
pub const fn resolve(requested: Route, state: SessionState) -> Route {
    let authenticated = state.is_authenticated();
    match requested {
        Route::Root | Route::Login | Route::Register if authenticated => Route::Todo,
        Route::Root | Route::Todo if !authenticated => Route::Login,
        other => other,
    }
}

/// Resolve a raw path. Unknown paths are treated as `/`.
#[must_use]
pub fn resolve_path(path: &str, state: SessionState) -> Route {
    resolve(Route::from_path(path).unwrap_or(Route::Root), state)
}

/// Moves the client between views.
pub trait Navigator: Send + Sync {
    /// Switch to `route`.
    fn navigate(&self, route: Route);

    /// The route currently shown.
    fn current(&self) -> Route;
}

/// In-memory navigation history.
#[derive(Debug)]
pub struct History {
    entries: Mutex<Vec<Route>>,
}

impl History {
    /// A history whose only entry is `start`.
    #[must_use]
    pub fn new(start: Route) -> Self {
        Self {
            entries: Mutex::new(vec![start]),
        }
    }

    /// Every route visited, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<Route> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Root)
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route) {
        tracing::debug!(to = %route, "Navigating");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }

    fn current(&self) -> Route {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
            .unwrap_or(Route::Root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("/"), Some(Route::Root));
        assert_eq!(Route::from_path("/login/"), Some(Route::Login));
        assert_eq!(Route::from_path("/register"), Some(Route::Register));
        assert_eq!(Route::from_path("/todo"), Some(Route::Todo));
        assert_eq!(Route::from_path("/admin"), None);
    }

    #[test]
    fn test_path_round_trips_for_every_route() {
        for route in [Route::Root, Route::Login, Route::Register, Route::Todo] {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }

    #[test]
    fn test_root_redirects_by_session() {
        assert_eq!(resolve(Route::Root, SessionState::Authenticated), Route::Todo);
        assert_eq!(resolve(Route::Root, SessionState::Unauthenticated), Route::Login);
        assert_eq!(resolve(Route::Root, SessionState::Unknown), Route::Login);
    }

    #[test]
    fn test_todo_requires_session() {
        assert_eq!(resolve(Route::Todo, SessionState::Unauthenticated), Route::Login);
        assert_eq!(resolve(Route::Todo, SessionState::Authenticated), Route::Todo);
    }

    #[test]
    fn test_auth_pages_skipped_when_signed_in() {
        assert_eq!(resolve(Route::Login, SessionState::Authenticated), Route::Todo);
        assert_eq!(resolve(Route::Register, SessionState::Authenticated), Route::Todo);
        assert_eq!(resolve(Route::Login, SessionState::Unauthenticated), Route::Login);
        assert_eq!(
            resolve(Route::Register, SessionState::Unauthenticated),
            Route::Register
        );
    }

    #[test]
    fn test_unknown_path_behaves_like_root() {
        assert_eq!(
            resolve_path("/nowhere", SessionState::Authenticated),
            Route::Todo
        );
        assert_eq!(
            resolve_path("/nowhere", SessionState::Unauthenticated),
            Route::Login
        );
    }

    #[test]
    fn test_history_tracks_current_route() {
        let history = History::default();
        assert_eq!(history.current(), Route::Root);

        history.navigate(Route::Login);
        history.navigate(Route::Todo);

        assert_eq!(history.current(), Route::Todo);
        assert_eq!(history.entries(), vec![Route::Root, Route::Login, Route::Todo]);
    }
}
