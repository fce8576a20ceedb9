//! Application wiring.
//!
//! [`App`] owns the shared pieces (configuration, session, navigation
//! history and the API client) and hands out views bound to them.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::router::{History, Navigator, Route, resolve_path};
use crate::session::{FileSessionStore, SessionContext, SessionError, SessionState, SessionStore};
use crate::views::{LoginView, RegisterView, TodoView};

/// Errors raised while starting the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// The running client.
#[derive(Debug, Clone)]
pub struct App {
    config: Arc<ClientConfig>,
    client: ApiClient,
    history: Arc<History>,
}

impl App {
    /// Build the client with the token persisted in `config.session_file`.
    #[must_use]
    pub fn from_config(config: ClientConfig) -> Self {
        let store = FileSessionStore::new(config.session_file.clone());
        Self::with_store(config, store)
    }

    /// Build the client over an arbitrary session store.
    #[must_use]
    pub fn with_store(config: ClientConfig, store: impl SessionStore + 'static) -> Self {
        let session = SessionContext::new(store);
        let history = Arc::new(History::default());
        let client = ApiClient::new(
            config.api_url.clone(),
            session,
            Arc::clone(&history) as Arc<dyn Navigator>,
        );

        Self {
            config: Arc::new(config),
            client,
            history,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        self.client.session()
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The route currently shown.
    #[must_use]
    pub fn current_route(&self) -> Route {
        self.history.current()
    }

    /// Settle the session from storage and open `/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored session cannot be read.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<Route, AppError> {
        let state = self.session().initialize().await?;
        info!(%state, api_url = %self.config.api_url, "Client started");
        Ok(self.open(Route::Root.path()).await)
    }

    /// Navigate to `path` after applying the authentication guards.
    ///
    /// Returns the route actually shown.
    pub async fn open(&self, path: &str) -> Route {
        let state = self.session().state().await;
        let route = resolve_path(path, state);
        self.history.navigate(route);
        route
    }

    /// Current session state.
    pub async fn session_state(&self) -> SessionState {
        self.session().state().await
    }

    #[must_use]
    pub fn login_view(&self) -> LoginView {
        LoginView::new(self.client.clone())
    }

    #[must_use]
    pub fn register_view(&self) -> RegisterView {
        RegisterView::new(self.client.clone(), self.config.redirect_delay)
    }

    #[must_use]
    pub fn todo_view(&self) -> TodoView {
        TodoView::new(self.client.clone())
    }
}
