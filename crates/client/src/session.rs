//! Session storage and lifecycle.
//!
//! The session is a single optional bearer token kept in a persistent
//! key-value store under [`TOKEN_KEY`]. [`SessionContext`] is the only way the
//! rest of the client touches it: views and the gateway receive a context
//! instead of reading storage directly.
//!
//! # Lifecycle
//!
//! - `Unknown` until [`SessionContext::initialize`] reads storage, then
//!   `Authenticated` or `Unauthenticated` depending on whether a token is there
//! - `Unauthenticated` → `Authenticated` on [`SessionContext::set`] (login)
//! - `Authenticated` → `Unauthenticated` on [`SessionContext::clear`] (logout,
//!   or the gateway seeing a 401)

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use ticklist_core::AccessToken;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Errors raised by a [`SessionStore`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the backing file failed.
    #[error("session storage I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file does not contain a JSON string map.
    #[error("session storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Key-value persistence substrate for client-side state.
pub trait SessionStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Remove a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// Volatile store, used in tests and for one-shot sessions.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a token.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TOKEN_KEY.to_string(), token.to_string());
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object on disk.
///
/// Every operation goes to the file, so separate processes pointed at the
/// same path observe each other's logins and logouts.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<HashMap<String, String>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(HashMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, values: &HashMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let contents = serde_json::to_string_pretty(values)?;
        self.write_private(contents.as_bytes())
            .map_err(|e| self.io_error(e))
    }

    /// Write the file readable by its owner only. New files are created with
    /// mode `0600`; an existing file is narrowed before anything is written.
    fn write_private(&self, contents: &[u8]) -> std::io::Result<()> {
        use std::io::Write;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(contents)?;
        file.sync_all()
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut values = self.load()?;
        if values.remove(key).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}

/// Where the client stands with respect to authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Storage has not been checked yet.
    #[default]
    Unknown,
    /// A bearer token is held.
    Authenticated,
    /// No bearer token is held.
    Unauthenticated,
}

impl SessionState {
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Authenticated => write!(f, "authenticated"),
            Self::Unauthenticated => write!(f, "unauthenticated"),
        }
    }
}

/// Injectable handle on the current session.
///
/// Cheap to clone; clones share the same store and state.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    store: Arc<dyn SessionStore>,
    state: RwLock<SessionState>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext").finish_non_exhaustive()
    }
}

impl SessionContext {
    /// Create a context in the `Unknown` state.
    #[must_use]
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self::from_shared(Arc::new(store))
    }

    /// Create a context over a store that is also held elsewhere.
    #[must_use]
    pub fn from_shared(store: Arc<dyn SessionStore>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                store,
                state: RwLock::new(SessionState::Unknown),
            }),
        }
    }

    /// Check storage for a token and settle the state.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read; the state is left as is.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<SessionState, SessionError> {
        let state = if self.inner.store.get(TOKEN_KEY)?.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        };

        *self.inner.state.write().await = state;
        debug!(%state, "Session initialized");

        Ok(state)
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> SessionState {
        *self.inner.state.read().await
    }

    /// Whether a token is currently held.
    pub async fn is_authenticated(&self) -> bool {
        self.state().await.is_authenticated()
    }

    /// The stored bearer token, if any.
    ///
    /// Always `None` once the session is `Unauthenticated`, whatever storage
    /// still holds.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    pub async fn get(&self) -> Result<Option<AccessToken>, SessionError> {
        if *self.inner.state.read().await == SessionState::Unauthenticated {
            return Ok(None);
        }
        Ok(self.inner.store.get(TOKEN_KEY)?.map(AccessToken::new))
    }

    /// Persist a token received from a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written; the state is unchanged.
    pub async fn set(&self, token: &AccessToken) -> Result<(), SessionError> {
        let mut state = self.inner.state.write().await;
        self.inner.store.set(TOKEN_KEY, token.expose())?;
        *state = SessionState::Authenticated;
        Ok(())
    }

    /// Forget the token (logout or server rejection).
    ///
    /// The state becomes `Unauthenticated` even if storage fails, so a
    /// rejected token is never treated as valid again by this process.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub async fn clear(&self) -> Result<(), SessionError> {
        let mut state = self.inner.state.write().await;
        *state = SessionState::Unauthenticated;
        self.inner.store.remove(TOKEN_KEY)
    }
}
