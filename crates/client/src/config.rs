//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `TICKLIST_API_URL` - Backend base URL (default: `http://localhost:3000`)
//! - `TICKLIST_SESSION_FILE` - Where the bearer token is persisted
//!   (default: `$HOME/.config/ticklist/session.json`)
//! - `TICKLIST_REDIRECT_DELAY_MS` - Delay before the registration view
//!   redirects to login (default: 2000)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Backend used when `TICKLIST_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

const DEFAULT_REDIRECT_DELAY_MS: u64 = 2000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid API URL {0}: {1}")]
    InvalidApiUrl(String, String),
}

/// Ticklist client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to
    pub api_url: Url,
    /// JSON file holding the persisted session
    pub session_file: PathBuf,
    /// How long the registration confirmation stays up before redirecting
    pub redirect_delay: Duration,
}

impl ClientConfig {
    /// Configuration for the given backend with default storage and delay.
    #[must_use]
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            session_file: default_session_file(None),
            redirect_delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = parse_api_url(
            &lookup("TICKLIST_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;

        let session_file = lookup("TICKLIST_SESSION_FILE")
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| default_session_file(lookup("HOME")), PathBuf::from);

        let redirect_delay = match lookup("TICKLIST_REDIRECT_DELAY_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("TICKLIST_REDIRECT_DELAY_MS".to_string(), e.to_string())
            })?,
            None => DEFAULT_REDIRECT_DELAY_MS,
        };

        Ok(Self {
            api_url,
            session_file,
            redirect_delay: Duration::from_millis(redirect_delay),
        })
    }

    /// Override the session file.
    #[must_use]
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    /// Override the registration redirect delay.
    #[must_use]
    pub const fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }
}

/// Parse and check a backend base URL.
///
/// Only `http` and `https` are accepted.
///
/// # Errors
///
/// Returns `ConfigError::InvalidApiUrl` if the input is not an absolute
/// http(s) URL.
pub fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidApiUrl(raw.to_string(), e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidApiUrl(
            raw.to_string(),
            format!("unsupported scheme `{other}`"),
        )),
    }
}

fn default_session_file(home: Option<String>) -> PathBuf {
    home.filter(|home| !home.is_empty()).map_or_else(
        || PathBuf::from(".ticklist").join("session.json"),
        |home| {
            PathBuf::from(home)
                .join(".config")
                .join("ticklist")
                .join("session.json")
        },
    )
}
