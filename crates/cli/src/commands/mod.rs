//! Command implementations.
//!
//! Each command builds on a started [`App`]: the session is settled from
//! storage and the guarded route is resolved before anything else runs.

pub mod auth;
pub mod todo;

use std::io::BufRead;
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use ticklist_client::config::parse_api_url;
use ticklist_client::{App, AppError, ClientConfig, ConfigError, Route, ViewError};

/// Environment variable consulted before prompting for a password.
const PASSWORD_ENV: &str = "TICKLIST_PASSWORD";

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("{0}")]
    View(#[from] ViewError),

    /// An action failed; carries the message the view would display.
    #[error("{0}")]
    Failed(String),

    /// The command needs a session and there is none.
    #[error("Not signed in. Run `ticklist login` first.")]
    NotSignedIn,

    /// No password in the environment or on stdin.
    #[error("No password given. Set TICKLIST_PASSWORD or pipe it on stdin.")]
    MissingPassword,

    #[error("Failed to read password: {0}")]
    Input(#[from] std::io::Error),
}

/// Build the app from the environment, then apply command-line overrides.
pub fn build_app(api_url: Option<&str>, session_file: Option<PathBuf>) -> Result<App, CliError> {
    let mut config = ClientConfig::from_env()?;

    if let Some(raw) = api_url {
        config.api_url = parse_api_url(raw)?;
    }
    if let Some(path) = session_file {
        config = config.with_session_file(path);
    }

    tracing::debug!(
        api_url = %config.api_url,
        session_file = %config.session_file.display(),
        "Configuration loaded"
    );

    Ok(App::from_config(config))
}

/// Start the app and require that the guards let it through to `/todo`.
pub async fn require_session(app: &App) -> Result<(), CliError> {
    if app.start().await? == Route::Todo {
        Ok(())
    } else {
        Err(CliError::NotSignedIn)
    }
}

/// Prefer the view's user-facing message over the raw error.
pub fn view_failure(message: Option<&str>, error: ViewError) -> CliError {
    tracing::debug!(error = %error, "View action failed");
    message.map_or(CliError::View(error), |message| {
        CliError::Failed(message.to_owned())
    })
}

/// Read a password from `TICKLIST_PASSWORD` or the first line of stdin.
pub fn read_password() -> Result<SecretString, CliError> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(password));
    }

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);

    if password.is_empty() {
        return Err(CliError::MissingPassword);
    }
    Ok(SecretString::from(password.to_owned()))
}
