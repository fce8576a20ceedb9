//! API gateway client for the to-do backend.
//!
//! Every network call goes through [`ApiClient::request`], which attaches the
//! JSON content type and the session's bearer token, decodes JSON responses
//! and enforces the one cross-cutting rule: a `401 Unauthorized` response
//! clears the session and sends the client back to the login view.
//!
//! # Modules
//!
//! - [`client`] - The gateway itself and the verb helpers
//! - [`auth`] - Login and registration calls
//! - [`todos`] - Task list and profile calls

pub mod auth;
pub mod client;
pub mod todos;

pub use client::{ApiClient, RequestOptions};

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::session::SessionError;

/// Backend paths.
pub mod paths {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const TODOS: &str = "/todos";
    pub const PROFILE: &str = "/todos/profile";

    /// Path of a single task.
    #[must_use]
    pub fn todo(id: ticklist_core::TaskId) -> String {
        format!("{TODOS}/{id}")
    }
}

/// Errors returned by the gateway.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected (or did not receive) a valid token. The session
    /// has already been cleared when this is returned.
    #[error("Unauthorized: session expired or token rejected")]
    Unauthorized,

    /// Any other non-2xx response.
    #[error("HTTP {status}: {status_text}")]
    Http {
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase for the status.
        status_text: String,
    },

    /// The response body was not the expected JSON.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The request never completed (connection refused, reset, DNS...).
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The endpoint path could not be joined to the base URL.
    #[error("Invalid request URL {0}: {1}")]
    InvalidUrl(String, String),

    /// A header value contained characters HTTP does not allow.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// The session store failed while reading the token.
    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Whether this error ended the session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// HTTP status carried by the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Decode a JSON value into a typed response.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    Ok(serde_json::from_value(value)?)
}
