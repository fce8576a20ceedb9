//! View models for the login, registration and task list screens.
//!
//! A view owns the state a screen renders (input-derived flags, the last
//! error message, loaded data) and drives the [`ApiClient`](crate::api::ApiClient)
//! in response to user actions. Rendering is left to the front end.
//!
//! Every action records a user-facing message in the view when it fails and
//! also returns the underlying [`ViewError`] so callers can branch on it.

pub mod login;
pub mod register;
pub mod todo;

pub use login::LoginView;
pub use register::RegisterView;
pub use todo::TodoView;

use thiserror::Error;

use crate::api::ApiError;
use crate::session::SessionError;

/// Shown when any call ends the session.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// Errors surfaced by view actions.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Input was rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The session could not be read or written.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ViewError {
    /// Whether the error came from client-side validation.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Message a view displays for a failed action.
pub(crate) fn user_message(error: &ViewError, fallback: &str) -> String {
    match error {
        ViewError::Validation(message) => message.clone(),
        ViewError::Api(ApiError::Unauthorized) => SESSION_EXPIRED_MESSAGE.to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_validation_text() {
        let err = ViewError::Validation("task title cannot be blank".to_string());
        assert_eq!(user_message(&err, "fallback"), "task title cannot be blank");
        assert!(err.is_validation());
    }

    #[test]
    fn test_user_message_for_expired_session() {
        let err = ViewError::Api(ApiError::Unauthorized);
        assert_eq!(user_message(&err, "fallback"), SESSION_EXPIRED_MESSAGE);
    }

    #[test]
    fn test_user_message_hides_http_details() {
        let err = ViewError::Api(ApiError::Http {
            status: 500,
            status_text: "Internal Server Error".to_string(),
        });
        assert_eq!(user_message(&err, "Could not load tasks"), "Could not load tasks");
    }
}
