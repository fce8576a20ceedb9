//! Login screen.

use secrecy::SecretString;
use ticklist_core::Credentials;
use tracing::{info, instrument, warn};

use super::{ViewError, user_message};
use crate::api::ApiClient;
use crate::router::Route;

/// Shown for any failed login that passed client-side validation.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

/// State of the login form.
#[derive(Debug)]
pub struct LoginView {
    client: ApiClient,
    error: Option<String>,
    loading: bool,
}

impl LoginView {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self {
            client,
            error: None,
            loading: false,
        }
    }

    /// Message to show under the form, if the last submit failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a submit is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Submit the form.
    ///
    /// On success the token is stored, the session becomes authenticated and
    /// the client navigates to `/todo`. On failure the client stays where it
    /// is and [`LoginView::error`] explains why.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Validation` for malformed input (no request is
    /// made), otherwise the API or session error.
    #[instrument(skip_all)]
    pub async fn submit(&mut self, email: &str, password: SecretString) -> Result<(), ViewError> {
        self.error = None;

        let credentials = match Credentials::new(email, password) {
            Ok(credentials) => credentials,
            Err(e) => {
                let err = ViewError::Validation(e.to_string());
                self.error = Some(user_message(&err, INVALID_CREDENTIALS_MESSAGE));
                return Err(err);
            }
        };

        self.loading = true;
        let result = self.sign_in(&credentials).await;
        self.loading = false;

        if let Err(e) = &result {
            warn!(error = %e, "Login failed");
            self.error = Some(INVALID_CREDENTIALS_MESSAGE.to_string());
        }
        result
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<(), ViewError> {
        let token = self.client.login(credentials).await?;
        self.client.session().set(&token).await?;

        info!(email = %credentials.email, "Signed in");
        self.client.navigator().navigate(Route::Todo);
        Ok(())
    }
}
