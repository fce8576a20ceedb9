//! Registration screen.

use std::time::Duration;

use secrecy::SecretString;
use ticklist_core::{Registration, User};
use tracing::{info, instrument, warn};

use super::{ViewError, user_message};
use crate::api::ApiClient;
use crate::router::Route;

/// Shown when the backend refuses a registration.
pub const REGISTER_FAILED_MESSAGE: &str = "Could not register user";

/// Shown once the account exists.
pub const REGISTER_CONFIRMATION_MESSAGE: &str =
    "Registration complete! You will be redirected to the login page shortly.";

/// State of the sign-up form.
#[derive(Debug)]
pub struct RegisterView {
    client: ApiClient,
    redirect_delay: Duration,
    error: Option<String>,
    loading: bool,
    registered: Option<User>,
}

impl RegisterView {
    /// `redirect_delay` is how long the confirmation stays up before the
    /// client moves on to `/login`.
    #[must_use]
    pub const fn new(client: ApiClient, redirect_delay: Duration) -> Self {
        Self {
            client,
            redirect_delay,
            error: None,
            loading: false,
            registered: None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Confirmation to display after a successful submit.
    #[must_use]
    pub const fn confirmation(&self) -> Option<&'static str> {
        if self.registered.is_some() {
            Some(REGISTER_CONFIRMATION_MESSAGE)
        } else {
            None
        }
    }

    /// The account created by the last successful submit.
    #[must_use]
    pub const fn registered_user(&self) -> Option<&User> {
        self.registered.as_ref()
    }

    /// Submit the form.
    ///
    /// Success does not navigate by itself; call
    /// [`RegisterView::redirect_to_login`] once the confirmation is shown.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Validation` for malformed input (no request is
    /// made), otherwise the API error.
    #[instrument(skip_all)]
    pub async fn submit(
        &mut self,
        name: &str,
        email: &str,
        password: SecretString,
    ) -> Result<&User, ViewError> {
        self.error = None;
        self.registered = None;

        let registration = match Registration::new(name, email, password) {
            Ok(registration) => registration,
            Err(e) => {
                let err = ViewError::Validation(e.to_string());
                self.error = Some(user_message(&err, REGISTER_FAILED_MESSAGE));
                return Err(err);
            }
        };

        self.loading = true;
        let result = self.client.register(&registration).await;
        self.loading = false;

        match result {
            Ok(user) => {
                info!(email = %user.email, "Account registered");
                Ok(self.registered.insert(user))
            }
            Err(e) => {
                warn!(error = %e, "Registration failed");
                let err = ViewError::from(e);
                self.error = Some(user_message(&err, REGISTER_FAILED_MESSAGE));
                Err(err)
            }
        }
    }

    /// Wait out the confirmation delay, then navigate to `/login`.
    ///
    /// Does nothing unless the last submit succeeded.
    pub async fn redirect_to_login(&self) {
        if self.registered.is_none() {
            return;
        }
        tokio::time::sleep(self.redirect_delay).await;
        self.client.navigator().navigate(Route::Login);
    }
}
