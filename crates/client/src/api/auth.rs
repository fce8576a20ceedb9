//! Login and registration calls.

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use ticklist_core::{AccessToken, Credentials, Registration, User};
use tracing::instrument;

use super::{ApiClient, ApiError, decode, paths};

/// Request body for `POST /auth/login`.
#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Response from `POST /auth/login`.
#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
}

/// Request body for `POST /auth/register`.
#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Exchange credentials for a bearer token.
    ///
    /// The token is returned, not stored; the caller decides when the
    /// session begins.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` or `ApiError::Http` when the backend
    /// rejects the credentials, `ApiError::Decode` if no `access_token` comes
    /// back.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<AccessToken, ApiError> {
        let body = LoginRequest {
            email: credentials.email.as_str(),
            password: credentials.password.expose_secret(),
        };

        let response: LoginResponse = decode(self.post(paths::LOGIN, &body).await?)?;
        Ok(AccessToken::new(response.access_token))
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` when the backend refuses the registration
    /// (e.g. the email is taken).
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        let body = RegisterRequest {
            name: &registration.name,
            email: registration.email.as_str(),
            password: registration.password.expose_secret(),
        };

        decode(self.post(paths::REGISTER, &body).await?)
    }
}
