//! Authentication payload types.
//!
//! Passwords and bearer tokens are kept in [`SecretString`]s so they are
//! redacted from `Debug` output. They are only exposed by the HTTP layer when
//! a request body or `Authorization` header is built.

use secrecy::{ExposeSecret, SecretString};

use super::email::{Email, EmailError};

/// Errors raised while validating login or registration input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthInputError {
    /// The email address is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
    /// The display name is empty.
    #[error("name cannot be empty")]
    EmptyName,
    /// The password is empty.
    #[error("password cannot be empty")]
    EmptyPassword,
}

/// Email/password pair submitted to the login endpoint.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Account email.
    pub email: Email,
    /// Account password.
    pub password: SecretString,
}

impl Credentials {
    /// Validate raw form input into credentials.
    ///
    /// # Errors
    ///
    /// Returns [`AuthInputError`] if the email is malformed or the password is
    /// empty.
    pub fn new(email: &str, password: SecretString) -> Result<Self, AuthInputError> {
        let email = Email::parse(email)?;
        if password.expose_secret().is_empty() {
            return Err(AuthInputError::EmptyPassword);
        }
        Ok(Self { email, password })
    }
}

/// Sign-up form submitted to the registration endpoint.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: Email,
    /// Chosen password.
    pub password: SecretString,
}

impl Registration {
    /// Validate raw form input into a registration request.
    ///
    /// # Errors
    ///
    /// Returns [`AuthInputError`] if the name is blank, the email is malformed,
    /// or the password is empty.
    pub fn new(name: &str, email: &str, password: SecretString) -> Result<Self, AuthInputError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthInputError::EmptyName);
        }
        let email = Email::parse(email)?;
        if password.expose_secret().is_empty() {
            return Err(AuthInputError::EmptyPassword);
        }
        Ok(Self {
            name: name.to_owned(),
            email,
            password,
        })
    }
}

/// Opaque bearer token proving an authenticated session.
#[derive(Debug, Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Expose the raw token for building an `Authorization` header or
    /// persisting it.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_credentials_valid() {
        let creds = Credentials::new(" ana@example.com", secret("hunter2")).unwrap();
        assert_eq!(creds.email.as_str(), "ana@example.com");
        assert_eq!(creds.password.expose_secret(), "hunter2");
    }

    #[test]
    fn test_credentials_reject_empty_password() {
        let err = Credentials::new("ana@example.com", secret("")).unwrap_err();
        assert_eq!(err, AuthInputError::EmptyPassword);
    }

    #[test]
    fn test_credentials_reject_bad_email() {
        let err = Credentials::new("not-an-email", secret("pw")).unwrap_err();
        assert!(matches!(err, AuthInputError::InvalidEmail(_)));
    }

    #[test]
    fn test_registration_trims_name() {
        let reg = Registration::new("  Ana Lima ", "ana@example.com", secret("pw")).unwrap();
        assert_eq!(reg.name, "Ana Lima");
    }

    #[test]
    fn test_registration_rejects_blank_name() {
        let err = Registration::new("   ", "ana@example.com", secret("pw")).unwrap_err();
        assert_eq!(err, AuthInputError::EmptyName);
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let creds = Credentials::new("ana@example.com", secret("hunter2")).unwrap();
        let token = AccessToken::new("eyJhbGciOi");

        assert!(!format!("{creds:?}").contains("hunter2"));
        assert!(!format!("{token:?}").contains("eyJhbGciOi"));
        assert_eq!(token.expose(), "eyJhbGciOi");
    }
}
