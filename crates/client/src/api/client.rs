//! The gateway client and its verb helpers.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};
use url::Url;

use super::ApiError;
use crate::router::{Navigator, Route};
use crate::session::SessionContext;

/// Per-request options for [`ApiClient::request`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// JSON body to send.
    pub body: Option<Value>,
    /// Extra headers merged over the defaults.
    pub headers: HeaderMap,
    /// Let `headers` replace `Content-Type` and `Authorization`. Off by
    /// default: those two always come from the client.
    pub allow_header_override: bool,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying a JSON body.
    #[must_use]
    pub fn json(body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::default()
        }
    }

    /// Add a caller header.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Allow caller headers to replace the protected defaults.
    #[must_use]
    pub const fn allow_header_override(mut self) -> Self {
        self.allow_header_override = true;
        self
    }
}

/// Single choke point for backend communication.
///
/// Cheap to clone; clones share the HTTP connection pool, the session and the
/// navigator.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    session: SessionContext,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `base_url`.
    ///
    /// No request timeout is configured; each call is attempted once and
    /// waits for the backend.
    #[must_use]
    pub fn new(base_url: Url, session: SessionContext, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                http: reqwest::Client::new(),
                base_url,
                session,
                navigator,
            }),
        }
    }

    /// Backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Session the client reads its token from.
    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.inner.session
    }

    /// Navigator used for the login redirect.
    #[must_use]
    pub fn navigator(&self) -> &dyn Navigator {
        self.inner.navigator.as_ref()
    }

    /// Absolute URL for an endpoint path.
    ///
    /// The path is appended to the base URL verbatim, so a base of
    /// `https://host/api` and a path of `/todos` gives `https://host/api/todos`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the result does not parse.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let joined = if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        };
        Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(joined.clone(), e.to_string()))
    }

    /// Headers for an outgoing request: JSON content type, the bearer token
    /// when a session exists, then the caller's headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or the token is not a
    /// valid header value.
    pub async fn build_headers(
        &self,
        caller: &HeaderMap,
        allow_override: bool,
    ) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.inner.session.get().await? {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut replaced: Vec<&HeaderName> = Vec::new();
        for (name, value) in caller {
            let protected = *name == CONTENT_TYPE || *name == AUTHORIZATION;
            if protected && !allow_override {
                continue;
            }
            if protected && !replaced.contains(&name) {
                headers.remove(name);
                replaced.push(name);
            }
            headers.append(name.clone(), value.clone());
        }

        Ok(headers)
    }

    /// Issue a request and decode the JSON response.
    ///
    /// An empty success body (e.g. `204 No Content`) decodes as `null`.
    ///
    /// # Errors
    ///
    /// - `ApiError::Unauthorized` on 401, after clearing the session and
    ///   navigating to `/login`
    /// - `ApiError::Http` on any other non-2xx status
    /// - `ApiError::Decode` if the body is not JSON
    /// - `ApiError::Network` if the request did not complete
    #[instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint_url(path)?;
        let headers = self
            .build_headers(&options.headers, options.allow_header_override)
            .await?;

        debug!(
            url = %url,
            authenticated = headers.contains_key(AUTHORIZATION),
            "API request"
        );

        let mut request = self.inner.http.request(method, url).headers(headers);
        if let Some(body) = &options.body {
            request = request.body(serde_json::to_vec(body).map_err(ApiError::Encode)?);
        }

        let response = request.send().await.map_err(ApiError::Network)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("Bearer token rejected, ending session");
            if let Err(e) = self.inner.session.clear().await {
                error!(error = %e, "Failed to clear session after 401");
            }
            self.inner.navigator.navigate(Route::Login);
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            debug!(status = status.as_u16(), "API request failed");
            return Err(ApiError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(ApiError::Network)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// `GET path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::GET, path, RequestOptions::new()).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`]; also `ApiError::Encode` if `body` cannot
    /// be serialized.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body).map_err(ApiError::Encode)?;
        self.request(Method::POST, path, RequestOptions::json(body))
            .await
    }

    /// `PATCH path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::post`].
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let body = serde_json::to_value(body).map_err(ApiError::Encode)?;
        self.request(Method::PATCH, path, RequestOptions::json(body))
            .await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, path, RequestOptions::new())
            .await
    }
}
