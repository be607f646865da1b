//! Booking API client.
//!
//! Only the endpoints that feed the session store live here; catalog and
//! booking endpoints are plain `GET`/`POST` calls made by the pages that
//! need them.
//!
//! # Endpoints
//!
//! ```text
//! POST {base}/auth/login      → { token, user }
//! POST {base}/auth/register   → { token, user }
//! GET  {base}/auth/profile    → UserProfile   (Bearer)
//! PUT  {base}/auth/profile    → UserProfile   (Bearer)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let api = ApiClient::new(&config.api_url);
//! let auth = api.login("guest@example.com", "hunter2").await?;
//! state.session().login(auth.credential, auth.user)?;
//! ```

mod types;

pub use types::*;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use staybook_core::{Credential, UserProfile};
use thiserror::Error;
use url::Url;

/// Errors that can occur when calling the booking API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Message from the error body, or the raw body.
        message: String,
    },

    /// The API response could not be interpreted.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Whether the API rejected the credentials or token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Status {
                status: StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN,
                ..
            }
        )
    }
}

/// Client for the booking API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: &Url) -> Self {
        let mut base_url = base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        }
    }

    /// The API root, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an endpoint path against the API root.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not form a valid URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidResponse(format!("bad endpoint {path}: {e}")))
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with 401 for wrong credentials, or
    /// another error if the call fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let request = self
            .request(Method::POST, "auth/login")?
            .json(&LoginRequest { email, password });

        let body: AuthResponseBody = send_json(request).await?;
        into_auth_response(body)
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the registration or the call fails.
    pub async fn register(&self, registration: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let request = self
            .request(Method::POST, "auth/register")?
            .json(registration);

        let body: AuthResponseBody = send_json(request).await?;
        into_auth_response(body)
    }

    /// Fetch the profile of the credential's owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the call fails.
    pub async fn current_user(&self, credential: &Credential) -> Result<UserProfile, ApiError> {
        let request = self
            .request(Method::GET, "auth/profile")?
            .header(reqwest::header::AUTHORIZATION, credential.bearer_header());

        send_json(request).await
    }

    /// Update the profile of the credential's owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the call fails.
    pub async fn update_profile(
        &self,
        credential: &Credential,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        let request = self
            .request(Method::PUT, "auth/profile")?
            .header(reqwest::header::AUTHORIZATION, credential.bearer_header())
            .json(update);

        send_json(request).await
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        Ok(self.inner.client.request(method, url))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request.send().await?;
    let response = check_status(response).await?;
    Ok(response.json().await?)
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text).map_or(text, |body| body.message);

    tracing::debug!(%status, %message, "Booking API returned an error");
    Err(ApiError::Status { status, message })
}

fn into_auth_response(body: AuthResponseBody) -> Result<AuthResponse, ApiError> {
    let credential = Credential::parse(&body.token)
        .map_err(|_| ApiError::InvalidResponse("empty token in auth response".to_string()))?;

    Ok(AuthResponse {
        credential,
        user: body.user,
    })
}
