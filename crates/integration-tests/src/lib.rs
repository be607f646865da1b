//! Integration tests for Staybook.
//!
//! The storefront router is driven in-process with
//! `tower::ServiceExt::oneshot` over a [`MemoryStore`], so no server or
//! network is needed. Tests that exercise sign-in start a stand-in booking
//! API on an ephemeral loopback port with [`spawn_api`].
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p staybook-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use serde_json::json;
use staybook_core::{Credential, Email, Role, UserId, UserProfile};
use staybook_storefront::{
    app,
    config::StorefrontConfig,
    state::AppState,
    storage::{KeyValueStore, MemoryStore},
};
use tower::ServiceExt;
use url::Url;

/// Largest response body the helpers will buffer.
const BODY_LIMIT: usize = 1024 * 1024;

/// A storefront over an in-memory durable store.
pub struct TestContext {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

impl TestContext {
    /// Fresh storefront pointing at an API that is never reached.
    ///
    /// # Panics
    ///
    /// Never in practice; the fixed URL always parses.
    #[must_use]
    pub fn new() -> Self {
        Self::with_api(Url::parse("http://127.0.0.1:9/").unwrap_or_else(|_| unreachable!()))
    }

    /// Fresh storefront pointing at `api_url`.
    #[must_use]
    pub fn with_api(api_url: Url) -> Self {
        Self::over(Arc::new(MemoryStore::new()), api_url)
    }

    /// Storefront over an existing store, as after a process restart.
    #[must_use]
    pub fn over(store: Arc<MemoryStore>, api_url: Url) -> Self {
        let state = AppState::new(StorefrontConfig::new(api_url), store.clone());
        Self { state, store }
    }

    /// Send a GET request through the full router.
    pub async fn get(&self, path: &str) -> Response {
        self.send(Request::get(path).body(Body::empty())).await
    }

    /// Send a form POST through the full router.
    pub async fn post_form(&self, path: &str, form: &str) -> Response {
        self.send(
            Request::post(path)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string())),
        )
        .await
    }

    async fn send(&self, request: axum::http::Result<Request<Body>>) -> Response {
        let request = request.unwrap_or_else(|e| panic!("bad test request: {e}"));
        app(self.state.clone())
            .oneshot(request)
            .await
            .unwrap_or_else(|e| match e {})
    }

    /// Sign in through the session store, as a successful login would.
    pub fn sign_in(&self, role: Role) {
        let credential = Credential::parse("test-token").unwrap_or_else(|e| panic!("{e}"));
        self.state
            .session()
            .login(credential, Some(profile(role)))
            .unwrap_or_else(|e| panic!("login failed: {e}"));
    }

    /// Raw durable entry under `key`.
    #[must_use]
    pub fn stored(&self, key: &str) -> Option<String> {
        self.store.get(key).unwrap_or_else(|e| panic!("store read failed: {e}"))
    }

    /// Overwrite a durable entry directly, bypassing the stores.
    pub fn put(&self, key: &str, value: &str) {
        self.store
            .set(key, value)
            .unwrap_or_else(|e| panic!("store write failed: {e}"));
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A profile with the given role.
#[must_use]
pub fn profile(role: Role) -> UserProfile {
    UserProfile {
        id: UserId::new(41),
        email: Email::parse("traveller@example.com").unwrap_or_else(|e| panic!("{e}")),
        first_name: "Noor".to_string(),
        last_name: "Haddad".to_string(),
        phone: None,
        role,
        email_verified: true,
        email_verified_at: None,
    }
}

/// Read a response body as text.
pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .unwrap_or_else(|e| panic!("body read failed: {e}"));
    String::from_utf8_lossy(&bytes).into_owned()
}

/// `Location` header of a redirect, if any.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

/// Start a stand-in booking API and return its base URL.
///
/// `POST /auth/login` accepts `password == "correct horse"` and answers with
/// a token and a profile of the given role; anything else is a 401.
/// `PUT /auth/profile` echoes the submitted first name back in the profile.
pub async fn spawn_api(role: Role) -> Url {
    use axum::{Json, routing::post};

    let login = move |Json(body): Json<serde_json::Value>| async move {
        if body["password"] == "correct horse" {
            let user = profile(role);
            (StatusCode::OK, Json(json!({ "token": "api-token", "user": user })))
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "invalid credentials" })),
            )
        }
    };

    let update = move |Json(body): Json<serde_json::Value>| async move {
        let mut user = profile(role);
        if let Some(first) = body["first_name"].as_str() {
            user.first_name = first.to_string();
        }
        Json(user)
    };

    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/profile", axum::routing::put(update));

    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap_or_else(|e| panic!("bind failed: {e}"));
    let addr = listener
        .local_addr()
        .unwrap_or_else(|e| panic!("no local addr: {e}"));

    tokio::spawn(async move {
        let _ = axum::serve(listener, api).await;
    });

    Url::parse(&format!("http://{addr}/")).unwrap_or_else(|e| panic!("{e}"))
}
