//! Request and response shapes for the booking API auth endpoints.

use serde::{Deserialize, Serialize};

use staybook_core::UserProfile;

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `POST /auth/login`.
#[derive(Debug, Serialize)]
pub(super) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Email address to register.
    pub email: String,
    /// Chosen password. Hashed by the API, never stored here.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Optional contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Body of `PUT /auth/profile`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    /// New given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.phone.is_none()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

/// Raw response of the login and registration endpoints.
#[derive(Debug, Deserialize)]
pub(super) struct AuthResponseBody {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Successful sign-in: a credential and, usually, the profile.
#[derive(Debug, Clone)]
pub struct AuthResponse {
    /// Bearer credential for later calls.
    pub credential: staybook_core::Credential,
    /// Profile of the signed-in user, if the API sent one.
    pub user: Option<UserProfile>,
}

/// Error body the API returns on failures.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(alias = "error")]
    pub message: String,
}
