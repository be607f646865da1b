//! User profile supplied by the booking API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Email, Role, UserId};

/// Identity, role claim and contact details of the signed-in user.
///
/// The API sends the profile wholesale on login, registration and profile
/// update; the client stores it as received and never validates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User's API ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Role claim. Trusted as-is.
    #[serde(default)]
    pub role: Role,
    /// Whether the email address has been verified.
    #[serde(default)]
    pub email_verified: bool,
    /// When the email address was verified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Name to show in page headers, falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.email.to_string()
        } else {
            full.to_owned()
        }
    }

    /// Whether the role claim grants admin access.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
