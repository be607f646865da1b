//! Route admission types.
//!
//! Protected pages declare an [`AccessLevel`]; the admission guard answers
//! every navigation with an [`AdmissionDecision`].

use serde::{Deserialize, Serialize};

/// Path of the login page.
pub const LOGIN_PATH: &str = "/login";

/// Path of the account page.
pub const ACCOUNT_PATH: &str = "/account";

/// Capability set a protected route requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Any signed-in user.
    Authenticated,
    /// A signed-in user whose role claim is `admin`.
    Admin,
}

impl AccessLevel {
    /// Whether the route checks the role claim on top of authentication.
    #[must_use]
    pub const fn requires_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Outcome of a single admission check.
///
/// Computed fresh for every navigation and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionDecision {
    /// Render the page.
    Allow,
    /// Abort and navigate to the login page.
    RedirectToLogin,
    /// Abort and navigate to the account page.
    RedirectToAccount,
}

impl AdmissionDecision {
    /// Whether the navigation may proceed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Where to navigate instead, if the page may not render.
    ///
    /// ```
    /// use staybook_core::AdmissionDecision;
    ///
    /// assert_eq!(AdmissionDecision::Allow.redirect_path(), None);
    /// assert_eq!(AdmissionDecision::RedirectToLogin.redirect_path(), Some("/login"));
    /// assert_eq!(AdmissionDecision::RedirectToAccount.redirect_path(), Some("/account"));
    /// ```
    #[must_use]
    pub const fn redirect_path(self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin => Some(LOGIN_PATH),
            Self::RedirectToAccount => Some(ACCOUNT_PATH),
        }
    }
}
