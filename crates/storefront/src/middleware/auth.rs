//! Route admission extractors.
//!
//! Protected handlers take [`RequireAuth`] or [`RequireAdmin`] as their
//! first argument. The extractor asks the [`AdmissionGuard`] before the
//! handler body runs, so a rejected navigation never reaches any data
//! fetch.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn bookings(RequireAuth(user): RequireAuth) -> impl IntoResponse {
//!     // only reached when the guard allowed the navigation
//! }
//! ```
//!
//! [`AdmissionGuard`]: crate::services::AdmissionGuard

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use staybook_core::{AccessLevel, AdmissionDecision, UserProfile};

use crate::models::SessionRecord;
use crate::state::AppState;

/// Extractor for pages that need a signed-in user.
///
/// Carries the in-memory profile, which may be `None` if it has not been
/// fetched yet.
pub struct RequireAuth(pub Option<UserProfile>);

/// Extractor for admin-area pages.
pub struct RequireAdmin(pub Option<UserProfile>);

/// Extractor for the in-memory session, without admission control.
pub struct CurrentSession(pub SessionRecord);

/// Rejection returned when the guard does not admit a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionRejection {
    /// Navigate to another page instead (for HTML requests).
    Redirect(&'static str),
    /// Not signed in (for API requests).
    Unauthorized,
    /// Signed in without the required role (for API requests).
    Forbidden,
}

impl AdmissionRejection {
    /// Map a non-allow decision to a rejection for the given request path.
    ///
    /// Returns `None` for [`AdmissionDecision::Allow`].
    #[must_use]
    pub fn from_decision(decision: AdmissionDecision, path: &str) -> Option<Self> {
        let target = decision.redirect_path()?;

        if !path.starts_with("/api/") {
            return Some(Self::Redirect(target));
        }

        Some(match decision {
            AdmissionDecision::RedirectToAccount => Self::Forbidden,
            _ => Self::Unauthorized,
        })
    }
}

impl IntoResponse for AdmissionRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(target) => Redirect::to(target).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
        }
    }
}

/// Run the guard for `access` against the current request.
fn admit(parts: &Parts, state: &AppState, access: AccessLevel) -> Result<(), AdmissionRejection> {
    let decision = state.guard().evaluate(access);

    match AdmissionRejection::from_decision(decision, parts.uri.path()) {
        None => Ok(()),
        Some(rejection) => {
            tracing::info!(
                path = parts.uri.path(),
                ?access,
                ?decision,
                "Navigation not admitted"
            );
            Err(rejection)
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AdmissionRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        admit(parts, state, AccessLevel::Authenticated)?;
        Ok(Self(state.session().user()))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdmissionRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        admit(parts, state, AccessLevel::Admin)?;
        Ok(Self(state.session().user()))
    }
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(state.session().record()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_is_not_a_rejection() {
        assert_eq!(
            AdmissionRejection::from_decision(AdmissionDecision::Allow, "/admin"),
            None
        );
    }

    #[test]
    fn test_pages_get_redirects() {
        assert_eq!(
            AdmissionRejection::from_decision(AdmissionDecision::RedirectToLogin, "/checkout"),
            Some(AdmissionRejection::Redirect("/login"))
        );
        assert_eq!(
            AdmissionRejection::from_decision(AdmissionDecision::RedirectToAccount, "/admin"),
            Some(AdmissionRejection::Redirect("/account"))
        );
    }

    #[test]
    fn test_api_gets_status_codes() {
        assert_eq!(
            AdmissionRejection::from_decision(AdmissionDecision::RedirectToLogin, "/api/admin/bookings"),
            Some(AdmissionRejection::Unauthorized)
        );
        assert_eq!(
            AdmissionRejection::from_decision(AdmissionDecision::RedirectToAccount, "/api/admin/bookings"),
            Some(AdmissionRejection::Forbidden)
        );
    }

    #[test]
    fn test_redirect_response() {
        let response = AdmissionRejection::Redirect("/login").into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/login");
    }
}
