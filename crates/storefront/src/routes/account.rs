//! Account and checkout route handlers.
//!
//! These routes require a signed-in user. Every handler takes
//! [`RequireAuth`] first, so the guard runs before anything else.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use staybook_core::{LOGIN_PATH, UserProfile};
use tracing::instrument;

use super::pages::{NavView, PageTemplate};
use crate::api::{ApiError, ProfileUpdate};
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Profile display data for templates.
#[derive(Clone)]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub role: String,
}

impl From<&UserProfile> for ProfileView {
    fn from(user: &UserProfile) -> Self {
        Self {
            name: user.display_name(),
            email: user.email.to_string(),
            email_verified: user.email_verified,
            role: user.role.to_string(),
        }
    }
}

/// Account overview page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountIndexTemplate {
    pub title: String,
    pub nav: NavView,
    pub profile: Option<ProfileView>,
}

/// Profile form template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub title: String,
    pub nav: NavView,
    pub error: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Profile form data.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
}

impl ProfileForm {
    /// Fields that differ from the current profile.
    fn changes(&self, current: Option<&UserProfile>) -> ProfileUpdate {
        fn changed(new: &str, old: Option<&str>) -> Option<String> {
            let new = new.trim();
            (old != Some(new)).then(|| new.to_string())
        }

        ProfileUpdate {
            first_name: changed(&self.first_name, current.map(|u| u.first_name.as_str())),
            last_name: changed(&self.last_name, current.map(|u| u.last_name.as_str())),
            phone: changed(
                &self.phone,
                current.map(|u| u.phone.as_deref().unwrap_or_default()),
            ),
        }
    }
}

/// Display account overview page.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> impl IntoResponse {
    AccountIndexTemplate {
        title: "My account".to_string(),
        nav: NavView::from(&state.session().record()),
        profile: user.as_ref().map(ProfileView::from),
    }
}

/// Display booking history.
pub async fn bookings(State(state): State<AppState>, RequireAuth(_): RequireAuth) -> impl IntoResponse {
    PageTemplate::new(&state.session().record(), "My bookings")
        .line("You have no bookings yet.")
}

/// Display the profile form.
pub async fn profile_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> impl IntoResponse {
    ProfileTemplate {
        title: "Edit profile".to_string(),
        nav: NavView::from(&state.session().record()),
        error: None,
        first_name: user.as_ref().map(|u| u.first_name.clone()).unwrap_or_default(),
        last_name: user.as_ref().map(|u| u.last_name.clone()).unwrap_or_default(),
        phone: user.and_then(|u| u.phone).unwrap_or_default(),
    }
}

/// Handle profile form submission.
///
/// The API is the source of truth; the returned profile replaces the one
/// in the session.
#[instrument(skip(state, user, form))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    let Some(credential) = state.session().credential() else {
        // Durable storage holds a token the in-memory session never saw.
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    let update = form.changes(user.as_ref());
    if update.is_empty() {
        return Ok(Redirect::to("/account").into_response());
    }

    match state.api().update_profile(&credential, &update).await {
        Ok(updated) => {
            state.session().update_user(updated)?;
            Ok(Redirect::to("/account").into_response())
        }
        Err(ApiError::Status { status, message })
            if status.is_client_error() && !matches!(status.as_u16(), 401 | 403) =>
        {
            let page = ProfileTemplate {
                title: "Edit profile".to_string(),
                nav: NavView::from(&state.session().record()),
                error: Some(message),
                first_name: form.first_name,
                last_name: form.last_name,
                phone: form.phone,
            };
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Display the checkout page.
pub async fn checkout(State(state): State<AppState>, RequireAuth(_): RequireAuth) -> impl IntoResponse {
    PageTemplate::new(&state.session().record(), "Checkout")
}

/// Display the checkout confirmation.
pub async fn confirmation(
    State(state): State<AppState>,
    RequireAuth(_): RequireAuth,
) -> impl IntoResponse {
    PageTemplate::new(&state.session().record(), "Booking confirmed")
        .line("Thank you. Your booking is confirmed.")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use staybook_core::{Email, Role, UserId};

    use super::*;

    fn user() -> UserProfile {
        UserProfile {
            id: UserId::new(3),
            email: Email::parse("lea@example.com").unwrap(),
            first_name: "Lea".to_string(),
            last_name: "Moreau".to_string(),
            phone: None,
            role: Role::Guest,
            email_verified: false,
            email_verified_at: None,
        }
    }

    fn form(first: &str, last: &str, phone: &str) -> ProfileForm {
        ProfileForm {
            first_name: first.to_string(),
            last_name: last.to_string(),
            phone: phone.to_string(),
        }
    }

    #[test]
    fn test_unchanged_form_is_empty_update() {
        let update = form("Lea", " Moreau ", "").changes(Some(&user()));
        assert!(update.is_empty());
    }

    #[test]
    fn test_only_changed_fields_are_sent() {
        let update = form("Léa", "Moreau", "+33 1 23").changes(Some(&user()));
        assert_eq!(update.first_name.as_deref(), Some("Léa"));
        assert_eq!(update.last_name, None);
        assert_eq!(update.phone.as_deref(), Some("+33 1 23"));
    }

    #[test]
    fn test_without_profile_everything_is_sent() {
        let update = form("Lea", "Moreau", "").changes(None);
        assert_eq!(update.first_name.as_deref(), Some("Lea"));
        assert_eq!(update.phone.as_deref(), Some(""));
    }

    #[test]
    fn test_profile_view() {
        let view = ProfileView::from(&user());
        assert_eq!(view.name, "Lea Moreau");
        assert_eq!(view.role, "guest");
    }
}
