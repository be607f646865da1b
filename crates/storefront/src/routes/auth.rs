//! Authentication route handlers.
//!
//! Credentials are checked by the booking API. On success the returned
//! bearer token and profile go into the [`SessionStore`], which is what the
//! admission guard later reads back from durable storage.
//!
//! [`SessionStore`]: crate::services::SessionStore

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use staybook_core::{ACCOUNT_PATH, Credential, Email, UserProfile};
use tracing::instrument;

use super::pages::NavView;
use crate::api::{ApiError, AuthResponse, RegisterRequest};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::CurrentSession;
use crate::state::AppState;

/// Shortest password the register form accepts.
const MIN_PASSWORD_LEN: usize = 8;

// ─────────────────────────────────────────────────────────────────────────────
// Form Types
// ─────────────────────────────────────────────────────────────────────────────

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: SecretString,
    pub password_confirm: SecretString,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Templates
// ─────────────────────────────────────────────────────────────────────────────

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub title: String,
    pub nav: NavView,
    pub error: Option<String>,
    pub email: String,
}

impl LoginTemplate {
    fn new(nav: NavView, email: String, error: Option<String>) -> Self {
        Self {
            title: "Log in".to_string(),
            nav,
            error,
            email,
        }
    }
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub title: String,
    pub nav: NavView,
    pub error: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl RegisterTemplate {
    fn from_form(nav: NavView, form: &RegisterForm, error: Option<String>) -> Self {
        Self {
            title: "Sign up".to_string(),
            nav,
            error,
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            email: form.email.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Login
// ─────────────────────────────────────────────────────────────────────────────

/// Display the login page.
pub async fn login_page(CurrentSession(session): CurrentSession) -> impl IntoResponse {
    LoginTemplate::new(NavView::from(&session), String::new(), None)
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let nav = NavView::from(&session);

    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(e) => {
            let page = LoginTemplate::new(nav, form.email, Some(e.to_string()));
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
    };

    match state.api().login(email.as_str(), form.password.expose_secret()).await {
        Ok(auth) => {
            sign_in(&state, auth).await?;
            Ok(Redirect::to(ACCOUNT_PATH).into_response())
        }
        Err(e) if e.is_unauthorized() => {
            tracing::warn!("Login rejected");
            let page = LoginTemplate::new(
                nav,
                email.to_string(),
                Some("Incorrect email or password.".to_string()),
            );
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Registration
// ─────────────────────────────────────────────────────────────────────────────

/// Display the registration page.
pub async fn register_page(CurrentSession(session): CurrentSession) -> impl IntoResponse {
    RegisterTemplate {
        title: "Sign up".to_string(),
        nav: NavView::from(&session),
        error: None,
        first_name: String::new(),
        last_name: String::new(),
        email: String::new(),
    }
}

/// Handle registration form submission.
///
/// The API signs the new account in right away.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let nav = NavView::from(&session);

    let problem = if form.password.expose_secret() != form.password_confirm.expose_secret() {
        Some("Passwords do not match.".to_string())
    } else if form.password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
        Some(format!("Password must be at least {MIN_PASSWORD_LEN} characters."))
    } else if form.first_name.trim().is_empty() || form.last_name.trim().is_empty() {
        Some("Please enter your name.".to_string())
    } else {
        Email::parse(&form.email).err().map(|e| e.to_string())
    };

    if let Some(message) = problem {
        let page = RegisterTemplate::from_form(nav, &form, Some(message));
        return Ok((StatusCode::BAD_REQUEST, page).into_response());
    }

    let request = RegisterRequest {
        email: form.email.trim().to_string(),
        password: form.password.expose_secret().to_string(),
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        phone: form.phone.clone().filter(|p| !p.trim().is_empty()),
    };

    match state.api().register(&request).await {
        Ok(auth) => {
            sign_in(&state, auth).await?;
            Ok(Redirect::to(ACCOUNT_PATH).into_response())
        }
        Err(ApiError::Status { status, message }) if status.is_client_error() => {
            tracing::warn!(%status, "Registration rejected");
            let page = RegisterTemplate::from_form(nav, &form, Some(message));
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logout
// ─────────────────────────────────────────────────────────────────────────────

/// Handle logout.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Result<impl IntoResponse> {
    state.session().logout()?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}

/// Store a fresh sign-in, fetching the profile if the API left it out.
async fn sign_in(state: &AppState, auth: AuthResponse) -> Result<()> {
    let AuthResponse { credential, user } = auth;
    let user = match user {
        Some(user) => Some(user),
        None => fetch_profile(state, &credential).await,
    };

    if let Some(user) = &user {
        set_sentry_user(&user.id, Some(user.email.as_str()));
    }
    state.session().login(credential, user)?;
    Ok(())
}

/// The profile is optional at sign-in, so a failed fetch only logs.
async fn fetch_profile(state: &AppState, credential: &Credential) -> Option<UserProfile> {
    match state.api().current_user(credential).await {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::warn!(error = %e, "Could not fetch profile after sign-in");
            None
        }
    }
}
