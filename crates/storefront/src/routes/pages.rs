//! Shared page shell.
//!
//! Every page extends `base.html`, which needs a [`NavView`] built from
//! the in-memory session. Pages with no dedicated template use
//! [`PageTemplate`].

use askama::Template;
use askama_web::WebTemplate;

use crate::models::SessionRecord;

/// Navigation bar data, taken from the in-memory session.
#[derive(Debug, Clone, Default)]
pub struct NavView {
    /// Display name of the signed-in user, `None` when signed out.
    pub user_name: Option<String>,
    /// Whether to show the admin link.
    pub is_admin: bool,
}

impl From<&SessionRecord> for NavView {
    fn from(record: &SessionRecord) -> Self {
        if !record.is_authenticated() {
            return Self::default();
        }

        match record.user() {
            Some(user) => Self {
                user_name: Some(user.display_name()),
                is_admin: user.is_admin(),
            },
            None => Self {
                user_name: Some("My account".to_string()),
                is_admin: false,
            },
        }
    }
}

/// Generic page: a heading and a few paragraphs.
#[derive(Template, WebTemplate)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub title: String,
    pub nav: NavView,
    pub heading: String,
    pub lines: Vec<String>,
}

impl PageTemplate {
    /// Build a page whose title and heading match.
    pub fn new(record: &SessionRecord, heading: impl Into<String>) -> Self {
        let heading = heading.into();
        Self {
            title: heading.clone(),
            nav: NavView::from(record),
            heading,
            lines: Vec::new(),
        }
    }

    /// Append a paragraph.
    #[must_use]
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use staybook_core::{Credential, Email, Role, UserId, UserProfile};

    use super::*;

    fn admin() -> UserProfile {
        UserProfile {
            id: UserId::new(1),
            email: Email::parse("ops@example.com").unwrap(),
            first_name: "Ops".to_string(),
            last_name: String::new(),
            phone: None,
            role: Role::Admin,
            email_verified: true,
            email_verified_at: None,
        }
    }

    #[test]
    fn test_nav_signed_out() {
        let nav = NavView::from(&SessionRecord::default());
        assert!(nav.user_name.is_none());
        assert!(!nav.is_admin);
    }

    #[test]
    fn test_nav_admin() {
        let record = SessionRecord::authenticated(Credential::parse("t").unwrap(), Some(admin()));
        let nav = NavView::from(&record);
        assert_eq!(nav.user_name.as_deref(), Some("Ops"));
        assert!(nav.is_admin);
    }

    #[test]
    fn test_page_escapes_content() {
        let html = PageTemplate::new(&SessionRecord::default(), "Stays")
            .line("<script>alert(1)</script>")
            .render()
            .unwrap();
        assert!(html.contains("<h1>Stays</h1>"));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("Log in"));
    }
}
