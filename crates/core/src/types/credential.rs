//! Bearer credential issued by the booking API.
//!
//! The client never inspects the token: it only cares whether one is
//! present. The value is kept behind [`SecretString`] so it cannot leak
//! through `Debug` output or tracing fields.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Errors that can occur when building a [`Credential`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// The token is empty or only whitespace.
    #[error("credential cannot be empty")]
    Empty,
}

/// An opaque bearer token.
///
/// ## Constraints
///
/// - Must contain at least one non-whitespace character
///
/// ## Examples
///
/// ```
/// use staybook_core::Credential;
///
/// let token = Credential::parse("eyJhbGciOi...").unwrap();
/// assert_eq!(token.expose(), "eyJhbGciOi...");
/// assert_eq!(format!("{token:?}"), "Credential([REDACTED])");
///
/// assert!(Credential::parse("").is_err());
/// assert!(Credential::parse("   ").is_err());
/// ```
#[derive(Clone)]
pub struct Credential(SecretString);

impl Credential {
    /// Parse a `Credential` from a raw token string.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Empty`] if the token is blank.
    pub fn parse(token: &str) -> Result<Self, CredentialError> {
        if token.trim().is_empty() {
            return Err(CredentialError::Empty);
        }
        Ok(Self(SecretString::from(token.to_owned())))
    }

    /// Returns the raw token.
    ///
    /// Only call this when writing the token to the durable store or an
    /// `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Formats the token as an `Authorization` header value.
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.expose())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for Credential {}

impl std::str::FromStr for Credential {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(Credential::parse(""), Err(CredentialError::Empty));
        assert_eq!(Credential::parse(" \t\n"), Err(CredentialError::Empty));
    }

    #[test]
    fn test_parse_keeps_token_verbatim() {
        let token = Credential::parse(" abc.def ").unwrap();
        assert_eq!(token.expose(), " abc.def ");
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = Credential::parse("super-secret-token").unwrap();
        let debug = format!("{token:?}");
        assert!(!debug.contains("super-secret-token"));
    }

    #[test]
    fn test_bearer_header() {
        let token = Credential::parse("abc").unwrap();
        assert_eq!(token.bearer_header(), "Bearer abc");
    }
}
