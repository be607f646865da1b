//! Role claim asserted by the booking API.

use core::fmt;

use serde::{Deserialize, Serialize};

/// User role with different permission levels.
///
/// The API only ever sends `guest`, `staff` or `admin`. Anything else
/// deserializes as [`Role::Unrecognized`], which is never treated as admin.
///
/// ```
/// use staybook_core::Role;
///
/// let role: Role = serde_json::from_str("\"admin\"").unwrap();
/// assert!(role.is_admin());
///
/// let role: Role = serde_json::from_str("\"superuser\"").unwrap();
/// assert_eq!(role, Role::Unrecognized);
/// assert!(!role.is_admin());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular customer.
    #[default]
    Guest,
    /// Property or activity staff.
    Staff,
    /// Back-office administrator.
    Admin,
    /// A value the client does not know about.
    #[serde(other)]
    Unrecognized,
}

impl Role {
    /// Whether this role may enter the admin area.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// The wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Staff => "staff",
            Self::Admin => "admin",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
