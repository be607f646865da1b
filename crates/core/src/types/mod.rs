//! Core types for Staybook.
//!
//! This module provides type-safe wrappers for the session domain.

pub mod access;
pub mod credential;
pub mod email;
pub mod id;
pub mod profile;
pub mod role;

pub use access::{ACCOUNT_PATH, AccessLevel, AdmissionDecision, LOGIN_PATH};
pub use credential::{Credential, CredentialError};
pub use email::{Email, EmailError};
pub use id::*;
pub use profile::UserProfile;
pub use role::Role;
