//! Command implementations.
//!
//! Each command takes the opened store and returns the text to print, so
//! the commands can be tested without capturing stdout.

pub mod favorites;
pub mod guard;
pub mod session;

use std::path::PathBuf;

use staybook_core::CredentialError;
use staybook_storefront::api::ApiError;
use staybook_storefront::storage::StorageError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The store file could not be read or written.
    #[error("Store error: {0}")]
    Storage(#[from] StorageError),

    /// The booking API call failed.
    #[error("Booking API error: {0}")]
    Api(#[from] ApiError),

    /// The token given on the command line is blank.
    #[error("Invalid token: {0}")]
    Credential(#[from] CredentialError),

    /// A profile file could not be read.
    #[error("Cannot read profile file {path}: {source}")]
    ProfileFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A profile file is not a valid profile.
    #[error("Invalid profile in {path}: {source}")]
    InvalidProfile {
        path: PathBuf,
        source: serde_json::Error,
    },
}
