//! Durable key-value storage.
//!
//! The session and favorites stores persist through the [`KeyValueStore`]
//! trait: a synchronous, process-local string map that survives restarts.
//!
//! ## Implementations
//!
//! - [`FileStore`] - JSON file on disk, rewritten on every mutation
//! - [`MemoryStore`] - in-process map for tests and throwaway runs
//!
//! ## Keys
//!
//! ```text
//! token              → raw bearer credential (plain string)
//! auth-storage       → {"state":{"user":{...}|null,"isAuthenticated":bool},"version":0}
//! favorites-storage  → {"state":{"favorites":["id", ...]},"version":0}
//! ```
//!
//! Writes to different keys are independent: there is no multi-key
//! transaction.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Storage keys shared by the stores and the admission guard.
pub mod keys {
    /// Raw bearer credential.
    pub const CREDENTIAL: &str = "token";

    /// Session snapshot (profile and authenticated flag, never the credential).
    pub const SESSION: &str = "auth-storage";

    /// Favorites snapshot.
    pub const FAVORITES: &str = "favorites-storage";
}

/// Errors raised by a durable store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a JSON string map.
    #[error("storage file is corrupt: {0}")]
    Corrupt(String),

    /// A value could not be serialized.
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Synchronous, durable string storage.
///
/// Every successful write is visible to the very next read from any holder
/// of the same store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unavailable.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion could not be persisted.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Envelope around every structured snapshot.
///
/// Readers rely on the `state` wrapper being present; a bare object is
/// treated as unparsable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persisted<T> {
    /// The persisted slice of the store.
    pub state: T,
    /// Snapshot format version.
    #[serde(default)]
    pub version: u32,
}

impl<T> Persisted<T> {
    /// Current snapshot format version.
    pub const VERSION: u32 = 0;

    /// Wrap a state slice at the current version.
    pub const fn new(state: T) -> Self {
        Self {
            state,
            version: Self::VERSION,
        }
    }
}

/// Serialize `state` into its envelope and write it under `key`.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_snapshot<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    state: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(&Persisted::new(state))?;
    store.set(key, &json)
}

/// Read and parse the snapshot under `key`.
///
/// Returns `None` when the key is absent, unreadable, or does not parse as
/// an envelope around `T`.
pub fn read_snapshot<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read snapshot");
            return None;
        }
    };

    match serde_json::from_str::<Persisted<T>>(&raw) {
        Ok(persisted) => Some(persisted.state),
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring unparsable snapshot");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
    }

    #[test]
    fn test_snapshot_uses_state_envelope() {
        let store = MemoryStore::new();
        write_snapshot(&store, "counter", &Counter { count: 3 }).unwrap();

        let raw = store.get("counter").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({"state": {"count": 3}, "version": 0}));

        let read: Counter = read_snapshot(&store, "counter").unwrap();
        assert_eq!(read, Counter { count: 3 });
    }

    #[test]
    fn test_read_snapshot_without_envelope_is_none() {
        let store = MemoryStore::new();
        store.set("counter", r#"{"count": 3}"#).unwrap();
        assert!(read_snapshot::<Counter>(&store, "counter").is_none());
    }

    #[test]
    fn test_read_snapshot_malformed_or_missing_is_none() {
        let store = MemoryStore::new();
        assert!(read_snapshot::<Counter>(&store, "counter").is_none());

        store.set("counter", "{not json").unwrap();
        assert!(read_snapshot::<Counter>(&store, "counter").is_none());
    }
}
