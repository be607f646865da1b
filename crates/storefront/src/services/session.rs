//! Session store.
//!
//! Owns the in-memory [`SessionRecord`] and mirrors every mutation to
//! durable storage:
//!
//! - the raw credential under [`keys::CREDENTIAL`]
//! - a [`SessionSnapshot`] (profile + authenticated flag) under [`keys::SESSION`]
//!
//! The two writes are independent. If the process dies between them the
//! credential and the snapshot can disagree until the next mutation.

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use staybook_core::{Credential, UserProfile};

use crate::models::{SessionRecord, SessionSnapshot};
use crate::storage::{KeyValueStore, StorageError, keys, read_snapshot, write_snapshot};

/// Authentication state for the current user.
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    record: RwLock<SessionRecord>,
}

impl SessionStore {
    /// Create a signed-out store without reading durable storage.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            record: RwLock::new(SessionRecord::default()),
        }
    }

    /// Rebuild the in-memory record from durable storage.
    ///
    /// The stored credential decides whether the session is signed in; the
    /// snapshot only contributes the profile. Unreadable or malformed
    /// entries hydrate as absent.
    #[must_use]
    pub fn hydrate(store: Arc<dyn KeyValueStore>) -> Self {
        let credential = match store.get(keys::CREDENTIAL) {
            Ok(Some(raw)) => Credential::parse(&raw).ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored credential");
                None
            }
        };

        let record = credential.map_or_else(SessionRecord::default, |credential| {
            let user = read_snapshot::<SessionSnapshot>(store.as_ref(), keys::SESSION)
                .and_then(|snapshot| snapshot.user);
            SessionRecord::authenticated(credential, user)
        });

        tracing::debug!(
            authenticated = record.is_authenticated(),
            has_profile = record.user().is_some(),
            "Session hydrated"
        );

        Self {
            store,
            record: RwLock::new(record),
        }
    }

    /// Sign in with a credential and the profile returned alongside it.
    ///
    /// # Errors
    ///
    /// Returns an error if durable storage rejects a write. If the
    /// credential write fails nothing changes; if the snapshot write fails
    /// the credential and in-memory record are already updated.
    pub fn login(
        &self,
        credential: Credential,
        user: Option<UserProfile>,
    ) -> Result<(), StorageError> {
        let mut record = self.write_record();

        self.store.set(keys::CREDENTIAL, credential.expose())?;
        *record = SessionRecord::authenticated(credential, user);
        write_snapshot(self.store.as_ref(), keys::SESSION, &record.snapshot())?;

        tracing::info!(
            user_id = record.user().map(|u| u.id.as_i64()),
            role = record.user().map(|u| u.role.as_str()),
            "User logged in"
        );
        Ok(())
    }

    /// Sign out. Calling this while signed out is a no-op apart from
    /// rewriting the same signed-out snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if durable storage rejects a write.
    pub fn logout(&self) -> Result<(), StorageError> {
        let mut record = self.write_record();
        let was_authenticated = record.is_authenticated();

        self.store.remove(keys::CREDENTIAL)?;
        *record = SessionRecord::default();
        write_snapshot(self.store.as_ref(), keys::SESSION, &record.snapshot())?;

        if was_authenticated {
            tracing::info!("User logged out");
        }
        Ok(())
    }

    /// Replace the profile, keeping the credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn update_user(&self, user: UserProfile) -> Result<(), StorageError> {
        let mut record = self.write_record();
        let user_id = user.id;

        record.set_user(Some(user));
        write_snapshot(self.store.as_ref(), keys::SESSION, &record.snapshot())?;

        tracing::debug!(user_id = user_id.as_i64(), "User profile updated");
        Ok(())
    }

    /// Whether a credential is held in memory.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read_record().is_authenticated()
    }

    /// The in-memory profile.
    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.read_record().user().cloned()
    }

    /// The in-memory credential.
    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        self.read_record().credential().cloned()
    }

    /// A copy of the whole in-memory record.
    #[must_use]
    pub fn record(&self) -> SessionRecord {
        self.read_record().clone()
    }

    fn read_record(&self) -> SessionRecord {
        self.record
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write_record(&self) -> RwLockWriteGuard<'_, SessionRecord> {
        self.record.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
