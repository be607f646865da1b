//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::StorefrontConfig;
use crate::services::{AdmissionGuard, PreferenceStore, SessionStore};
use crate::storage::{FileStore, KeyValueStore, StorageError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The session store, the
/// preference store and the admission guard all share one durable store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    session: SessionStore,
    preferences: PreferenceStore,
    guard: AdmissionGuard,
    api: ApiClient,
}

impl AppState {
    /// Build state over an existing durable store, hydrating both stores
    /// from it.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let api = ApiClient::new(&config.api_url);

        Self {
            inner: Arc::new(AppStateInner {
                session: SessionStore::hydrate(store.clone()),
                preferences: PreferenceStore::hydrate(store.clone()),
                guard: AdmissionGuard::new(store),
                api,
                config,
            }),
        }
    }

    /// Build state over the file store named in the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the store file exists but cannot be loaded.
    pub fn open(config: StorefrontConfig) -> Result<Self, StorageError> {
        let store = FileStore::open(&config.store_path)?;
        Ok(Self::new(config, Arc::new(store)))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Get a reference to the favorites store.
    #[must_use]
    pub fn preferences(&self) -> &PreferenceStore {
        &self.inner.preferences
    }

    /// Get a reference to the route admission guard.
    #[must_use]
    pub fn guard(&self) -> &AdmissionGuard {
        &self.inner.guard
    }

    /// Get a reference to the booking API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }
}
