//! Favorites store.
//!
//! Catalog pages read and write favorites directly; there is no admission
//! control. The full set is persisted under [`keys::FAVORITES`] after every
//! mutation. Other processes (the CLI) write the same key, so each mutation
//! starts from the stored set rather than the in-memory copy.

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use staybook_core::ItemId;

use crate::models::{FavoritesSet, FavoritesState};
use crate::storage::{KeyValueStore, StorageError, keys, read_snapshot, write_snapshot};

/// User preferences that survive restarts.
pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
    favorites: RwLock<FavoritesSet>,
}

impl PreferenceStore {
    /// Create an empty store without reading durable storage.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            favorites: RwLock::new(FavoritesSet::new()),
        }
    }

    /// Restore favorites from durable storage. Bad data hydrates empty.
    #[must_use]
    pub fn hydrate(store: Arc<dyn KeyValueStore>) -> Self {
        let favorites: FavoritesSet = read_snapshot::<FavoritesState>(store.as_ref(), keys::FAVORITES)
            .map(FavoritesSet::from)
            .unwrap_or_default();

        tracing::debug!(count = favorites.len(), "Favorites hydrated");

        Self {
            store,
            favorites: RwLock::new(favorites),
        }
    }

    /// Mark `id` as a favorite.
    ///
    /// # Errors
    ///
    /// Returns an error if the set cannot be persisted.
    pub fn add_favorite(&self, id: ItemId) -> Result<(), StorageError> {
        let mut favorites = self.reload();
        favorites.insert(id);
        self.persist(&favorites)
    }

    /// Unmark `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the set cannot be persisted.
    pub fn remove_favorite(&self, id: &ItemId) -> Result<(), StorageError> {
        let mut favorites = self.reload();
        favorites.remove(id);
        self.persist(&favorites)
    }

    /// Flip the favorite state of `id` and return the new state.
    ///
    /// # Errors
    ///
    /// Returns an error if the set cannot be persisted.
    pub fn toggle_favorite(&self, id: ItemId) -> Result<bool, StorageError> {
        let mut favorites = self.reload();
        let now_favorite = if favorites.contains(&id) {
            favorites.remove(&id);
            false
        } else {
            favorites.insert(id);
            true
        };
        self.persist(&favorites)?;
        Ok(now_favorite)
    }

    /// Whether `id` is a favorite.
    #[must_use]
    pub fn is_favorite(&self, id: &ItemId) -> bool {
        self.load().map_or_else(
            || {
                self.favorites
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .contains(id)
            },
            |stored| stored.contains(id),
        )
    }

    /// All favorites in insertion order.
    #[must_use]
    pub fn favorites(&self) -> Vec<ItemId> {
        self.load().map_or_else(
            || {
                self.favorites
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .as_slice()
                    .to_vec()
            },
            |stored| stored.as_slice().to_vec(),
        )
    }

    /// Drop every favorite.
    ///
    /// # Errors
    ///
    /// Returns an error if the empty set cannot be persisted.
    pub fn clear_favorites(&self) -> Result<(), StorageError> {
        let mut favorites = self.reload();
        favorites.clear();
        self.persist(&favorites)?;
        tracing::info!("Favorites cleared");
        Ok(())
    }

    fn persist(&self, favorites: &FavoritesSet) -> Result<(), StorageError> {
        write_snapshot(
            self.store.as_ref(),
            keys::FAVORITES,
            &FavoritesState::from(favorites),
        )
    }

    fn load(&self) -> Option<FavoritesSet> {
        read_snapshot::<FavoritesState>(self.store.as_ref(), keys::FAVORITES).map(FavoritesSet::from)
    }

    /// Take the write lock and replace the cached set with the stored one.
    fn reload(&self) -> RwLockWriteGuard<'_, FavoritesSet> {
        let mut favorites = self
            .favorites
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(stored) = self.load() {
            *favorites = stored;
        }
        favorites
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("favorites", &self.favorites())
            .finish_non_exhaustive()
    }
}
