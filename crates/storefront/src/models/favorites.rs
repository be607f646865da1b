//! Favorited catalog items.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use staybook_core::ItemId;

/// Insertion-ordered set of favorited item IDs.
///
/// Membership checks are O(1). Adding an ID that is already present is a
/// no-op, so the list never holds duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    order: Vec<ItemId>,
    members: HashSet<ItemId>,
}

impl FavoritesSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id`. Returns `false` if it was already present.
    pub fn insert(&mut self, id: ItemId) -> bool {
        if !self.members.insert(id.clone()) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Remove `id`. Returns `false` if it was not present.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        if !self.members.remove(id) {
            return false;
        }
        self.order.retain(|existing| existing != id);
        true
    }

    /// Whether `id` is a favorite.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.members.contains(id)
    }

    /// Drop every favorite.
    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    /// Favorites in the order they were added.
    #[must_use]
    pub fn as_slice(&self) -> &[ItemId] {
        &self.order
    }

    /// Number of favorites.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether there are no favorites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl FromIterator<ItemId> for FavoritesSet {
    fn from_iter<I: IntoIterator<Item = ItemId>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// Persisted form of the favorites, inside the snapshot envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritesState {
    /// Item IDs in insertion order.
    #[serde(default)]
    pub favorites: Vec<ItemId>,
}

impl From<&FavoritesSet> for FavoritesState {
    fn from(set: &FavoritesSet) -> Self {
        Self {
            favorites: set.as_slice().to_vec(),
        }
    }
}

impl From<FavoritesState> for FavoritesSet {
    fn from(state: FavoritesState) -> Self {
        state.favorites.into_iter().collect()
    }
}
