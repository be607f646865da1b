//! Favorites commands.

use std::sync::Arc;

use staybook_core::ItemId;
use staybook_storefront::services::PreferenceStore;
use staybook_storefront::storage::KeyValueStore;

use super::CliError;

/// Mark an item as a favorite.
pub fn add(store: Arc<dyn KeyValueStore>, id: &str) -> Result<String, CliError> {
    PreferenceStore::hydrate(store).add_favorite(ItemId::new(id))?;
    Ok(format!("Added {id}"))
}

/// Unmark an item.
pub fn remove(store: Arc<dyn KeyValueStore>, id: &str) -> Result<String, CliError> {
    PreferenceStore::hydrate(store).remove_favorite(&ItemId::new(id))?;
    Ok(format!("Removed {id}"))
}

/// Flip an item's favorite state.
pub fn toggle(store: Arc<dyn KeyValueStore>, id: &str) -> Result<String, CliError> {
    let now_favorite = PreferenceStore::hydrate(store).toggle_favorite(ItemId::new(id))?;
    Ok(if now_favorite {
        format!("Added {id}")
    } else {
        format!("Removed {id}")
    })
}

/// Report whether an item is a favorite.
pub fn check(store: Arc<dyn KeyValueStore>, id: &str) -> String {
    PreferenceStore::hydrate(store)
        .is_favorite(&ItemId::new(id))
        .to_string()
}

/// One favorite per line, oldest first.
pub fn list(store: Arc<dyn KeyValueStore>) -> String {
    PreferenceStore::hydrate(store)
        .favorites()
        .iter()
        .map(ItemId::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove every favorite.
pub fn clear(store: Arc<dyn KeyValueStore>) -> Result<String, CliError> {
    PreferenceStore::hydrate(store).clear_favorites()?;
    Ok("Cleared favorites".to_string())
}
