//! Backing store and query facade for the inventory read models.
//!
//! The views write into one explicitly owned [`ReadModelStore`]; the
//! [`InventoryReadModel`] facade answers queries from it. Both sides hold
//! cheap clones of the same store, so there is no process-wide singleton
//! and tests can spin up as many isolated stores as they like.

use std::collections::HashMap;
use std::sync::Arc;

use common::{AggregateId, Version};
use tokio::sync::RwLock;

use crate::Result;
use crate::error::ProjectionError;

/// One row in the inventory list: just enough to populate a picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItemListEntry {
    pub id: AggregateId,
    pub name: String,
}

/// Full per-item record tracked by the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItemDetails {
    pub id: AggregateId,
    pub name: String,
    pub current_count: i64,
    /// Stream version of the last event folded in. Readers can compare
    /// this watermark against a command's reported version to judge
    /// staleness under eventual consistency.
    pub version: Version,
}

/// Denormalized storage shared by the views and the query facade.
///
/// Cloning is cheap and every clone sees the same data. List entries keep
/// insertion order; details are keyed by aggregate identifier.
#[derive(Clone, Default)]
pub struct ReadModelStore {
    list: Arc<RwLock<Vec<InventoryItemListEntry>>>,
    details: Arc<RwLock<HashMap<AggregateId, InventoryItemDetails>>>,
}

impl ReadModelStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // Query side (reached through the facade)

    pub(crate) async fn list(&self) -> Vec<InventoryItemListEntry> {
        self.list.read().await.clone()
    }

    pub(crate) async fn details(&self, id: AggregateId) -> Option<InventoryItemDetails> {
        self.details.read().await.get(&id).cloned()
    }

    // Write side (reached from the views)

    pub(crate) async fn add_list_entry(&self, entry: InventoryItemListEntry) {
        self.list.write().await.push(entry);
    }

    /// Renames a list entry. An unknown id is ignored: the list view
    /// tolerates renames for items it never saw created.
    pub(crate) async fn rename_list_entry(&self, id: AggregateId, new_name: &str) {
        if let Some(entry) = self.list.write().await.iter_mut().find(|e| e.id == id) {
            entry.name = new_name.to_string();
        }
    }

    pub(crate) async fn remove_list_entry(&self, id: AggregateId) {
        self.list.write().await.retain(|e| e.id != id);
    }

    pub(crate) async fn insert_details(&self, details: InventoryItemDetails) {
        self.details.write().await.insert(details.id, details);
    }

    /// Updates an existing detail record in place. Fails with
    /// [`ProjectionError::MissingItem`] if the record was never created.
    pub(crate) async fn update_details<F>(&self, id: AggregateId, update: F) -> Result<()>
    where
        F: FnOnce(&mut InventoryItemDetails),
    {
        let mut details = self.details.write().await;
        let record = details
            .get_mut(&id)
            .ok_or(ProjectionError::MissingItem { id })?;
        update(record);
        Ok(())
    }

    pub(crate) async fn remove_details(&self, id: AggregateId) {
        self.details.write().await.remove(&id);
    }
}

/// Query facade over the inventory read models.
///
/// This is the only read path collaborators get: queries never touch the
/// event store or the aggregates, and answers lag command completion until
/// the published events reach the views.
#[derive(Clone)]
pub struct InventoryReadModel {
    store: ReadModelStore,
}

impl InventoryReadModel {
    pub fn new(store: ReadModelStore) -> Self {
        Self { store }
    }

    /// All active inventory items, in creation order.
    pub async fn list(&self) -> Vec<InventoryItemListEntry> {
        self.store.list().await
    }

    /// Detail record for one item, or `None` if it was never created or
    /// has been deactivated.
    pub async fn details(&self, id: AggregateId) -> Option<InventoryItemDetails> {
        self.store.details(id).await
    }
}
