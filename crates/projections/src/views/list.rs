//! Inventory list view: id/name rows for item pickers.

use async_trait::async_trait;

use bus::EventSubscriber;
use domain::{CommittedEvent, InventoryEvent};

use crate::Result;
use crate::error::ProjectionError;
use crate::read_model::{InventoryItemListEntry, ReadModelStore};

/// Maintains the flat list of active inventory items.
///
/// Quantity movements never touch this view, and a rename for an id that
/// is not listed is ignored rather than treated as an error, so the list
/// stays usable even when wired up after some items already existed.
#[derive(Clone)]
pub struct InventoryListView {
    store: ReadModelStore,
}

impl InventoryListView {
    pub fn new(store: ReadModelStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EventSubscriber<CommittedEvent<InventoryEvent>> for InventoryListView {
    type Error = ProjectionError;

    async fn handle(&self, event: CommittedEvent<InventoryEvent>) -> Result<()> {
        match &event.event {
            InventoryEvent::Created { id, name } => {
                self.store
                    .add_list_entry(InventoryItemListEntry {
                        id: *id,
                        name: name.clone(),
                    })
                    .await;
            }
            InventoryEvent::Renamed { new_name } => {
                self.store
                    .rename_list_entry(event.aggregate_id, new_name)
                    .await;
            }
            InventoryEvent::Deactivated => {
                self.store.remove_list_entry(event.aggregate_id).await;
            }
            // Quantity movements are the detail view's concern.
            InventoryEvent::CheckedIn { .. } | InventoryEvent::Removed { .. } => return Ok(()),
        }

        metrics::counter!("read_model_events_applied_total").increment(1);
        tracing::debug!(
            aggregate_id = %event.aggregate_id,
            version = %event.version,
            "list view updated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{AggregateId, Version};

    fn committed(
        aggregate_id: AggregateId,
        version: i64,
        event: InventoryEvent,
    ) -> CommittedEvent<InventoryEvent> {
        CommittedEvent {
            aggregate_id,
            version: Version::new(version),
            event,
        }
    }

    fn created(id: AggregateId, name: &str) -> CommittedEvent<InventoryEvent> {
        committed(
            id,
            1,
            InventoryEvent::Created {
                id,
                name: name.to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_created_items_appear_in_the_list() {
        let store = ReadModelStore::new();
        let view = InventoryListView::new(store.clone());
        let id = AggregateId::new();

        view.handle(created(id, "Bolts")).await.unwrap();

        let list = store.list().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, id);
        assert_eq!(list[0].name, "Bolts");
    }

    #[tokio::test]
    async fn test_renamed_items_update_in_place() {
        let store = ReadModelStore::new();
        let view = InventoryListView::new(store.clone());
        let id = AggregateId::new();

        view.handle(created(id, "Bolts")).await.unwrap();
        view.handle(committed(
            id,
            2,
            InventoryEvent::Renamed {
                new_name: "Hex Bolts".to_string(),
            },
        ))
        .await
        .unwrap();

        let list = store.list().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Hex Bolts");
    }

    #[tokio::test]
    async fn test_rename_for_an_unlisted_item_is_ignored() {
        let store = ReadModelStore::new();
        let view = InventoryListView::new(store.clone());

        view.handle(committed(
            AggregateId::new(),
            2,
            InventoryEvent::Renamed {
                new_name: "Ghost".to_string(),
            },
        ))
        .await
        .unwrap();

        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_deactivated_items_drop_out() {
        let store = ReadModelStore::new();
        let view = InventoryListView::new(store.clone());
        let kept = AggregateId::new();
        let dropped = AggregateId::new();

        view.handle(created(kept, "Bolts")).await.unwrap();
        view.handle(created(dropped, "Nuts")).await.unwrap();
        view.handle(committed(dropped, 2, InventoryEvent::Deactivated))
            .await
            .unwrap();

        let list = store.list().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, kept);
    }

    #[tokio::test]
    async fn test_quantity_movements_leave_the_list_untouched() {
        let store = ReadModelStore::new();
        let view = InventoryListView::new(store.clone());
        let id = AggregateId::new();

        view.handle(created(id, "Bolts")).await.unwrap();
        view.handle(committed(id, 2, InventoryEvent::CheckedIn { count: 40 }))
            .await
            .unwrap();
        view.handle(committed(id, 3, InventoryEvent::Removed { count: 15 }))
            .await
            .unwrap();

        let list = store.list().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Bolts");
    }
}
