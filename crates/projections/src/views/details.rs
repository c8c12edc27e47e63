//! Inventory detail view: per-item name, count, and version watermark.

use async_trait::async_trait;

use bus::EventSubscriber;
use domain::{CommittedEvent, InventoryEvent};

use crate::Result;
use crate::error::ProjectionError;
use crate::read_model::{InventoryItemDetails, ReadModelStore};

/// Maintains the full detail record for every active inventory item.
///
/// Unlike the list view, an update for an item without a detail record is
/// an error: every stream starts with a creation event, so a missing
/// record means this view never received it.
#[derive(Clone)]
pub struct InventoryItemDetailView {
    store: ReadModelStore,
}

impl InventoryItemDetailView {
    pub fn new(store: ReadModelStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EventSubscriber<CommittedEvent<InventoryEvent>> for InventoryItemDetailView {
    type Error = ProjectionError;

    async fn handle(&self, event: CommittedEvent<InventoryEvent>) -> Result<()> {
        let version = event.version;
        match &event.event {
            InventoryEvent::Created { id, name } => {
                self.store
                    .insert_details(InventoryItemDetails {
                        id: *id,
                        name: name.clone(),
                        current_count: 0,
                        version,
                    })
                    .await;
            }
            InventoryEvent::Renamed { new_name } => {
                self.store
                    .update_details(event.aggregate_id, |d| {
                        d.name = new_name.clone();
                        d.version = version;
                    })
                    .await?;
            }
            InventoryEvent::CheckedIn { count } => {
                self.store
                    .update_details(event.aggregate_id, |d| {
                        d.current_count += count;
                        d.version = version;
                    })
                    .await?;
            }
            InventoryEvent::Removed { count } => {
                self.store
                    .update_details(event.aggregate_id, |d| {
                        d.current_count -= count;
                        d.version = version;
                    })
                    .await?;
            }
            InventoryEvent::Deactivated => {
                self.store.remove_details(event.aggregate_id).await;
            }
        }

        metrics::counter!("read_model_events_applied_total").increment(1);
        tracing::debug!(
            aggregate_id = %event.aggregate_id,
            version = %event.version,
            "detail view updated"
        );
        Ok(())
    }
}
