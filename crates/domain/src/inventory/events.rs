//! Inventory-item domain events.

use std::fmt;

use serde::{Deserialize, Serialize};

use common::AggregateId;

use crate::aggregate::DomainEvent;

/// Events emitted by the inventory-item aggregate.
///
/// Only `Created` carries the aggregate identifier; every other event is
/// positioned by the stream it is stored in. The serde renames keep the
/// wire names stable regardless of the Rust variant names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InventoryEvent {
    /// A new item entered the catalog.
    #[serde(rename = "InventoryItemCreated")]
    Created { id: AggregateId, name: String },

    /// The item's display name changed.
    #[serde(rename = "InventoryItemRenamed")]
    Renamed { new_name: String },

    /// Stock arrived.
    #[serde(rename = "ItemsCheckedInToInventory")]
    CheckedIn { count: i64 },

    /// Stock left.
    #[serde(rename = "ItemsRemovedFromInventory")]
    Removed { count: i64 },

    /// The item was retired from the catalog.
    #[serde(rename = "InventoryItemDeactivated")]
    Deactivated,
}

impl DomainEvent for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::Created { .. } => "InventoryItemCreated",
            InventoryEvent::Renamed { .. } => "InventoryItemRenamed",
            InventoryEvent::CheckedIn { .. } => "ItemsCheckedInToInventory",
            InventoryEvent::Removed { .. } => "ItemsRemovedFromInventory",
            InventoryEvent::Deactivated => "InventoryItemDeactivated",
        }
    }
}

impl fmt::Display for InventoryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryEvent::Created { id, name } => {
                write!(f, "inventory item {id} created with name {name:?}")
            }
            InventoryEvent::Renamed { new_name } => write!(f, "renamed to {new_name:?}"),
            InventoryEvent::CheckedIn { count } => write!(f, "{count} items checked in"),
            InventoryEvent::Removed { count } => write!(f, "{count} items removed"),
            InventoryEvent::Deactivated => write!(f, "deactivated"),
        }
    }
}
