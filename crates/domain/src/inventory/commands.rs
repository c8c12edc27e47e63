//! Inventory-item commands.
//!
//! Every command targeting an existing item carries the stream version the
//! sender last observed; the handler turns it into the optimistic
//! concurrency expectation for the save. `CreateInventoryItem` carries no
//! version because it starts the stream.

use bus::Command;
use common::{AggregateId, Version};

/// Command to add a new item to the catalog.
#[derive(Debug, Clone)]
pub struct CreateInventoryItem {
    /// Identifier the new item's stream will use.
    pub inventory_item_id: AggregateId,

    /// Initial display name.
    pub name: String,
}

impl CreateInventoryItem {
    pub fn new(inventory_item_id: AggregateId, name: impl Into<String>) -> Self {
        Self {
            inventory_item_id,
            name: name.into(),
        }
    }
}

impl Command for CreateInventoryItem {
    fn aggregate_id(&self) -> AggregateId {
        self.inventory_item_id
    }
}

/// Command to change an item's display name.
#[derive(Debug, Clone)]
pub struct RenameInventoryItem {
    /// The item to rename.
    pub inventory_item_id: AggregateId,

    /// The new display name.
    pub new_name: String,

    /// Stream version the sender last observed.
    pub original_version: Version,
}

impl RenameInventoryItem {
    pub fn new(
        inventory_item_id: AggregateId,
        new_name: impl Into<String>,
        original_version: Version,
    ) -> Self {
        Self {
            inventory_item_id,
            new_name: new_name.into(),
            original_version,
        }
    }
}

impl Command for RenameInventoryItem {
    fn aggregate_id(&self) -> AggregateId {
        self.inventory_item_id
    }

    fn original_version(&self) -> Option<Version> {
        Some(self.original_version)
    }
}

/// Command to record stock arriving.
#[derive(Debug, Clone)]
pub struct CheckInItemsToInventory {
    /// The item receiving stock.
    pub inventory_item_id: AggregateId,

    /// Number of items arriving.
    pub count: i64,

    /// Stream version the sender last observed.
    pub original_version: Version,
}

impl CheckInItemsToInventory {
    pub fn new(inventory_item_id: AggregateId, count: i64, original_version: Version) -> Self {
        Self {
            inventory_item_id,
            count,
            original_version,
        }
    }
}

impl Command for CheckInItemsToInventory {
    fn aggregate_id(&self) -> AggregateId {
        self.inventory_item_id
    }

    fn original_version(&self) -> Option<Version> {
        Some(self.original_version)
    }
}

/// Command to record stock leaving.
#[derive(Debug, Clone)]
pub struct RemoveItemsFromInventory {
    /// The item losing stock.
    pub inventory_item_id: AggregateId,

    /// Number of items leaving.
    pub count: i64,

    /// Stream version the sender last observed.
    pub original_version: Version,
}

impl RemoveItemsFromInventory {
    pub fn new(inventory_item_id: AggregateId, count: i64, original_version: Version) -> Self {
        Self {
            inventory_item_id,
            count,
            original_version,
        }
    }
}

impl Command for RemoveItemsFromInventory {
    fn aggregate_id(&self) -> AggregateId {
        self.inventory_item_id
    }

    fn original_version(&self) -> Option<Version> {
        Some(self.original_version)
    }
}

/// Command to retire an item from the catalog.
#[derive(Debug, Clone)]
pub struct DeactivateInventoryItem {
    /// The item to retire.
    pub inventory_item_id: AggregateId,

    /// Stream version the sender last observed.
    pub original_version: Version,
}

impl DeactivateInventoryItem {
    pub fn new(inventory_item_id: AggregateId, original_version: Version) -> Self {
        Self {
            inventory_item_id,
            original_version,
        }
    }
}

impl Command for DeactivateInventoryItem {
    fn aggregate_id(&self) -> AggregateId {
        self.inventory_item_id
    }

    fn original_version(&self) -> Option<Version> {
        Some(self.original_version)
    }
}
