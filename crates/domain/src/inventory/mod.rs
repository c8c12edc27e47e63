//! Inventory-item aggregate, its commands, and their handlers.

mod aggregate;
mod commands;
mod events;
mod handlers;

pub use aggregate::InventoryItem;
pub use commands::{
    CheckInItemsToInventory, CreateInventoryItem, DeactivateInventoryItem,
    RemoveItemsFromInventory, RenameInventoryItem,
};
pub use events::InventoryEvent;
pub use handlers::InventoryCommandHandlers;

use thiserror::Error;

/// Business-rule rejections raised by inventory-item command methods.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// The new name of a rename is empty.
    #[error("new name cannot be blank")]
    BlankName,

    /// Check-in asked for zero or fewer items.
    #[error("check-in count must be greater than zero (got {count})")]
    NonPositiveCheckIn { count: i64 },

    /// Removal asked for zero or fewer items.
    #[error("removal count must be greater than zero (got {count})")]
    NonPositiveRemoval { count: i64 },

    /// Deactivation of an item that is already inactive.
    #[error("already deactivated")]
    AlreadyDeactivated,
}
