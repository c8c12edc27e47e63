//! Domain layer of the event-sourcing engine.
//!
//! [`AggregateRoot`] wraps an [`Aggregate`]'s projected state together
//! with its uncommitted changes; [`Repository`] replays and persists
//! roots against an event store and publishes what it persisted; the
//! `inventory` module holds the inventory-item aggregate, its commands,
//! and their handlers.

pub mod aggregate;
pub mod error;
pub mod inventory;
pub mod repository;

pub use aggregate::{Aggregate, AggregateRoot, DomainEvent, InvalidEntityState};
pub use error::DomainError;
pub use inventory::{
    CheckInItemsToInventory, CreateInventoryItem, DeactivateInventoryItem,
    InventoryCommandHandlers, InventoryError, InventoryEvent, InventoryItem,
    RemoveItemsFromInventory, RenameInventoryItem,
};
pub use repository::{CommittedEvent, Repository};
