//! Domain error types.

use thiserror::Error;

use event_store::EventStoreError;

use crate::aggregate::InvalidEntityState;
use crate::inventory::InventoryError;

/// Errors surfaced by command handlers and the repository.
///
/// This is the handler-level umbrella: business-rule rejections,
/// invariant violations, and store failures all arrive at the command
/// sender under this one type, each recognizable by variant.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The event store rejected the operation, including optimistic
    /// concurrency conflicts and missing streams.
    #[error(transparent)]
    EventStore(#[from] EventStoreError),

    /// An applied event left the aggregate in an invalid state.
    #[error(transparent)]
    InvalidState(#[from] InvalidEntityState),

    /// An inventory-item business rule rejected the command.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// An event payload could not be encoded or decoded.
    #[error("event payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Save was attempted on an aggregate whose history never established
    /// an identifier.
    #[error("aggregate has no identifier: no event has set one")]
    UnidentifiedAggregate,
}
