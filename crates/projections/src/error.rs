//! Read-model error types.

use common::AggregateId;
use thiserror::Error;

/// Errors raised while folding published events into a read model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectionError {
    /// An update arrived for an item the view has no record of. Streams
    /// replay in order, so this means the item's creation event was never
    /// delivered to this view.
    #[error("read model has no entry for inventory item {id}")]
    MissingItem { id: AggregateId },
}

/// Result type for read-model operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
