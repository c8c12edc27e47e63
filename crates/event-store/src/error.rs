use thiserror::Error;

use crate::{AggregateId, Version};

/// Errors that can occur when interacting with the event store.
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// The expected version did not match the stream's actual version.
    /// The caller lost an optimistic-concurrency race and should reload
    /// and retry.
    #[error(
        "concurrency conflict for aggregate {aggregate_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        aggregate_id: AggregateId,
        expected: Version,
        actual: Version,
    },

    /// No stream exists for the aggregate.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(AggregateId),
}

/// Result type for event store operations.
pub type Result<T> = std::result::Result<T, EventStoreError>;
