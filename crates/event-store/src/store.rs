use async_trait::async_trait;

use crate::{AggregateId, EventData, RecordedEvent, Result, Version};

/// Optimistic concurrency expectation for an append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Append regardless of the stream's current version.
    Any,
    /// Append only if the last persisted event has exactly this version.
    Exact(Version),
}

impl ExpectedVersion {
    /// Expectation for a command-reported original version.
    ///
    /// Commands that target an existing aggregate carry the version the
    /// sender last observed; commands that create one carry nothing.
    pub fn from_original(original: Option<Version>) -> Self {
        match original {
            Some(version) => Self::Exact(version),
            None => Self::Any,
        }
    }
}

/// Core trait for event store implementations.
///
/// A store keeps one append-only stream per aggregate identifier.
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends a batch of events to the aggregate's stream.
    ///
    /// If no stream exists yet for the identifier one is created, with no
    /// version check. If a stream exists and `expected` is `Exact(v)`, the
    /// append fails with `ConcurrencyConflict` unless the last persisted
    /// event has version `v`. The check and the append are atomic: of two
    /// concurrent appends with the same expectation, exactly one wins.
    ///
    /// Each appended event is assigned the next sequential version and the
    /// append timestamp. An empty batch is a no-op that creates nothing.
    /// Returns the recorded events with their assigned versions.
    async fn append_events(
        &self,
        aggregate_id: AggregateId,
        events: Vec<EventData>,
        expected: ExpectedVersion,
    ) -> Result<Vec<RecordedEvent>>;

    /// Returns the full history for an aggregate, oldest first.
    ///
    /// Fails with `AggregateNotFound` if no stream exists for the
    /// identifier.
    async fn events_for_aggregate(&self, aggregate_id: AggregateId) -> Result<Vec<RecordedEvent>>;
}
