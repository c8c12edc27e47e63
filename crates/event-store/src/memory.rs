use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    AggregateId, EventData, EventStoreError, RecordedEvent, Result, Version,
    store::{EventStore, ExpectedVersion},
};

/// In-memory event store.
///
/// Streams live in a map keyed by aggregate identifier; each is an
/// append-only `Vec` in version order. Cloning the store clones the
/// handle, not the streams.
#[derive(Clone, Default)]
pub struct InMemoryEventStore {
    streams: Arc<RwLock<HashMap<AggregateId, Vec<RecordedEvent>>>>,
}

impl InMemoryEventStore {
    /// Creates a new empty in-memory event store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of events across all streams.
    pub async fn event_count(&self) -> usize {
        self.streams
            .read()
            .await
            .values()
            .map(|stream| stream.len())
            .sum()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append_events(
        &self,
        aggregate_id: AggregateId,
        events: Vec<EventData>,
        expected: ExpectedVersion,
    ) -> Result<Vec<RecordedEvent>> {
        if events.is_empty() {
            return Ok(Vec::new());
        }

        // The write guard spans the version check and the append; two
        // concurrent appends cannot both observe the same last version.
        let mut streams = self.streams.write().await;

        let (stream, mut version) = match streams.entry(aggregate_id) {
            Entry::Occupied(entry) => {
                let stream = entry.into_mut();
                let current = stream
                    .last()
                    .map(|record| record.version)
                    .unwrap_or(Version::initial());
                if let ExpectedVersion::Exact(expected) = expected
                    && current != expected
                {
                    metrics::counter!("event_store_concurrency_conflicts_total").increment(1);
                    return Err(EventStoreError::ConcurrencyConflict {
                        aggregate_id,
                        expected,
                        actual: current,
                    });
                }
                (stream, current)
            }
            // A fresh stream is created without a version check.
            Entry::Vacant(entry) => (entry.insert(Vec::new()), Version::initial()),
        };

        let occurred_at = Utc::now();
        let mut recorded = Vec::with_capacity(events.len());
        for event in events {
            version = version.next();
            let record = RecordedEvent {
                event_id: event.event_id,
                aggregate_id,
                event_type: event.event_type,
                version,
                occurred_at,
                payload: event.payload,
            };
            stream.push(record.clone());
            recorded.push(record);
        }

        tracing::debug!(
            %aggregate_id,
            appended = recorded.len(),
            version = %version,
            "events appended"
        );
        metrics::counter!("event_store_events_appended_total").increment(recorded.len() as u64);

        Ok(recorded)
    }

    async fn events_for_aggregate(&self, aggregate_id: AggregateId) -> Result<Vec<RecordedEvent>> {
        let streams = self.streams.read().await;
        streams
            .get(&aggregate_id)
            .cloned()
            .ok_or(EventStoreError::AggregateNotFound(aggregate_id))
    }
}
