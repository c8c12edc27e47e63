//! Append-only event storage with optimistic concurrency control.
//!
//! Callers hand the store version-less [`EventData`] records; the store
//! assigns each one its position in the aggregate's stream and returns
//! [`RecordedEvent`]s. Append is the only mutation.

pub mod error;
pub mod event;
pub mod memory;
pub mod store;

pub use common::{AggregateId, Version};
pub use error::{EventStoreError, Result};
pub use event::{EventData, EventId, RecordedEvent};
pub use memory::InMemoryEventStore;
pub use store::{EventStore, ExpectedVersion};
