use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{AggregateId, Version};

/// Unique identifier for a single recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EventId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<EventId> for Uuid {
    fn from(id: EventId) -> Self {
        id.0
    }
}

/// A serialized event as handed to the store.
///
/// Carries no version: the store assigns positions at append time. The
/// event identity is fixed by the caller when the event is produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventData {
    pub event_id: EventId,
    pub event_type: String,
    pub payload: serde_json::Value,
}

impl EventData {
    pub fn new(event_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            event_id: EventId::new(),
            event_type: event_type.into(),
            payload,
        }
    }

    /// Serializes a typed event into store form.
    pub fn encode<T: Serialize>(
        event_type: impl Into<String>,
        event: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(event_type, serde_json::to_value(event)?))
    }
}

/// A persisted event as read back from a stream.
///
/// `version` is the event's position within its aggregate's stream,
/// assigned by the store; `occurred_at` is the append timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub event_id: EventId,
    pub aggregate_id: AggregateId,
    pub event_type: String,
    pub version: Version,
    pub occurred_at: DateTime<Utc>,
    pub payload: serde_json::Value,
}

impl RecordedEvent {
    /// Deserializes the payload back into a typed event.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Shipped {
        order: String,
        crates: i64,
    }

    #[test]
    fn event_id_new_creates_unique_ids() {
        let id1 = EventId::new();
        let id2 = EventId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn encode_then_decode_preserves_the_payload() {
        let shipped = Shipped {
            order: "A-17".to_string(),
            crates: 3,
        };
        let data = EventData::encode("Shipped", &shipped).unwrap();
        assert_eq!(data.event_type, "Shipped");

        let record = RecordedEvent {
            event_id: data.event_id,
            aggregate_id: AggregateId::new(),
            event_type: data.event_type,
            version: Version::first(),
            occurred_at: Utc::now(),
            payload: data.payload,
        };
        assert_eq!(record.decode::<Shipped>().unwrap(), shipped);
    }

    #[test]
    fn decode_fails_on_mismatched_payload() {
        let record = RecordedEvent {
            event_id: EventId::new(),
            aggregate_id: AggregateId::new(),
            event_type: "Shipped".to_string(),
            version: Version::first(),
            occurred_at: Utc::now(),
            payload: serde_json::json!({"unexpected": true}),
        };
        assert!(record.decode::<Shipped>().is_err());
    }
}
