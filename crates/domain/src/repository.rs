//! Event-sourced repository bridging aggregate roots and the event store.
//!
//! `get_by_id` replays a stream into a fresh root; `save` appends the
//! root's staged events under the caller's concurrency expectation and
//! publishes each persisted event on the bus. The repository is the only
//! place domain events cross between their typed form and the store's
//! serialized form.

use std::marker::PhantomData;
use std::sync::Arc;

use bus::MessageBus;

use common::{AggregateId, Version};
use event_store::{EventData, EventStore, ExpectedVersion};

use crate::aggregate::{Aggregate, AggregateRoot, DomainEvent};
use crate::error::DomainError;

/// A persisted domain event together with its stream position, as
/// published to subscribers.
///
/// The payload alone does not know where it landed; the envelope adds the
/// aggregate identifier and the store-assigned version so read models can
/// track their watermark.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedEvent<E> {
    pub aggregate_id: AggregateId,
    pub version: Version,
    pub event: E,
}

impl<E: DomainEvent> bus::Event for CommittedEvent<E> {
    fn aggregate_id(&self) -> AggregateId {
        self.aggregate_id
    }

    fn version(&self) -> Version {
        self.version
    }
}

/// Loads aggregate roots from an event store and saves their staged
/// events back, publishing what was persisted.
pub struct Repository<A: Aggregate, S: EventStore> {
    store: S,
    bus: Arc<MessageBus<DomainError>>,
    _aggregate: PhantomData<A>,
}

impl<A: Aggregate, S: EventStore> Repository<A, S> {
    pub fn new(store: S, bus: Arc<MessageBus<DomainError>>) -> Self {
        Self {
            store,
            bus,
            _aggregate: PhantomData,
        }
    }

    /// Rebuilds an aggregate root by replaying its full history.
    ///
    /// Fails with `AggregateNotFound` for an identifier that has no
    /// stream, and with `InvalidState` if the stored history violates the
    /// aggregate's current invariants.
    #[tracing::instrument(skip(self), fields(aggregate = A::aggregate_type()))]
    pub async fn get_by_id(
        &self,
        aggregate_id: AggregateId,
    ) -> Result<AggregateRoot<A>, DomainError> {
        let records = self.store.events_for_aggregate(aggregate_id).await?;

        let mut history = Vec::with_capacity(records.len());
        for record in &records {
            history.push(record.decode::<A::Event>()?);
        }

        let mut root = AggregateRoot::new();
        root.load_from_history(history)?;

        tracing::debug!(
            %aggregate_id,
            version = %root.version(),
            events = records.len(),
            "aggregate replayed"
        );
        Ok(root)
    }

    /// Persists the root's staged events under `expected`, then publishes
    /// each one as a [`CommittedEvent`].
    ///
    /// On success the staged list is cleared and the root's version
    /// advances past the persisted batch. With nothing staged this is a
    /// no-op that touches neither the store nor the bus. On a concurrency
    /// conflict nothing is persisted or published and the root keeps its
    /// staged events.
    #[tracing::instrument(skip(self, root), fields(aggregate = A::aggregate_type()))]
    pub async fn save(
        &self,
        root: &mut AggregateRoot<A>,
        expected: ExpectedVersion,
    ) -> Result<(), DomainError> {
        if root.uncommitted_changes().is_empty() {
            return Ok(());
        }
        let aggregate_id = root.id().ok_or(DomainError::UnidentifiedAggregate)?;

        let mut batch = Vec::with_capacity(root.uncommitted_changes().len());
        for event in root.uncommitted_changes() {
            batch.push(EventData::encode(event.event_type(), event)?);
        }

        let records = self.store.append_events(aggregate_id, batch, expected).await?;

        for (record, event) in records.iter().zip(root.uncommitted_changes()) {
            self.bus.publish(CommittedEvent {
                aggregate_id,
                version: record.version,
                event: event.clone(),
            });
        }

        if let Some(last) = records.last() {
            root.set_version(last.version);
        }
        root.mark_changes_as_committed();

        tracing::debug!(
            %aggregate_id,
            version = %root.version(),
            appended = records.len(),
            "aggregate saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use tokio::sync::mpsc;

    use bus::EventSubscriber;
    use event_store::{EventStoreError, InMemoryEventStore};

    use crate::aggregate::InvalidEntityState;
    use crate::inventory::{InventoryEvent, InventoryItem};

    fn repository(
        store: InMemoryEventStore,
    ) -> (
        Repository<InventoryItem, InMemoryEventStore>,
        Arc<MessageBus<DomainError>>,
    ) {
        let bus = Arc::new(MessageBus::new());
        (Repository::new(store, Arc::clone(&bus)), bus)
    }

    /// Forwards every committed event into a channel for assertions.
    struct Probe {
        tx: mpsc::UnboundedSender<CommittedEvent<InventoryEvent>>,
    }

    #[async_trait]
    impl EventSubscriber<CommittedEvent<InventoryEvent>> for Probe {
        type Error = std::convert::Infallible;

        async fn handle(
            &self,
            event: CommittedEvent<InventoryEvent>,
        ) -> Result<(), Self::Error> {
            let _ = self.tx.send(event);
            Ok(())
        }
    }

    #[tokio::test]
    async fn save_then_get_by_id_round_trips_the_aggregate() {
        let (repo, _bus) = repository(InMemoryEventStore::new());
        let id = AggregateId::new();

        let mut item = AggregateRoot::<InventoryItem>::create(id, "Widget").unwrap();
        item.check_in(25).unwrap();
        repo.save(&mut item, ExpectedVersion::Any).await.unwrap();

        assert!(item.uncommitted_changes().is_empty());
        assert_eq!(item.version(), Version::new(2));

        let loaded = repo.get_by_id(id).await.unwrap();
        assert_eq!(loaded.id(), Some(id));
        assert_eq!(loaded.state().name(), "Widget");
        assert_eq!(loaded.state().quantity(), 25);
        assert_eq!(loaded.version(), Version::new(2));
    }

    #[tokio::test]
    async fn get_by_id_propagates_missing_streams() {
        let (repo, _bus) = repository(InMemoryEventStore::new());

        let err = repo.get_by_id(AggregateId::new()).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::EventStore(EventStoreError::AggregateNotFound(_))
        ));
    }

    #[tokio::test]
    async fn save_surfaces_concurrency_conflicts_and_keeps_changes() {
        let store = InMemoryEventStore::new();
        let (repo, _bus) = repository(store.clone());
        let id = AggregateId::new();

        let mut item = AggregateRoot::<InventoryItem>::create(id, "Widget").unwrap();
        repo.save(&mut item, ExpectedVersion::Any).await.unwrap();

        // A competing writer moves the stream to version 2.
        let mut winner = repo.get_by_id(id).await.unwrap();
        winner.check_in(5).unwrap();
        repo.save(&mut winner, ExpectedVersion::Exact(Version::first()))
            .await
            .unwrap();

        // The loser still expects version 1.
        let mut loser = AggregateRoot::<InventoryItem>::new();
        loser
            .load_from_history(vec![InventoryEvent::Created {
                id,
                name: "Widget".to_string(),
            }])
            .unwrap();
        loser.check_in(3).unwrap();
        let err = repo
            .save(&mut loser, ExpectedVersion::Exact(Version::first()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::EventStore(EventStoreError::ConcurrencyConflict { .. })
        ));
        assert_eq!(loser.uncommitted_changes().len(), 1);
        assert_eq!(store.event_count().await, 2);
    }

    #[tokio::test]
    async fn save_publishes_each_persisted_event_with_its_version() {
        let (repo, bus) = repository(InMemoryEventStore::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        bus.subscribe::<CommittedEvent<InventoryEvent>, _>(Probe { tx });

        let id = AggregateId::new();
        let mut item = AggregateRoot::<InventoryItem>::create(id, "Widget").unwrap();
        item.check_in(10).unwrap();
        repo.save(&mut item, ExpectedVersion::Any).await.unwrap();

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        let mut versions = vec![first.version, second.version];
        versions.sort();
        assert_eq!(versions, vec![Version::new(1), Version::new(2)]);
        assert_eq!(first.aggregate_id, id);
        assert_eq!(second.aggregate_id, id);
    }

    #[tokio::test]
    async fn save_with_nothing_staged_is_a_no_op() {
        let store = InMemoryEventStore::new();
        let (repo, _bus) = repository(store.clone());

        let mut item = AggregateRoot::<InventoryItem>::new();
        repo.save(&mut item, ExpectedVersion::Any).await.unwrap();

        assert_eq!(store.event_count().await, 0);
    }

    /// Aggregate whose invariants never require an identifier, so staged
    /// changes can exist on a root that has no identity yet.
    #[derive(Debug, Default)]
    struct Notepad {
        id: Option<AggregateId>,
        notes: Vec<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    enum NoteEvent {
        Jotted { text: String },
    }

    impl DomainEvent for NoteEvent {
        fn event_type(&self) -> &'static str {
            "NoteJotted"
        }
    }

    impl Aggregate for Notepad {
        type Event = NoteEvent;

        fn aggregate_type() -> &'static str {
            "Notepad"
        }

        fn id(&self) -> Option<AggregateId> {
            self.id
        }

        fn apply(&mut self, event: &NoteEvent) {
            match event {
                NoteEvent::Jotted { text } => self.notes.push(text.clone()),
            }
        }

        fn ensure_valid(&self) -> Result<(), InvalidEntityState> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn save_without_an_identity_is_rejected() {
        let bus = Arc::new(MessageBus::new());
        let repo: Repository<Notepad, InMemoryEventStore> =
            Repository::new(InMemoryEventStore::new(), bus);

        let mut root = AggregateRoot::<Notepad>::new();
        root.apply_change(NoteEvent::Jotted {
            text: "unfiled".to_string(),
        })
        .unwrap();

        let err = repo.save(&mut root, ExpectedVersion::Any).await.unwrap_err();
        assert!(matches!(err, DomainError::UnidentifiedAggregate));
    }
}
