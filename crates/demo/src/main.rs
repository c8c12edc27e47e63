//! End-to-end walkthrough of the engine.
//!
//! Wires the store, bus, repository, command handlers, and both read
//! model views the way a host application would, then runs an inventory
//! item through its whole lifecycle: create, check in, remove, rename,
//! a rejected stale write, deactivation, and finally a dump of the raw
//! stream plus a replay straight from the event store.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use bus::MessageBus;
use common::{AggregateId, Version};
use domain::{
    CheckInItemsToInventory, CommittedEvent, CreateInventoryItem, DeactivateInventoryItem,
    DomainError, InventoryCommandHandlers, InventoryEvent, InventoryItem,
    RemoveItemsFromInventory, RenameInventoryItem, Repository,
};
use event_store::{EventStore, InMemoryEventStore};
use projections::{InventoryItemDetailView, InventoryListView, InventoryReadModel, ReadModelStore};

/// Events reach the views on spawned tasks; give them a beat to land
/// before querying or sending the next command.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

async fn print_read_models(read_model: &InventoryReadModel, ids: &[AggregateId]) {
    let list = read_model.list().await;
    tracing::info!(items = list.len(), "inventory list");
    for entry in &list {
        tracing::info!(id = %entry.id, name = %entry.name, "  list entry");
    }
    for &id in ids {
        match read_model.details(id).await {
            Some(details) => tracing::info!(
                id = %details.id,
                name = %details.name,
                count = details.current_count,
                version = %details.version,
                "  detail record"
            ),
            None => tracing::info!(%id, "  no detail record (deactivated or never created)"),
        }
    }
}

#[tokio::main]
async fn main() {
    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Wire the command side: bus, store, repository, handlers
    let bus: Arc<MessageBus<DomainError>> = Arc::new(MessageBus::new());
    let store = InMemoryEventStore::new();
    let repository = Arc::new(Repository::<InventoryItem, _>::new(
        store.clone(),
        Arc::clone(&bus),
    ));
    InventoryCommandHandlers::new(Arc::clone(&repository))
        .register_all(&bus)
        .expect("fresh bus has no handlers yet");

    // 3. Wire the query side: one shared store, both views, the facade
    let read_store = ReadModelStore::new();
    bus.subscribe::<CommittedEvent<InventoryEvent>, _>(InventoryItemDetailView::new(
        read_store.clone(),
    ));
    bus.subscribe::<CommittedEvent<InventoryEvent>, _>(InventoryListView::new(read_store.clone()));
    let read_model = InventoryReadModel::new(read_store);

    // 4. Walk an item through its lifecycle
    let bolts = AggregateId::new();
    tracing::info!(id = %bolts, "creating item");
    bus.send(CreateInventoryItem::new(bolts, "Bolts"))
        .await
        .expect("create");
    settle().await;

    tracing::info!("checking in 40");
    bus.send(CheckInItemsToInventory::new(bolts, 40, Version::new(1)))
        .await
        .expect("check in");
    settle().await;

    tracing::info!("removing 15");
    bus.send(RemoveItemsFromInventory::new(bolts, 15, Version::new(2)))
        .await
        .expect("remove");
    settle().await;

    tracing::info!("renaming to Hex Bolts");
    bus.send(RenameInventoryItem::new(bolts, "Hex Bolts", Version::new(3)))
        .await
        .expect("rename");
    settle().await;

    // 5. A stale writer still believes the stream is at version 2
    let err = bus
        .send(CheckInItemsToInventory::new(bolts, 5, Version::new(2)))
        .await
        .expect_err("stale write must be rejected");
    tracing::warn!(%err, "stale command rejected, sender must reload and retry");

    // 6. A second item that comes and goes
    let nuts = AggregateId::new();
    bus.send(CreateInventoryItem::new(nuts, "Nuts"))
        .await
        .expect("create");
    settle().await;
    bus.send(DeactivateInventoryItem::new(nuts, Version::new(1)))
        .await
        .expect("deactivate");
    settle().await;

    // 7. What the query side sees
    print_read_models(&read_model, &[bolts, nuts]).await;

    // 8. Read the surviving item's raw stream back, then rebuild it
    let history = store.events_for_aggregate(bolts).await.expect("history");
    for record in &history {
        let event: InventoryEvent = record.decode().expect("inventory payload");
        tracing::info!(version = %record.version, "{}", event);
    }
    let replayed = repository.get_by_id(bolts).await.expect("replay");
    tracing::info!(
        name = replayed.state().name(),
        quantity = replayed.state().quantity(),
        version = %replayed.version(),
        "replayed aggregate from its event stream"
    );
}
