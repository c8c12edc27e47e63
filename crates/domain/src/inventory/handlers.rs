//! Command handlers for the inventory-item aggregate.
//!
//! One struct handles all five commands against a shared repository. Each
//! handler follows the same load-mutate-save cycle; the command's reported
//! original version becomes the save's concurrency expectation, so a stale
//! sender is rejected by the store rather than silently overwritten.

use std::sync::Arc;

use async_trait::async_trait;

use bus::{Command, CommandHandler, HandlerAlreadyRegistered, MessageBus};
use event_store::{EventStore, ExpectedVersion};

use crate::aggregate::AggregateRoot;
use crate::error::DomainError;
use crate::repository::Repository;

use super::{
    CheckInItemsToInventory, CreateInventoryItem, DeactivateInventoryItem, InventoryItem,
    RemoveItemsFromInventory, RenameInventoryItem,
};

/// Handler set for every inventory command, sharing one repository.
pub struct InventoryCommandHandlers<S: EventStore> {
    repository: Arc<Repository<InventoryItem, S>>,
}

impl<S: EventStore> InventoryCommandHandlers<S> {
    pub fn new(repository: Arc<Repository<InventoryItem, S>>) -> Self {
        Self { repository }
    }
}

impl<S: EventStore> Clone for InventoryCommandHandlers<S> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<S: EventStore + 'static> InventoryCommandHandlers<S> {
    /// Registers this handler set for each inventory command type.
    ///
    /// Fails if any of the command types already has a handler; the bus
    /// allows only one per type.
    pub fn register_all(
        self,
        bus: &MessageBus<DomainError>,
    ) -> Result<(), HandlerAlreadyRegistered> {
        bus.register_handler::<CreateInventoryItem, _>(self.clone())?;
        bus.register_handler::<RenameInventoryItem, _>(self.clone())?;
        bus.register_handler::<CheckInItemsToInventory, _>(self.clone())?;
        bus.register_handler::<RemoveItemsFromInventory, _>(self.clone())?;
        bus.register_handler::<DeactivateInventoryItem, _>(self)?;
        Ok(())
    }
}

#[async_trait]
impl<S: EventStore> CommandHandler<CreateInventoryItem> for InventoryCommandHandlers<S> {
    type Error = DomainError;

    async fn handle(&self, command: CreateInventoryItem) -> Result<(), DomainError> {
        let expected = ExpectedVersion::from_original(command.original_version());
        let mut item = AggregateRoot::create(command.inventory_item_id, command.name)?;
        self.repository.save(&mut item, expected).await
    }
}

#[async_trait]
impl<S: EventStore> CommandHandler<RenameInventoryItem> for InventoryCommandHandlers<S> {
    type Error = DomainError;

    async fn handle(&self, command: RenameInventoryItem) -> Result<(), DomainError> {
        let expected = ExpectedVersion::from_original(command.original_version());
        let mut item = self.repository.get_by_id(command.inventory_item_id).await?;
        item.rename(command.new_name)?;
        self.repository.save(&mut item, expected).await
    }
}

#[async_trait]
impl<S: EventStore> CommandHandler<CheckInItemsToInventory> for InventoryCommandHandlers<S> {
    type Error = DomainError;

    async fn handle(&self, command: CheckInItemsToInventory) -> Result<(), DomainError> {
        let expected = ExpectedVersion::from_original(command.original_version());
        let mut item = self.repository.get_by_id(command.inventory_item_id).await?;
        item.check_in(command.count)?;
        self.repository.save(&mut item, expected).await
    }
}

#[async_trait]
impl<S: EventStore> CommandHandler<RemoveItemsFromInventory> for InventoryCommandHandlers<S> {
    type Error = DomainError;

    async fn handle(&self, command: RemoveItemsFromInventory) -> Result<(), DomainError> {
        let expected = ExpectedVersion::from_original(command.original_version());
        let mut item = self.repository.get_by_id(command.inventory_item_id).await?;
        item.remove(command.count)?;
        self.repository.save(&mut item, expected).await
    }
}

#[async_trait]
impl<S: EventStore> CommandHandler<DeactivateInventoryItem> for InventoryCommandHandlers<S> {
    type Error = DomainError;

    async fn handle(&self, command: DeactivateInventoryItem) -> Result<(), DomainError> {
        let expected = ExpectedVersion::from_original(command.original_version());
        let mut item = self.repository.get_by_id(command.inventory_item_id).await?;
        item.deactivate()?;
        self.repository.save(&mut item, expected).await
    }
}
