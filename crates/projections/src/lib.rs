//! Read models for the CQRS query side.
//!
//! This crate is the query side of the engine:
//! - [`ReadModelStore`] holds the denormalized data, shared by clone
//! - Two views subscribe to committed inventory events and keep the
//!   store current: [`InventoryListView`] and [`InventoryItemDetailView`]
//! - [`InventoryReadModel`] is the facade queries go through
//!
//! Views are fed by the bus, so the read side is eventually consistent
//! with the command side: a query issued right after a command may not
//! see its effect yet.

pub mod error;
pub mod read_model;
pub mod views;

pub use error::{ProjectionError, Result};
pub use read_model::{
    InventoryItemDetails, InventoryItemListEntry, InventoryReadModel, ReadModelStore,
};
pub use views::{InventoryItemDetailView, InventoryListView};
