//! Event subscribers that keep the read models current.

pub mod details;
pub mod list;

pub use details::InventoryItemDetailView;
pub use list::InventoryListView;
