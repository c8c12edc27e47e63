//! Shared types used across the event-sourcing engine.

pub mod types;

pub use types::{AggregateId, Version};
