use common::{AggregateId, Version};

/// An intent to change state, addressed to a single aggregate.
///
/// Commands are routed by their concrete type; at most one handler may be
/// registered per type.
pub trait Command: Send + Sync + 'static {
    /// Identifier of the aggregate the command targets.
    fn aggregate_id(&self) -> AggregateId;

    /// Stream version the sender believes is current, used for the
    /// optimistic concurrency check on save. `None` for commands that
    /// create their aggregate.
    fn original_version(&self) -> Option<Version> {
        None
    }
}

/// A fact that already happened, positioned within its aggregate's stream.
///
/// Events are cloned once per subscriber on publish.
pub trait Event: Clone + Send + Sync + 'static {
    /// Identifier of the aggregate the event belongs to.
    fn aggregate_id(&self) -> AggregateId;

    /// Stream position assigned by the store at append time.
    fn version(&self) -> Version;
}
