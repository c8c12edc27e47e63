//! Aggregate behavior trait and the generic aggregate root wrapper.
//!
//! An [`Aggregate`] is pure state plus two hooks: `apply` folds one event
//! into the state, `ensure_valid` checks the class invariants afterwards.
//! [`AggregateRoot`] owns the projected state, the persisted-version
//! counter, and the list of staged (not yet persisted) events. Command
//! methods live on `AggregateRoot<ConcreteAggregate>` impls and stage
//! events through [`AggregateRoot::apply_change`]; they never mutate the
//! state directly.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use common::{AggregateId, Version};

/// A domain event that can be folded into aggregate state and persisted.
pub trait DomainEvent: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Stable type name stored alongside the payload.
    fn event_type(&self) -> &'static str;
}

/// Behavior contract for an event-sourced aggregate.
///
/// `Default` is the blank pre-creation state that histories replay onto.
/// `id` returns `None` until an event has established an identity.
pub trait Aggregate: Default + Send + Sync {
    /// The event type this aggregate emits and consumes.
    type Event: DomainEvent;

    /// Stable name used in validation errors and tracing spans.
    fn aggregate_type() -> &'static str;

    /// Identifier of this aggregate, once an event has set one.
    fn id(&self) -> Option<AggregateId>;

    /// Folds one event into the state. Must be total: every variant is
    /// handled, ignored variants get an explicit empty arm.
    fn apply(&mut self, event: &Self::Event);

    /// Checks the class invariants of the current state, reporting every
    /// violation at once.
    fn ensure_valid(&self) -> Result<(), InvalidEntityState>;
}

/// An applied event left the aggregate in a state that violates its
/// invariants.
///
/// Raised both when a command stages a bad event and when a persisted
/// history replays into a bad state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("entity {entity} state change rejected: {}", violations.join(", "))]
pub struct InvalidEntityState {
    /// Aggregate type name the violation belongs to.
    pub entity: &'static str,
    /// Every violated invariant, not just the first.
    pub violations: Vec<String>,
}

/// Generic aggregate root: projected state, persisted version, and the
/// staged events a later save will persist.
pub struct AggregateRoot<A: Aggregate> {
    state: A,
    version: Version,
    changes: Vec<A::Event>,
}

impl<A: Aggregate> AggregateRoot<A> {
    /// A blank root at version 0 with nothing staged.
    pub fn new() -> Self {
        Self {
            state: A::default(),
            version: Version::initial(),
            changes: Vec::new(),
        }
    }

    /// Read access to the projected state.
    pub fn state(&self) -> &A {
        &self.state
    }

    /// Identifier of the underlying aggregate, if established.
    pub fn id(&self) -> Option<AggregateId> {
        self.state.id()
    }

    /// Version of the last persisted event this root has seen.
    ///
    /// Staged events do not advance this; it moves on replay and after a
    /// successful save.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Events staged by command methods since the last save.
    pub fn uncommitted_changes(&self) -> &[A::Event] {
        &self.changes
    }

    /// Drops the staged events without persisting them.
    pub fn mark_changes_as_committed(&mut self) {
        self.changes.clear();
    }

    /// Rebuilds state by folding a persisted history into this root,
    /// advancing the version once per event.
    ///
    /// Every replayed event passes through the same invariant check as a
    /// freshly staged one, so a history that no longer satisfies current
    /// rules is rejected instead of silently producing a corrupt state.
    pub fn load_from_history<I>(&mut self, history: I) -> Result<(), InvalidEntityState>
    where
        I: IntoIterator<Item = A::Event>,
    {
        for event in history {
            self.state.apply(&event);
            self.state.ensure_valid()?;
            self.version = self.version.next();
        }
        Ok(())
    }

    /// Applies a new event, validates the resulting state, and stages the
    /// event for the next save.
    ///
    /// On a validation failure nothing is staged and the error propagates;
    /// the root must then be discarded, matching the load-mutate-save
    /// lifecycle where a failed command never reaches a save.
    pub(crate) fn apply_change(&mut self, event: A::Event) -> Result<(), InvalidEntityState> {
        self.state.apply(&event);
        self.state.ensure_valid()?;
        self.changes.push(event);
        Ok(())
    }

    /// Moves the persisted-version counter past a just-saved batch.
    pub(crate) fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}

impl<A: Aggregate> Default for AggregateRoot<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Aggregate> fmt::Debug for AggregateRoot<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateRoot")
            .field("aggregate_type", &A::aggregate_type())
            .field("id", &self.id())
            .field("version", &self.version)
            .field("uncommitted", &self.changes.len())
            .finish()
    }
}
