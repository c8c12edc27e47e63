use std::any::{TypeId, type_name};
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::{HandlerAlreadyRegistered, SendError};
use crate::handler::{
    CommandHandler, ErasedCommandHandler, ErasedSubscriber, EventSubscriber, TypedCommandHandler,
    TypedSubscriber,
};
use crate::message::{Command, Event};

/// In-process message router.
///
/// Commands go to exactly one handler and are awaited on the caller's
/// task; events fan out to every subscriber of their type on separate
/// tasks. `E` is the error type command handlers return; it reaches the
/// sender unchanged inside [`SendError::Handler`].
pub struct MessageBus<E> {
    handlers: DashMap<TypeId, Arc<dyn ErasedCommandHandler<E>>>,
    subscribers: DashMap<TypeId, Vec<Arc<dyn ErasedSubscriber>>>,
}

impl<E: Send + 'static> MessageBus<E> {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
            subscribers: DashMap::new(),
        }
    }

    /// Registers the handler for command type `C`.
    ///
    /// At most one handler may exist per command type; a second
    /// registration fails and leaves the first in place.
    pub fn register_handler<C, H>(&self, handler: H) -> Result<(), HandlerAlreadyRegistered>
    where
        C: Command,
        H: CommandHandler<C, Error = E> + 'static,
    {
        match self.handlers.entry(TypeId::of::<C>()) {
            Entry::Occupied(_) => Err(HandlerAlreadyRegistered {
                command: type_name::<C>(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(TypedCommandHandler::new(handler)));
                tracing::debug!(command = type_name::<C>(), "command handler registered");
                Ok(())
            }
        }
    }

    /// Sends a command to its registered handler.
    ///
    /// The handler is awaited on the caller's task: every effect of the
    /// command has completed, or failed, by the time this returns.
    pub async fn send<C: Command>(&self, command: C) -> Result<(), SendError<E>> {
        let handler = self
            .handlers
            .get(&TypeId::of::<C>())
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(SendError::NoHandler {
                command: type_name::<C>(),
            })?;

        tracing::debug!(
            command = type_name::<C>(),
            aggregate_id = %command.aggregate_id(),
            "sending command"
        );
        metrics::counter!("bus_commands_sent_total").increment(1);

        handler.handle(Box::new(command)).await
    }

    /// Adds a subscriber for event type `Ev`; any number may register.
    pub fn subscribe<Ev, S>(&self, subscriber: S)
    where
        Ev: Event,
        S: EventSubscriber<Ev> + 'static,
    {
        self.subscribers
            .entry(TypeId::of::<Ev>())
            .or_default()
            .push(Arc::new(TypedSubscriber::new(subscriber)));
        tracing::debug!(
            event = type_name::<Ev>(),
            subscriber = type_name::<S>(),
            "event subscriber registered"
        );
    }

    /// Publishes an event to every subscriber of its type, each invocation
    /// on its own spawned task.
    ///
    /// Never blocks or fails the caller. With no subscribers this is a
    /// silent no-op; subscriber errors are logged and isolated.
    pub fn publish<Ev: Event>(&self, event: Ev) {
        metrics::counter!("bus_events_published_total").increment(1);
        let Some(subscribers) = self.subscribers.get(&TypeId::of::<Ev>()) else {
            return;
        };
        tracing::debug!(
            event = type_name::<Ev>(),
            aggregate_id = %event.aggregate_id(),
            version = %event.version(),
            subscribers = subscribers.len(),
            "publishing event"
        );
        for subscriber in subscribers.iter() {
            let subscriber = Arc::clone(subscriber);
            let event = event.clone();
            tokio::spawn(async move {
                subscriber.dispatch(Box::new(event)).await;
            });
        }
    }
}

impl<E: Send + 'static> Default for MessageBus<E> {
    fn default() -> Self {
        Self::new()
    }
}
