use std::any::{Any, type_name};
use std::marker::PhantomData;

use async_trait::async_trait;

use crate::error::SendError;
use crate::message::{Command, Event};

/// Handles one concrete command type.
#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    type Error: Send;

    async fn handle(&self, command: C) -> Result<(), Self::Error>;
}

/// Receives one concrete event type, fed by [`MessageBus::publish`].
///
/// A subscriber error is logged and isolated by the bus; it never reaches
/// the publisher or sibling subscribers.
///
/// [`MessageBus::publish`]: crate::MessageBus::publish
#[async_trait]
pub trait EventSubscriber<Ev: Event>: Send + Sync {
    type Error: std::error::Error + Send;

    async fn handle(&self, event: Ev) -> Result<(), Self::Error>;
}

/// Type-erased command handler stored in the routing table.
#[async_trait]
pub(crate) trait ErasedCommandHandler<E>: Send + Sync {
    async fn handle(&self, command: Box<dyn Any + Send>) -> Result<(), SendError<E>>;
}

/// Pairs a typed handler with the command type it was registered for.
pub(crate) struct TypedCommandHandler<C, H> {
    handler: H,
    _command: PhantomData<C>,
}

impl<C, H> TypedCommandHandler<C, H> {
    pub(crate) fn new(handler: H) -> Self {
        Self {
            handler,
            _command: PhantomData,
        }
    }
}

#[async_trait]
impl<C, H> ErasedCommandHandler<H::Error> for TypedCommandHandler<C, H>
where
    C: Command,
    H: CommandHandler<C>,
{
    async fn handle(&self, command: Box<dyn Any + Send>) -> Result<(), SendError<H::Error>> {
        match command.downcast::<C>() {
            Ok(command) => self
                .handler
                .handle(*command)
                .await
                .map_err(SendError::Handler),
            Err(_) => Err(SendError::HandlerMismatch {
                command: type_name::<C>(),
            }),
        }
    }
}

/// Type-erased subscriber; reports its own failures so publication stays
/// fire-and-forget.
#[async_trait]
pub(crate) trait ErasedSubscriber: Send + Sync {
    async fn dispatch(&self, event: Box<dyn Any + Send>);
}

pub(crate) struct TypedSubscriber<Ev, S> {
    subscriber: S,
    _event: PhantomData<Ev>,
}

impl<Ev, S> TypedSubscriber<Ev, S> {
    pub(crate) fn new(subscriber: S) -> Self {
        Self {
            subscriber,
            _event: PhantomData,
        }
    }
}

#[async_trait]
impl<Ev, S> ErasedSubscriber for TypedSubscriber<Ev, S>
where
    Ev: Event,
    S: EventSubscriber<Ev>,
{
    async fn dispatch(&self, event: Box<dyn Any + Send>) {
        let Ok(event) = event.downcast::<Ev>() else {
            tracing::error!(
                subscriber = type_name::<S>(),
                event = type_name::<Ev>(),
                "published event does not match the subscriber's registration"
            );
            return;
        };
        if let Err(error) = self.subscriber.handle(*event).await {
            tracing::error!(
                %error,
                subscriber = type_name::<S>(),
                event = type_name::<Ev>(),
                "event subscriber failed"
            );
        }
    }
}
