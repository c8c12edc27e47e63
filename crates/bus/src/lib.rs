//! In-process dispatch bus for the CQRS engine.
//!
//! Two routing families, both keyed by the concrete message type:
//! - Commands route to exactly one registered handler and are awaited on
//!   the caller's task; the handler's error reaches the sender unchanged.
//! - Events fan out to every subscriber of their type, each invocation on
//!   its own task, so publication never blocks or fails the command path
//!   that produced the event.

pub mod bus;
pub mod error;
pub mod handler;
pub mod message;

pub use bus::MessageBus;
pub use error::{HandlerAlreadyRegistered, SendError};
pub use handler::{CommandHandler, EventSubscriber};
pub use message::{Command, Event};
