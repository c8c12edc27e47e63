use thiserror::Error;

/// A handler was registered for a command type that already has one.
///
/// The original registration stays in place.
#[derive(Debug, Error)]
#[error("only one handler per command is allowed: {command}")]
pub struct HandlerAlreadyRegistered {
    /// Type name of the command, for diagnostics.
    pub command: &'static str,
}

/// Failure to deliver a command to its handler.
#[derive(Debug, Error)]
pub enum SendError<E> {
    /// No handler is registered for the command's type.
    #[error("no handler registered for command {command}")]
    NoHandler { command: &'static str },

    /// The registered handler does not accept this command type. Cannot be
    /// reached through `register_handler`/`send`, which key both sides by
    /// the same `TypeId`.
    #[error("command {command} does not match its registered handler")]
    HandlerMismatch { command: &'static str },

    /// The handler ran and failed; the inner error is untouched.
    #[error(transparent)]
    Handler(E),
}
