use serde::Serialize;
use tokio::sync::oneshot;

use crate::assistant::Response;

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone)]
pub enum ActorError {
    /// An error originating from the story store.
    #[error("Story store request failed: {0}")]
    Store(String),
    /// A generic internal error within an actor, e.g. a closed channel.
    #[error("Internal system error: {0}")]
    Internal(String),
    /// An error indicating that an actor operation timed out.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl From<tokio::time::error::Elapsed> for ActorError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        ActorError::Timeout(format!("Actor operation timed out: {}", err))
    }
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Messages that can be sent to the chat supervisor.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// A request to answer a user's chat message.
    ProcessUserMessage {
        content: String,
        /// A channel to send the assistant response back.
        responder: oneshot::Sender<Result<Response, AppError>>,
    },
    /// Apply the pending bulk operation through the story store.
    ConfirmPending {
        responder: oneshot::Sender<Result<Response, AppError>>,
    },
    /// Drop the pending bulk operation without applying it.
    DiscardPending {
        responder: oneshot::Sender<Result<Response, AppError>>,
    },
    /// A command to stop the supervisor loop.
    Shutdown,
}
