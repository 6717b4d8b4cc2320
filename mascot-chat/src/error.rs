//! Error types for the chat integration.

use mascot_core::MascotError;
use mascot_llm::LlmError;
use thiserror::Error;

/// Errors raised while setting up or talking to the mascot runtime.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Mascot(#[from] MascotError),

    /// The chat backend could not be built.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The controller task has exited.
    #[error("Mascot runtime has stopped")]
    RuntimeStopped,
}
