//! Error types for the mascot core library.
//!
//! The controller itself never fails; errors only arise while loading and
//! validating configuration.

use thiserror::Error;

/// Top-level error type for mascot configuration and setup.
#[derive(Error, Debug)]
pub enum MascotError {
    /// Configuration could not be parsed or failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, MascotError>;
