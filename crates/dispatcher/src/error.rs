//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Writer creation error
    #[error("failed to create writer '{name}': {message}")]
    WriterCreation { name: String, message: String },
}

impl DispatcherError {
    /// Create a writer creation error
    pub fn writer_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WriterCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
