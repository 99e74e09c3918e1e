//! Layered error definitions
//!
//! Categorized by source: config / writer

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Writer Errors =====
    /// Writer rejected or failed to deliver a batch
    #[error("writer '{writer}' write error: {message}")]
    WriterWrite { writer: String, message: String },

    /// Writer could not reach its backend
    #[error("writer '{writer}' connection error: {message}")]
    WriterConnection { writer: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create writer write error
    pub fn writer_write(writer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WriterWrite {
            writer: writer.into(),
            message: message.into(),
        }
    }

    /// Create writer connection error
    pub fn writer_connection(writer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WriterConnection {
            writer: writer.into(),
            message: message.into(),
        }
    }
}
