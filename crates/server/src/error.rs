//! HTTP boundary errors

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use ingestion::DecodeError;
use thiserror::Error;
use tracing::error;

/// Request-level failure, mapped onto an HTTP status
#[derive(Debug, Error)]
pub enum ServerError {
    /// Request body could not be read
    #[error("{0}")]
    ReadBody(#[source] axum::Error),

    /// Body failed decompression or deserialization
    #[error("{0}")]
    Decode(#[from] DecodeError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ReadBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Decode(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn log_message(&self) -> &'static str {
        match self {
            Self::ReadBody(_) => "Read error",
            Self::Decode(DecodeError::Compression(_)) => "Decode error",
            Self::Decode(DecodeError::Message(_)) => "Unmarshal error",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        error!(err = %self, "{}", self.log_message());

        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}
