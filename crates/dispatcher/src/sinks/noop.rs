//! NoopWriter - logs every sample via tracing, no network I/O

use std::time::Duration;

use contracts::{Batch, ContractError, Writer, WriterConfig};
use tracing::{debug, debug_span, Span};

/// Placeholder backend that accepts every batch
///
/// Keeps the endpoint and send timeout of the writer construction contract
/// without using them.
pub struct NoopWriter {
    name: String,
    endpoint: String,
    send_timeout: Duration,
    span: Span,
}

impl NoopWriter {
    /// Create a new NoopWriter
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>, send_timeout: Duration) -> Self {
        let name = name.into();
        let span = debug_span!("writer", storage = %name);
        Self {
            name,
            endpoint: endpoint.into(),
            send_timeout,
            span,
        }
    }

    /// Create from writer configuration (for factory)
    pub fn from_config(config: &WriterConfig) -> Self {
        Self::new(&config.name, &config.endpoint, config.send_timeout())
    }

    /// Replace the log context this writer emits events in
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Backend address this writer was configured with
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send timeout this writer was configured with
    pub fn send_timeout(&self) -> Duration {
        self.send_timeout
    }
}

impl Writer for NoopWriter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn write(&self, batch: &Batch) -> Result<(), ContractError> {
        self.span.in_scope(|| {
            for sample in batch {
                debug!(
                    value = sample.value,
                    sample = %sample.metric,
                    time = sample.timestamp_secs(),
                    "No backend connected, skipping sample"
                );
            }
        });
        Ok(())
    }
}
