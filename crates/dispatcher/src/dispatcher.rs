//! Dispatcher - concurrent fan-out of one batch to every writer

use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;
use tracing::{debug, error, info_span, instrument, warn, Instrument, Span};

use contracts::{Batch, WriterConfig, WriterKind};

use crate::error::DispatcherError;
use crate::handle::WriterHandle;
use crate::metrics::MetricsSnapshot;
use crate::sinks::NoopWriter;

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Writer configurations
    pub writers: Vec<WriterConfig>,
}

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    span: Option<Span>,
}

impl DispatcherBuilder {
    /// Create a new DispatcherBuilder
    pub fn new(config: DispatcherConfig) -> Self {
        Self { config, span: None }
    }

    /// Log context handed to the dispatcher and its writers
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Build the writer set
    #[instrument(
        name = "dispatcher_builder_build",
        skip(self),
        fields(writer_count = self.config.writers.len())
    )]
    pub fn build(self) -> Result<Dispatcher, DispatcherError> {
        let span = self.span.unwrap_or_else(|| info_span!("dispatcher"));

        let mut handles = Vec::with_capacity(self.config.writers.len());
        for writer_config in &self.config.writers {
            handles.push(create_writer_handle(writer_config, &span)?);
        }

        Ok(Dispatcher::new(handles).with_span(span))
    }
}

/// Create a WriterHandle from configuration
#[instrument(
    name = "dispatcher_create_writer_handle",
    skip(config, parent),
    fields(writer = %config.name, kind = ?config.kind)
)]
fn create_writer_handle(
    config: &WriterConfig,
    parent: &Span,
) -> Result<WriterHandle, DispatcherError> {
    if config.name.is_empty() {
        return Err(DispatcherError::writer_creation(
            &config.name,
            "writer name cannot be empty",
        ));
    }

    match config.kind {
        WriterKind::Noop => {
            let span = info_span!(parent: parent, "writer", storage = %config.name);
            let writer = NoopWriter::from_config(config).with_span(span);
            debug!(
                writer = %config.name,
                endpoint = %writer.endpoint(),
                send_timeout_ms = config.send_timeout_ms,
                "Writer created"
            );
            Ok(WriterHandle::new(writer))
        }
    }
}

/// Outcome of one dispatch, for observability only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Writers that accepted the batch
    pub succeeded: usize,
    /// Writers that failed or panicked, by name
    pub failed: Vec<String>,
}

impl DispatchReport {
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

/// Fans each batch out to the immutable writer set
///
/// Cloning is cheap; clones share the writer set.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    writers: Arc<[WriterHandle]>,
    span: Span,
}

impl Dispatcher {
    /// Create a dispatcher over already-built writers
    pub fn new(writers: Vec<WriterHandle>) -> Self {
        Self {
            writers: writers.into(),
            span: Span::none(),
        }
    }

    /// Log context for dispatch events
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Number of configured writers
    pub fn len(&self) -> usize {
        self.writers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }

    /// Names of configured writers, in configuration order
    pub fn writer_names(&self) -> Vec<&str> {
        self.writers.iter().map(WriterHandle::name).collect()
    }

    /// Get metrics for all writers
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.writers
            .iter()
            .map(|h| (h.name().to_string(), h.metrics().snapshot()))
            .collect()
    }

    /// Deliver `batch` to every writer and wait for all of them
    ///
    /// Each writer runs in its own task. A failing or panicking writer is
    /// logged and counted; it never affects the other writers or the caller.
    /// No timeout is applied: the call returns only after every write has
    /// returned. Dropping the returned future detaches the writer tasks, a
    /// started write always runs to completion.
    pub async fn dispatch(&self, batch: Arc<Batch>) -> DispatchReport {
        let started = Instant::now();

        let tasks: Vec<(WriterHandle, JoinHandle<bool>)> = self
            .writers
            .iter()
            .cloned()
            .map(|handle| {
                let writer = handle.clone();
                let batch = Arc::clone(&batch);
                let task = tokio::spawn(
                    async move { send_samples(&writer, &batch).await }
                        .instrument(self.span.clone()),
                );
                (handle, task)
            })
            .collect();

        let mut report = DispatchReport::default();
        for (handle, task) in tasks {
            match task.await {
                Ok(true) => report.succeeded += 1,
                Ok(false) => report.failed.push(handle.name().to_string()),
                Err(e) => {
                    handle.metrics().inc_failure_count();
                    observability::record_batch_dispatched(handle.name(), false, batch.len());
                    self.span.in_scope(|| {
                        error!(
                            writer = %handle.name(),
                            num_samples = batch.len(),
                            error = %e,
                            "Writer task panicked"
                        );
                    });
                    report.failed.push(handle.name().to_string());
                }
            }
        }

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        observability::record_dispatch_duration_ms(elapsed_ms);
        self.span.in_scope(|| {
            debug!(
                num_samples = batch.len(),
                succeeded = report.succeeded,
                failed = report.failed_count(),
                elapsed_ms,
                "Batch dispatched"
            );
        });

        report
    }
}

/// Write one batch to one writer, logging a failure at WARN
async fn send_samples(handle: &WriterHandle, batch: &Batch) -> bool {
    match handle.write(batch).await {
        Ok(()) => {
            handle.metrics().record_success(batch.len());
            observability::record_batch_dispatched(handle.name(), true, batch.len());
            true
        }
        Err(e) => {
            handle.metrics().inc_failure_count();
            observability::record_batch_dispatched(handle.name(), false, batch.len());
            warn!(
                storage = %handle.name(),
                num_samples = batch.len(),
                error = %e,
                "Error sending samples to remote storage"
            );
            false
        }
    }
}

/// Convenience function to create a dispatcher from writer configs
#[instrument(name = "dispatcher_create", skip(writer_configs))]
pub fn create_dispatcher(writer_configs: Vec<WriterConfig>) -> Result<Dispatcher, DispatcherError> {
    let config = DispatcherConfig {
        writers: writer_configs,
    };
    DispatcherBuilder::new(config).build()
}
