//! WriterHandle - type-erased writer with its metrics

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use contracts::{Batch, ContractError, Writer};

use crate::metrics::WriterMetrics;

type WriteFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ContractError>> + Send + 'a>>;

/// Object-safe view of `Writer`
trait DynWriter: Send + Sync {
    fn write_boxed<'a>(&'a self, batch: &'a Batch) -> WriteFuture<'a>;
}

impl<W> DynWriter for W
where
    W: Writer + Sync,
{
    fn write_boxed<'a>(&'a self, batch: &'a Batch) -> WriteFuture<'a> {
        Box::pin(Writer::write(self, batch))
    }
}

/// Handle to one configured writer
///
/// Cheap to clone; clones share the writer and its metrics.
#[derive(Clone)]
pub struct WriterHandle {
    /// Writer name
    name: Arc<str>,
    /// Type-erased writer
    writer: Arc<dyn DynWriter>,
    /// Shared metrics
    metrics: Arc<WriterMetrics>,
}

impl WriterHandle {
    /// Wrap any writer implementation
    pub fn new<W: Writer + Sync + 'static>(writer: W) -> Self {
        let name: Arc<str> = Arc::from(Writer::name(&writer));
        Self {
            name,
            writer: Arc::new(writer),
            metrics: Arc::new(WriterMetrics::new()),
        }
    }

    /// Get writer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<WriterMetrics> {
        &self.metrics
    }

    /// Call the underlying writer once
    pub async fn write(&self, batch: &Batch) -> Result<(), ContractError> {
        let _in_flight = self.metrics.start_write();
        self.writer.write_boxed(batch).await
    }
}

impl std::fmt::Debug for WriterHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterHandle")
            .field("name", &self.name)
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}
