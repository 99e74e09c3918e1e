//! Writer metrics for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Metrics for a single writer
#[derive(Debug, Default)]
pub struct WriterMetrics {
    /// Write calls currently running
    in_flight: AtomicUsize,
    /// Total successful writes
    write_count: AtomicU64,
    /// Total write failures
    failure_count: AtomicU64,
    /// Total samples accepted
    samples_written: AtomicU64,
}

impl WriterMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of write calls in flight
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Mark a write call as started
    ///
    /// The call counts as in flight until the returned guard is dropped,
    /// including on panic or cancellation.
    pub fn start_write(&self) -> InFlightGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        InFlightGuard { metrics: self }
    }

    /// Get total write count
    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::Relaxed)
    }

    /// Record a successful write of `samples` samples
    pub fn record_success(&self, samples: usize) {
        self.write_count.fetch_add(1, Ordering::Relaxed);
        self.samples_written
            .fetch_add(samples as u64, Ordering::Relaxed);
    }

    /// Get failure count
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Increment failure count
    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total samples accepted
    pub fn samples_written(&self) -> u64 {
        self.samples_written.load(Ordering::Relaxed)
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            in_flight: self.in_flight(),
            write_count: self.write_count(),
            failure_count: self.failure_count(),
            samples_written: self.samples_written(),
        }
    }
}

/// Decrements `in_flight` on drop
#[must_use = "the write is only in flight while the guard is alive"]
pub struct InFlightGuard<'a> {
    metrics: &'a WriterMetrics,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.metrics.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Snapshot of writer metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub in_flight: usize,
    pub write_count: u64,
    pub failure_count: u64,
    pub samples_written: u64,
}
