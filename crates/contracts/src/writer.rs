//! Writer trait - Dispatcher output interface
//!
//! Defines the abstract interface for backend writers.

use crate::{Batch, ContractError};

/// Backend writer trait
///
/// All writer implementations must implement this trait. The dispatcher
/// calls `write` once per writer per batch, possibly concurrently with
/// other writers and with other batches.
#[trait_variant::make(Writer: Send)]
pub trait LocalWriter {
    /// Writer name (used for logging/metrics only, never for routing)
    fn name(&self) -> &str;

    /// Deliver a whole batch
    ///
    /// # Errors
    /// Returns one aggregate error if any part of the batch was not accepted
    async fn write(&self, batch: &Batch) -> Result<(), ContractError>;
}
