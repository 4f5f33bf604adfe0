//! Processing strategy module for invocation scripts
//!
//! This module defines the Strategy pattern for complete script processing
//! pipelines, encompassing both CSV parsing and ledger execution. This allows
//! different processing implementations (synchronous, asynchronous batch) to be
//! selected at runtime.

use crate::cli::StrategyType;
use crate::config::LedgerConfig;
use crate::types::{InvocationOutcome, LedgerError};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete script pipelines
///
/// Each strategy reads invocations from a CSV script, applies them to a ledger
/// and writes the final account listing to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Process a script from `input_path` and write the accounts to `output`
    ///
    /// # Returns
    ///
    /// * `Ok(())` if all processing completed (possibly with failed invocations)
    /// * `Err(String)` if a fatal error occurred
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The script cannot be opened
    /// - The configured store cannot be opened or written back
    /// - Output cannot be written
    ///
    /// Failed invocations are logged and do not cause this method to return an
    /// error. Processing continues with the next invocation.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `ledger` - Store and index settings
/// * `batch` - Optional configuration for async batch processing (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    ledger: LedgerConfig,
    batch: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(ledger)),
        StrategyType::Async => {
            let batch = batch.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(ledger, batch))
        }
    }
}

/// Log the result of one invocation
pub(crate) fn log_outcome(function: &str, result: &Result<InvocationOutcome, LedgerError>) {
    match result {
        Ok(InvocationOutcome::Value(Some(value))) => {
            info!(function, value = %String::from_utf8_lossy(value), "Read record")
        }
        Ok(InvocationOutcome::Value(None)) => info!(function, "Record not found"),
        Ok(_) => debug!(function, "Invocation completed"),
        Err(e) => warn!(function, error = %e, "Invocation failed"),
    }
}
