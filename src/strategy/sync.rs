//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. It orchestrates script processing by coordinating
//! between the SyncReader (for CSV input) and LedgerEngine (for ledger logic).
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Invocations to `LedgerEngine` over the configured store
//! - CSV output to `csv_format::write_accounts_csv` (format handling)
//!
//! With a store path configured the engine runs over a `JsonFileStore`, so every
//! successful write is on disk before the next invocation starts. Without one
//! it runs over a `MemoryStore`.

use crate::config::LedgerConfig;
use crate::core::traits::RecordStore;
use crate::core::{JsonFileStore, LedgerEngine, MemoryStore};
use crate::io::csv_format::write_accounts_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{log_outcome, ProcessingStrategy};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use ledger_store::config::LedgerConfig;
/// use ledger_store::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(LedgerConfig::default());
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("script.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    config: LedgerConfig,
}

impl SyncProcessingStrategy {
    /// Create a new SyncProcessingStrategy with the given ledger settings
    pub fn new(config: LedgerConfig) -> Self {
        Self { config }
    }

    fn run<S: RecordStore>(
        &self,
        store: S,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), String> {
        let reader = SyncReader::new(input_path)?;
        let mut engine = LedgerEngine::with_index_key(store, &self.config.index_key);

        let mut applied = 0usize;
        for result in reader {
            match result {
                Ok(invocation) => {
                    let function = invocation.function();
                    let outcome = engine.invoke(invocation);
                    log_outcome(function, &outcome);
                    applied += 1;
                }
                Err(e) => warn!(error = %e, "Skipping invalid script row"),
            }
        }
        info!(applied, "Script processed");

        let accounts = engine.list_accounts().map_err(|e| e.to_string())?;
        write_accounts_csv(&accounts, output)
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Process a script and write the account listing to output
    ///
    /// Fatal errors (script or store unreadable, output errors) are returned
    /// immediately. Failed invocations are logged and processing continues.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        match &self.config.store_path {
            Some(path) => {
                let store = JsonFileStore::open(path).map_err(|e| e.to_string())?;
                self.run(store, input_path, output)
            }
            None => self.run(MemoryStore::new(), input_path, output),
        }
    }
}
