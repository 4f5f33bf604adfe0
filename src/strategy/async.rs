//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous implementation of the
//! ProcessingStrategy trait. The script is read in batches on a tokio runtime
//! and each batch is applied on the blocking pool.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── LedgerConfig (store path, index key)
//!     ├── BatchConfig (batch_size)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (sequential application on spawn_blocking)
//!         └── SharedMemoryStore (Arc + DashMap)
//! ```
//!
//! # Ordering
//!
//! Batches are applied one after another and each batch is applied in script
//! order, so the final state always equals a synchronous replay of the script.
//! While a batch is applied on the blocking pool, the next one is read from the
//! script; no two batches are ever applied at once.
//!
//! # Persistence
//!
//! With a store path configured, the file is loaded into the shared store up
//! front and written back once the whole script has been applied. A fatal error
//! before that point leaves the file untouched.

use crate::config::LedgerConfig;
use crate::core::r#async::{BatchProcessor, SharedMemoryStore};
use crate::core::{JsonFileStore, LedgerEngine};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_accounts_csv;
use crate::strategy::{log_outcome, ProcessingStrategy};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of invocations per batch
    pub batch_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { batch_size: 1000 }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig, falling back to the default batch size for zero
    pub fn new(batch_size: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "Invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        Self { batch_size }
    }
}

/// Asynchronous batch processing strategy
///
/// # Configuration
///
/// - `LedgerConfig`: store path and account index key
/// - `BatchConfig`: number of invocations per batch (default: 1000)
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    ledger: LedgerConfig,
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy with the specified configuration
    pub fn new(ledger: LedgerConfig, config: BatchConfig) -> Self {
        Self { ledger, config }
    }

    async fn apply_script(
        &self,
        processor: &BatchProcessor,
        input_path: &Path,
    ) -> Result<usize, String> {
        let file = tokio::fs::File::open(input_path)
            .await
            .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

        // csv-async reads from futures' AsyncRead
        let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
        let mut reader = AsyncReader::new(compat_file);

        let mut applied = 0usize;
        let mut batch = reader.read_batch(self.config.batch_size).await;
        while !batch.is_empty() {
            // The next batch is read while this one runs on the blocking pool
            let (results, next) = futures::join!(
                processor.process_batch(batch),
                reader.read_batch(self.config.batch_size)
            );

            for result in results? {
                log_outcome(result.invocation.function(), &result.result);
                applied += 1;
            }
            batch = next;
        }

        Ok(applied)
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process a script and write the account listing to output
    ///
    /// 1. Loads the configured store file (if any) into a `SharedMemoryStore`
    /// 2. Reads the script in batches with `AsyncReader`
    /// 3. Applies each batch through the `BatchProcessor` while reading the next
    /// 4. Writes the shared store back to the store file
    /// 5. Writes the account listing to output
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let mut file_store = match &self.ledger.store_path {
            Some(path) => Some(JsonFileStore::open(path).map_err(|e| e.to_string())?),
            None => None,
        };
        let shared = file_store
            .as_ref()
            .map(|store| SharedMemoryStore::from_snapshot(store.snapshot()))
            .unwrap_or_default();
        let processor = BatchProcessor::new(shared.clone(), &self.ledger.index_key);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        let applied = runtime.block_on(self.apply_script(&processor, input_path))?;
        info!(applied, "Script processed");

        if let Some(store) = file_store.as_mut() {
            store
                .replace(shared.snapshot())
                .map_err(|e| e.to_string())?;
        }

        let engine = LedgerEngine::with_index_key(shared, &self.ledger.index_key);
        let accounts = engine.list_accounts().map_err(|e| e.to_string())?;
        write_accounts_csv(&accounts, output)
    }
}
