//! Sequential batch application for async processing
//!
//! This module provides the `BatchProcessor`, which applies batches of
//! invocations to a `SharedMemoryStore` on tokio's blocking pool.
//!
//! # Ordering
//!
//! Ledger invocations are not independent: a transfer touches two accounts and
//! every account creation or deletion rewrites the shared index record. The
//! processor therefore never runs two invocations at once. Each batch is applied
//! in order on a single blocking task, and `process_batch` only resolves when
//! the whole batch is done, so awaiting batches one after another yields the
//! same result as a synchronous replay.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── SharedMemoryStore (Arc<DashMap>, cloned onto the blocking task)
//!     └── index_key         (account index record key)
//! ```

use super::SharedMemoryStore;
use crate::core::engine::LedgerEngine;
use crate::types::{Invocation, InvocationOutcome, LedgerError};

/// Result of applying a single invocation
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The invocation that was applied
    pub invocation: Invocation,

    /// The outcome of applying it
    pub result: Result<InvocationOutcome, LedgerError>,
}

/// Applies invocation batches to a shared store
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    store: SharedMemoryStore,
    index_key: String,
}

impl BatchProcessor {
    /// Create a processor over `store`, keeping the account index under `index_key`
    pub fn new(store: SharedMemoryStore, index_key: &str) -> Self {
        Self {
            store,
            index_key: index_key.to_string(),
        }
    }

    /// The store batches are applied to
    pub fn store(&self) -> &SharedMemoryStore {
        &self.store
    }

    /// Apply a batch in order, synchronously
    ///
    /// A failing invocation does not stop the batch; its error is recorded in
    /// its result and the next invocation runs.
    pub fn apply_batch(&self, batch: Vec<Invocation>) -> Vec<ProcessingResult> {
        let mut engine = LedgerEngine::with_index_key(self.store.clone(), &self.index_key);

        batch
            .into_iter()
            .map(|invocation| {
                let result = engine.invoke(invocation.clone());
                ProcessingResult { invocation, result }
            })
            .collect()
    }

    /// Apply a batch in order on the blocking pool
    ///
    /// # Errors
    ///
    /// Returns an error only if the blocking task itself failed (panicked or was
    /// cancelled). Invocation failures are reported in the results.
    pub async fn process_batch(
        &self,
        batch: Vec<Invocation>,
    ) -> Result<Vec<ProcessingResult>, String> {
        let processor = self.clone();

        tokio::task::spawn_blocking(move || processor.apply_batch(batch))
            .await
            .map_err(|e| format!("Batch task failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::account_index::ACCOUNT_INDEX_KEY;
    use crate::core::traits::RecordStore;

    fn invocation(function: &str, args: &[&str]) -> Invocation {
        Invocation::parse(function, args.iter().map(|a| a.to_string()).collect()).unwrap()
    }

    fn scenario() -> Vec<Invocation> {
        vec![
            invocation("init_account", &["A1", "Bob", "USD", "100.00"]),
            invocation("init_account", &["A2", "Alice", "USD", "50.00"]),
            invocation("transfer_balance", &["A1", "A2", "30.00"]),
            invocation("transfer_balance", &["A1", "A2", "1000"]),
        ]
    }

    #[test]
    fn test_processor_is_cloneable_and_shares_store() {
        let processor = BatchProcessor::new(SharedMemoryStore::new(), ACCOUNT_INDEX_KEY);
        let clone = processor.clone();

        clone.apply_batch(vec![invocation("write", &["k", "v"])]);

        assert_eq!(processor.store().read("k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_apply_batch_runs_in_order_and_continues_after_error() {
        let processor = BatchProcessor::new(SharedMemoryStore::new(), ACCOUNT_INDEX_KEY);

        let results = processor.apply_batch(scenario());

        assert_eq!(results.len(), 4);
        assert!(results[..3].iter().all(|r| r.result.is_ok()));
        assert!(matches!(
            results[3].result,
            Err(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(results[2].invocation.function(), "transfer_balance");
    }

    #[tokio::test]
    async fn test_process_batch_empty() {
        let processor = BatchProcessor::new(SharedMemoryStore::new(), ACCOUNT_INDEX_KEY);

        let results = processor.process_batch(Vec::new()).await.unwrap();

        assert!(results.is_empty());
        assert!(processor.store().is_empty());
    }

    #[tokio::test]
    async fn test_process_batch_matches_sync_replay() {
        let processor = BatchProcessor::new(SharedMemoryStore::new(), ACCOUNT_INDEX_KEY);
        let mut batches = scenario();
        let second = batches.split_off(2);

        processor.process_batch(batches).await.unwrap();
        processor.process_batch(second).await.unwrap();

        let mut sync = LedgerEngine::new(crate::core::record_store::MemoryStore::new());
        for invocation in scenario() {
            let _ = sync.invoke(invocation);
        }
        assert_eq!(processor.store().snapshot(), sync.store().snapshot());
    }

    #[tokio::test]
    async fn test_process_batch_uses_index_key() {
        let processor = BatchProcessor::new(SharedMemoryStore::new(), "_idx");

        processor
            .process_batch(vec![invocation("init_account", &["A1", "Bob", "USD", "1"])])
            .await
            .unwrap();

        assert_eq!(
            processor.store().read("_idx").unwrap(),
            Some(br#"["A1"]"#.to_vec())
        );
    }
}
