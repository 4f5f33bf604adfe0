//! Asynchronous implementations of core components
//!
//! This module provides the thread-safe pieces used by the async processing
//! strategy:
//!
//! - **SharedMemoryStore**: `RecordStore` over an `Arc<DashMap>`, shareable across tasks
//! - **BatchProcessor**: applies invocation batches in order on the blocking pool
//!
//! # Ordering
//!
//! Unlike a per-entity engine, a ledger cannot partition its work: transfers
//! span two accounts and account creation rewrites the shared index. Batches
//! are applied one at a time and in order; only reading the next batch overlaps
//! with applying the current one.

pub mod batch_processor;
pub mod shared_store;

pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use shared_store::SharedMemoryStore;
