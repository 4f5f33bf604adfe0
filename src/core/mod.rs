//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - The key-value contract of the underlying store
//! - `record_store` - In-memory and JSON-file stores
//! - `account_index` - The persisted list of live account numbers
//! - `engine` - Account creation, transfers and raw access
//! - `async` - Thread-safe store and batch application for the async strategy

pub mod account_index;
pub mod r#async;
pub mod engine;
pub mod record_store;
pub mod traits;

pub use account_index::{AccountIndex, ACCOUNT_INDEX_KEY};
pub use engine::{LedgerEngine, TEST_KEY};
pub use r#async::{BatchProcessor, SharedMemoryStore};
pub use record_store::{JsonFileStore, MemoryStore, Snapshot};
pub use traits::RecordStore;
