//! Thread-safe record store for async processing
//!
//! This module provides the `SharedMemoryStore`, a `RecordStore` backed by a
//! `DashMap` behind an `Arc`. Clones share the same records, so one handle can
//! be moved onto a blocking worker while another stays with the caller.
//!
//! # Thread Safety
//!
//! Each read, write and delete is atomic for its key through DashMap's sharded
//! locking. Nothing spans keys: two-write ledger operations are exactly as
//! non-atomic here as on any other store, and callers must still sequence
//! operations that touch the same records.

use crate::core::record_store::Snapshot;
use crate::core::traits::RecordStore;
use crate::types::LedgerError;
use dashmap::DashMap;
use std::sync::Arc;

/// Record store shared between tasks
#[derive(Debug, Clone, Default)]
pub struct SharedMemoryStore {
    /// Concurrent map of record keys to raw values
    records: Arc<DashMap<String, Vec<u8>>>,
}

impl SharedMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
        }
    }

    /// Create a store holding the records of a snapshot
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let records = DashMap::new();
        for (key, value) in snapshot {
            records.insert(key, value);
        }
        Self {
            records: Arc::new(records),
        }
    }

    /// Copy every record out of the store
    ///
    /// Concurrent writers may or may not be reflected in the copy.
    pub fn snapshot(&self) -> Snapshot {
        self.records
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for SharedMemoryStore {
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.records.get(name).map(|entry| entry.value().clone()))
    }

    fn write(&mut self, name: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.records.insert(name.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<(), LedgerError> {
        self.records.remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clones_share_records() {
        let store = SharedMemoryStore::new();
        let mut writer = store.clone();

        writer.write("k", b"v").unwrap();

        assert_eq!(store.read("k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut store = SharedMemoryStore::new();
        store.write("k", b"v").unwrap();

        assert!(store.delete("k").is_ok());
        assert!(store.delete("k").is_ok());
        assert!(store.is_empty());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut store = SharedMemoryStore::new();
        store.write("a", b"1").unwrap();
        store.write("b", b"2").unwrap();

        let restored = SharedMemoryStore::from_snapshot(store.snapshot());

        assert_eq!(restored.len(), 2);
        assert_eq!(restored.snapshot(), store.snapshot());
    }

    #[test]
    fn test_writes_from_many_threads_land() {
        let store = SharedMemoryStore::new();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let mut store = store.clone();
                thread::spawn(move || {
                    store
                        .write(&format!("key-{}", i), i.to_string().as_bytes())
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 8);
        assert_eq!(store.read("key-3").unwrap(), Some(b"3".to_vec()));
    }
}
