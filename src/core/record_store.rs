//! Record store implementations
//!
//! This module provides the single-threaded backends of the `RecordStore`
//! contract:
//! - `MemoryStore` keeps records in a `HashMap` for the lifetime of the process
//! - `JsonFileStore` keeps records in a JSON object file and writes through on
//!   every mutation, so a script can be replayed against persisted state
//!
//! Both are pass-through: they add no semantics beyond the key-value contract.

use crate::core::traits::RecordStore;
use crate::types::LedgerError;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Point-in-time copy of every record in a store, ordered by key
pub type Snapshot = BTreeMap<String, Vec<u8>>;

/// In-memory record store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Map of record keys to raw values
    records: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        MemoryStore {
            records: HashMap::new(),
        }
    }

    /// Create a store holding the records of a snapshot
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        MemoryStore {
            records: snapshot.into_iter().collect(),
        }
    }

    /// Copy every record out of the store
    pub fn snapshot(&self) -> Snapshot {
        self.records
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
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

impl RecordStore for MemoryStore {
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.records.get(name).cloned())
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

/// Write-through record store backed by a JSON file
///
/// The file holds one JSON object mapping keys to string values. Values must
/// therefore be valid UTF-8; writing anything else fails with `StoreError`.
/// A mutation that cannot be persisted is undone in memory as well, so the
/// store never reports state the file does not hold.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`
    ///
    /// A missing or empty file opens as an empty store; the file is created on
    /// the first mutation.
    ///
    /// # Errors
    ///
    /// - `StoreError` if the file exists but cannot be read
    /// - `DecodeError` if the file is not a JSON object of strings
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let location = path.display().to_string();
        let records = match fs::read_to_string(path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| LedgerError::decode(&location, e))?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(LedgerError::store("open", &location, e)),
        };

        Ok(JsonFileStore {
            path: path.to_path_buf(),
            records,
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy every record out of the store
    pub fn snapshot(&self) -> Snapshot {
        self.records
            .iter()
            .map(|(key, value)| (key.clone(), value.as_bytes().to_vec()))
            .collect()
    }

    /// Replace the whole content of the store and persist it
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a value is not UTF-8 or the file cannot be written.
    /// The store is left unchanged in that case.
    pub fn replace(&mut self, snapshot: Snapshot) -> Result<(), LedgerError> {
        let mut records = BTreeMap::new();
        for (key, value) in snapshot {
            let value = Self::utf8("replace", &key, value)?;
            records.insert(key, value);
        }

        let previous = std::mem::replace(&mut self.records, records);
        if let Err(e) = self.persist("replace", &self.path.display().to_string()) {
            self.records = previous;
            return Err(e);
        }
        Ok(())
    }

    fn utf8(operation: &str, key: &str, value: Vec<u8>) -> Result<String, LedgerError> {
        String::from_utf8(value)
            .map_err(|_| LedgerError::store(operation, key, "value is not valid UTF-8"))
    }

    fn persist(&self, operation: &str, key: &str) -> Result<(), LedgerError> {
        let contents = serde_json::to_string_pretty(&self.records)
            .map_err(|e| LedgerError::store(operation, key, e))?;
        fs::write(&self.path, contents).map_err(|e| LedgerError::store(operation, key, e))
    }

    fn restore(&mut self, name: &str, previous: Option<String>) {
        match previous {
            Some(value) => self.records.insert(name.to_string(), value),
            None => self.records.remove(name),
        };
    }
}

impl RecordStore for JsonFileStore {
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.records.get(name).map(|value| value.as_bytes().to_vec()))
    }

    fn write(&mut self, name: &str, value: &[u8]) -> Result<(), LedgerError> {
        let value = Self::utf8("write", name, value.to_vec())?;
        let previous = self.records.insert(name.to_string(), value);

        if let Err(e) = self.persist("write", name) {
            self.restore(name, previous);
            return Err(e);
        }
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<(), LedgerError> {
        let Some(previous) = self.records.remove(name) else {
            return Ok(());
        };

        if let Err(e) = self.persist("delete", name) {
            self.restore(name, Some(previous));
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_read_missing_returns_none() {
        let store = MemoryStore::new();
        assert_eq!(store.read("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_memory_store_write_replaces_value() {
        let mut store = MemoryStore::new();

        store.write("k", b"one").unwrap();
        store.write("k", b"two").unwrap();

        assert_eq!(store.read("k").unwrap(), Some(b"two".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_delete_is_idempotent() {
        let mut store = MemoryStore::new();
        store.write("k", b"v").unwrap();

        assert!(store.delete("k").is_ok());
        assert!(store.delete("k").is_ok());
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_snapshot_round_trip() {
        let mut store = MemoryStore::new();
        store.write("b", b"2").unwrap();
        store.write("a", b"1").unwrap();

        let restored = MemoryStore::from_snapshot(store.snapshot());

        assert_eq!(restored.read("a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(restored.read("b").unwrap(), Some(b"2".to_vec()));
        assert_eq!(
            restored.snapshot().keys().cloned().collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_json_store_opens_missing_file_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(&dir.path().join("ledger.json")).unwrap();

        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_json_store_persists_across_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.write("test_key", b"42").unwrap();
        store.write("gone", b"x").unwrap();
        store.delete("gone").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.read("test_key").unwrap(), Some(b"42".to_vec()));
        assert_eq!(reopened.read("gone").unwrap(), None);
    }

    #[test]
    fn test_json_store_rejects_non_utf8_value() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::open(&dir.path().join("ledger.json")).unwrap();

        let result = store.write("k", &[0xff, 0xfe]);

        assert!(matches!(result, Err(LedgerError::StoreError { .. })));
        assert_eq!(store.read("k").unwrap(), None);
    }

    #[test]
    fn test_json_store_rejects_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let result = JsonFileStore::open(&path);
        assert!(matches!(result, Err(LedgerError::DecodeError { .. })));
    }

    #[test]
    fn test_json_store_undoes_write_it_cannot_persist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("ledger.json");
        let mut store = JsonFileStore::open(&path).unwrap();

        let result = store.write("k", b"v");

        assert!(matches!(result, Err(LedgerError::StoreError { .. })));
        assert_eq!(store.read("k").unwrap(), None);
    }

    #[test]
    fn test_json_store_replace_overwrites_everything() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.json");
        let mut store = JsonFileStore::open(&path).unwrap();
        store.write("old", b"1").unwrap();

        let mut snapshot = Snapshot::new();
        snapshot.insert("new".to_string(), b"2".to_vec());
        store.replace(snapshot).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.read("old").unwrap(), None);
        assert_eq!(reopened.read("new").unwrap(), Some(b"2".to_vec()));
    }
}
