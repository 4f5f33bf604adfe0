//! Core traits for record storage
//!
//! This module defines the key-value contract every storage backend fulfils, so
//! that the account index and the transfer engine can be written once and run
//! against an in-memory map, a JSON file, or a shared concurrent map.

use crate::types::LedgerError;

/// Key-value contract of the underlying ledger
///
/// Each call is atomic for its single key. Nothing spans keys: there is no
/// multi-key transaction and no enumeration of keys.
pub trait RecordStore {
    /// Read the raw value stored under `name`
    ///
    /// Absence is `Ok(None)`, not an error.
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Create or replace the value stored under `name`
    fn write(&mut self, name: &str, value: &[u8]) -> Result<(), LedgerError>;

    /// Remove the value stored under `name`
    ///
    /// Deleting a missing key succeeds.
    fn delete(&mut self, name: &str) -> Result<(), LedgerError>;
}
