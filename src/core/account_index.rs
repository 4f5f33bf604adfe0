//! Account index
//!
//! The record store cannot enumerate its keys, so the ledger keeps the list of
//! live account numbers itself, as a JSON array of strings stored in a single
//! record under a reserved key.
//!
//! The index is loaded, mutated in memory and saved back in one write. Callers
//! that create or delete accounts are responsible for keeping it in step with
//! the account records. Two writers that both load, mutate and save the index
//! race with last-writer-wins semantics; sequencing them is the caller's job.

use crate::core::traits::RecordStore;
use crate::types::{AccountNo, LedgerError};
use tracing::warn;

/// Reserved key of the account index record
pub const ACCOUNT_INDEX_KEY: &str = "_accountindex";

/// In-memory copy of the account index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIndex {
    /// Key the index is stored under
    key: String,

    /// Account numbers in creation order, without duplicates
    entries: Vec<AccountNo>,
}

impl AccountIndex {
    /// Create an empty index bound to `key`
    pub fn empty(key: &str) -> Self {
        AccountIndex {
            key: key.to_string(),
            entries: Vec::new(),
        }
    }

    /// Load the index stored under `key`
    ///
    /// An absent record and a record that is not a JSON array of strings both
    /// load as an empty index.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the record cannot be read at all.
    pub fn load<S: RecordStore + ?Sized>(store: &S, key: &str) -> Result<Self, LedgerError> {
        let entries = match store.read(key)? {
            None => Vec::new(),
            Some(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(key, error = %e, "account index is corrupt, treating it as empty");
                Vec::new()
            }),
        };

        Ok(AccountIndex {
            key: key.to_string(),
            entries,
        })
    }

    /// Write the whole index back in a single store write
    pub fn save<S: RecordStore + ?Sized>(&self, store: &mut S) -> Result<(), LedgerError> {
        let bytes = serde_json::to_vec(&self.entries)
            .map_err(|e| LedgerError::store("encode", &self.key, e))?;
        store.write(&self.key, &bytes)
    }

    /// Append `account_no` unless it is already present
    ///
    /// Returns whether the index changed.
    pub fn add(&mut self, account_no: &str) -> bool {
        if self.contains(account_no) {
            return false;
        }
        self.entries.push(account_no.to_string());
        true
    }

    /// Remove the first occurrence of `account_no`, keeping the order of the rest
    ///
    /// Returns whether the index changed.
    pub fn remove(&mut self, account_no: &str) -> bool {
        match self.entries.iter().position(|entry| entry == account_no) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Whether `account_no` is indexed
    pub fn contains(&self, account_no: &str) -> bool {
        self.entries.iter().any(|entry| entry == account_no)
    }

    /// Indexed account numbers in order
    pub fn entries(&self) -> &[AccountNo] {
        &self.entries
    }

    /// Consume the index, returning its entries
    pub fn into_entries(self) -> Vec<AccountNo> {
        self.entries
    }

    /// Key the index is stored under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of indexed accounts
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no account is indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
