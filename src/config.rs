//! Ledger configuration
//!
//! Settings shared by every processing strategy: where records live and under
//! which key the account index is kept. Batch settings for the async strategy
//! live in `strategy::BatchConfig`.

use crate::core::ACCOUNT_INDEX_KEY;
use std::path::PathBuf;

/// Store and index settings for a ledger run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerConfig {
    /// JSON file holding the records; `None` keeps everything in memory
    pub store_path: Option<PathBuf>,

    /// Record key of the account index
    pub index_key: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            index_key: ACCOUNT_INDEX_KEY.to_string(),
        }
    }
}

impl LedgerConfig {
    /// Configuration persisting records to `path`
    pub fn with_store(path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: Some(path.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_in_memory_with_standard_index() {
        let config = LedgerConfig::default();

        assert_eq!(config.store_path, None);
        assert_eq!(config.index_key, "_accountindex");
    }

    #[test]
    fn test_with_store_keeps_default_index() {
        let config = LedgerConfig::with_store("ledger.json");

        assert_eq!(config.store_path, Some(PathBuf::from("ledger.json")));
        assert_eq!(config.index_key, ACCOUNT_INDEX_KEY);
    }
}
