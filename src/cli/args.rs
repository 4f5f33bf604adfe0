use crate::config::LedgerConfig;
use crate::core::ACCOUNT_INDEX_KEY;
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Run ledger invocation scripts against a key-value record store
#[derive(Parser, Debug)]
#[command(name = "ledger-store")]
#[command(about = "Run ledger invocation scripts against a key-value record store", long_about = None)]
pub struct CliArgs {
    /// Input CSV script of invocations
    #[arg(value_name = "INPUT", help = "Path to the input CSV script")]
    pub input_file: PathBuf,

    /// Processing strategy to use
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Number of invocations per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of invocations per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// JSON file the records are kept in
    #[arg(
        long = "store",
        value_name = "PATH",
        help = "JSON file to load records from and persist them to (default: in memory)"
    )]
    pub store: Option<PathBuf>,

    /// Record key of the account index
    #[arg(
        long = "index-key",
        value_name = "KEY",
        default_value = ACCOUNT_INDEX_KEY,
        help = "Record key under which the account index is kept"
    )]
    pub index_key: String,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Falls back to defaults when no batch size is given; a zero batch size is
    /// replaced by the default with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        match self.batch_size {
            Some(batch_size) => BatchConfig::new(batch_size),
            None => BatchConfig::default(),
        }
    }

    /// Create a LedgerConfig from CLI arguments
    pub fn to_ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            store_path: self.store.clone(),
            index_key: self.index_key.clone(),
        }
    }
}
