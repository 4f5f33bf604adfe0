//! Ledger Store CLI
//!
//! Command-line interface for running ledger invocation scripts.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- script.csv > accounts.csv
//! cargo run -- --strategy sync script.csv > accounts.csv
//! cargo run -- --strategy async --batch-size 500 script.csv > accounts.csv
//! cargo run -- --store ledger.json --index-key _accountindex script.csv > accounts.csv
//! RUST_LOG=debug cargo run -- script.csv > accounts.csv
//! ```
//!
//! The program applies every invocation of the script to the ledger and writes
//! the resulting account listing to stdout. Logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, script or store unreadable, etc.)

use ledger_store::cli;
use ledger_store::strategy;
use std::process;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    let strategy = {
        let batch = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, args.to_ledger_config(), batch)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        error!(error = %e, "Processing failed");
        process::exit(1);
    }
}
