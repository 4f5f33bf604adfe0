//! Ledger Store Library
//! # Overview
//!
//! This library provides an account ledger on top of a plain key-value record
//! store, with a CSV script runner offering both a sync and an async strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Invocation, LedgerError, amounts)
//! - [`config`] - Store and index settings
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Ledger components:
//!   - [`core::record_store`] - Raw key-value stores (memory, JSON file)
//!   - [`core::account_index`] - The persisted list of account numbers
//!   - [`core::engine`] - Account creation, transfers and raw record access
//! - [`io`] - Script reading and account output
//! - [`strategy`] - Sync and async script processing
//!
//! # Operations
//!
//! - **read / write / delete**: raw record access; delete also drops the key
//!   from the account index
//! - **init_account**: create an account with a non-negative opening balance
//! - **transfer_balance**: move a non-negative amount between two accounts,
//!   never leaving the source below zero
//! - **init**: write `test_key` and reset the account index
//!
//! # Records
//!
//! Accounts are stored as JSON under their account number with the balance as
//! a scientific-notation string (`"1E+02"`). The index is a JSON array of
//! account numbers under `_accountindex`.

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use config::LedgerConfig;
pub use core::{AccountIndex, JsonFileStore, LedgerEngine, MemoryStore, RecordStore};
pub use io::write_accounts_csv;
pub use types::{Account, AccountNo, Invocation, InvocationOutcome, LedgerError};
