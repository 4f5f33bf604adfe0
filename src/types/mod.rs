//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: The persisted account record
//! - `amount`: Exact decimal parsing and the persisted number format
//! - `invocation`: Function-name dispatch and invocation results
//! - `error`: Error types for the ledger store

pub mod account;
pub mod amount;
pub mod error;
pub mod invocation;

pub use account::{Account, AccountNo};
pub use error::LedgerError;
pub use invocation::{Invocation, InvocationOutcome, TransferReceipt};
