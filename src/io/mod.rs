//! I/O module
//!
//! Handles script parsing and account output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (row conversion, account serialization)
//! - `sync_reader` - Synchronous script reader with iterator interface
//! - `async_reader` - Asynchronous script reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{convert_script_fields, write_accounts_csv};
pub use sync_reader::SyncReader;
