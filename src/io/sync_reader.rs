//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over invocations from a script file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Design
//!
//! The SyncReader uses csv::Reader to read raw string records sequentially,
//! since script rows have a different number of fields per function. A single
//! `StringRecord` buffer is reused for every row.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding Result<Invocation, String>
//! for each script row:
//!
//! ```no_run
//! use ledger_store::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("script.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(invocation) => println!("Invoking: {}", invocation.function()),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found) are returned from `new()`
//! - Individual row errors are yielded as Err variants in the iterator
//! - Line numbers are included in error messages for debugging

use crate::io::csv_format::convert_script_fields;
use crate::types::Invocation;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::path::Path;

/// Synchronous script reader
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    record: StringRecord,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader is configured to:
    /// - Pass fields through untrimmed (only the function name is trimmed later)
    /// - Allow a different field count on every row
    /// - Skip lines starting with `#`
    ///
    /// # Returns
    ///
    /// * `Ok(SyncReader)` if file opened successfully
    /// * `Err(String)` if file could not be opened
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let reader = ReaderBuilder::new()
            .flexible(true)
            .comment(Some(b'#'))
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            record: StringRecord::new(),
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<Invocation, String>;

    /// Get the next invocation from the script
    ///
    /// # Returns
    ///
    /// * `Some(Ok(Invocation))` - Successfully parsed row
    /// * `Some(Err(String))` - Parse or conversion error with line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let line = self
                    .record
                    .position()
                    .map(|position| position.line())
                    .unwrap_or_default();
                Some(
                    convert_script_fields(self.record.iter())
                        .map_err(|e| format!("Line {}: {}", line, e)),
                )
            }
            Err(e) => Some(Err(format!(
                "Line {}: CSV parse error: {}",
                self.reader.position().line(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_sync_reader_new_fails_on_missing_file() {
        let result = SyncReader::new(Path::new("nonexistent.csv"));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[test]
    fn test_sync_reader_reads_rows_of_different_widths() {
        let csv_content = "function,args\n\
            init_account,A1,Bob,USD,100.00\n\
            read,A1\n\
            transfer_balance,A1,A2,5\n";
        let file = create_temp_csv(csv_content);

        let reader = SyncReader::new(file.path()).unwrap();
        let invocations: Vec<_> = reader.collect::<Result<_, _>>().unwrap();

        assert_eq!(invocations.len(), 3);
        assert_eq!(invocations[0].function(), "init_account");
        assert_eq!(
            invocations[1],
            Invocation::Read {
                name: "A1".to_string()
            }
        );
        assert_eq!(invocations[2].function(), "transfer_balance");
    }

    #[test]
    fn test_sync_reader_handles_whitespace() {
        let csv_content = "function,args\n  write  ,k,  v  \nwrite,k2,\"  padded\"\n";
        let file = create_temp_csv(csv_content);

        let reader = SyncReader::new(file.path()).unwrap();
        let invocations: Vec<_> = reader.collect();

        assert_eq!(
            invocations,
            vec![
                Ok(Invocation::Write {
                    name: "k".to_string(),
                    value: "  v  ".to_string(),
                }),
                Ok(Invocation::Write {
                    name: "k2".to_string(),
                    value: "  padded".to_string(),
                }),
            ]
        );
    }

    #[test]
    fn test_sync_reader_skips_comments() {
        let csv_content = "function,args\n# seed data\nread,A1\n";
        let file = create_temp_csv(csv_content);

        let reader = SyncReader::new(file.path()).unwrap();
        let invocations: Vec<_> = reader.collect();

        assert_eq!(invocations.len(), 1);
        assert!(invocations[0].is_ok());
    }

    #[test]
    fn test_sync_reader_includes_line_numbers_in_errors() {
        let csv_content = "function,args\nread,A1\nmint,A1\nread,A2\n";
        let file = create_temp_csv(csv_content);

        let reader = SyncReader::new(file.path()).unwrap();
        let invocations: Vec<_> = reader.collect();

        assert_eq!(invocations.len(), 3);
        assert!(invocations[0].is_ok());
        assert!(invocations[2].is_ok());

        let error = invocations[1].as_ref().unwrap_err();
        assert!(error.contains("Line 3"));
        assert!(error.contains("unknown function invocation: mint"));
    }

    #[test]
    fn test_sync_reader_reports_wrong_arity() {
        let csv_content = "function,args\ntransfer_balance,A1,A2\n";
        let file = create_temp_csv(csv_content);

        let reader = SyncReader::new(file.path()).unwrap();
        let invocations: Vec<_> = reader.collect();

        let error = invocations[0].as_ref().unwrap_err();
        assert!(error.contains("expecting 3, got 2"));
    }

    #[test]
    fn test_sync_reader_handles_empty_file_after_header() {
        let file = create_temp_csv("function,args\n");

        let reader = SyncReader::new(file.path()).unwrap();

        assert_eq!(reader.count(), 0);
    }
}
