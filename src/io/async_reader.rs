//! Asynchronous CSV reader with batch interface
//!
//! Provides a streaming interface over invocations from a script.
//! Supports batch reading for the async processing strategy.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - a reused `StringRecord` buffer, since script rows vary in width
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of Invocations
//!                  ↓
//!           csv_format module
//!           (convert_script_fields)
//! ```

use crate::io::csv_format::convert_script_fields;
use crate::types::Invocation;
use csv_async::{AsyncReaderBuilder, StringRecord};
use futures::io::AsyncRead;
use tracing::warn;

/// Asynchronous script reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncReader<R>,
    record: StringRecord,
}

impl<R: AsyncRead + Unpin + Send> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    ///
    /// Configured the same way as the synchronous reader: untrimmed fields,
    /// flexible row width and `#` comment lines.
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .comment(Some(b'#'))
            .create_reader(reader);

        Self {
            csv_reader,
            record: StringRecord::new(),
        }
    }

    /// Read a batch of invocations
    ///
    /// Reads rows until `batch_size` valid invocations are collected or the
    /// script ends. Invalid rows are logged and skipped, so an empty batch
    /// always means the end of the script.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<Invocation> {
        let mut batch = Vec::with_capacity(batch_size);

        while batch.len() < batch_size {
            match self.csv_reader.read_record(&mut self.record).await {
                Ok(true) => {
                    let line = self
                        .record
                        .position()
                        .map(|position| position.line())
                        .unwrap_or_default();
                    match convert_script_fields(self.record.iter()) {
                        Ok(invocation) => batch.push(invocation),
                        Err(e) => warn!(line, error = %e, "Skipping invalid script row"),
                    }
                }
                Ok(false) => break,
                Err(e) => warn!(
                    line = self.csv_reader.position().line(),
                    error = %e,
                    "Skipping unreadable script row"
                ),
            }
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::io::Cursor;

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let csv_content = "function,args\nread,a\nwrite,b,1\ndelete,c\n";
        let reader = Cursor::new(csv_content.as_bytes());
        let mut async_reader = AsyncReader::new(reader);

        let batch = async_reader.read_batch(2).await;
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].function(), "read");
        assert_eq!(batch[1].function(), "write");

        let batch = async_reader.read_batch(2).await;
        assert_eq!(
            batch,
            vec![Invocation::Delete {
                name: "c".to_string()
            }]
        );

        assert!(async_reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let reader = Cursor::new("function,args\n".as_bytes());
        let mut async_reader = AsyncReader::new(reader);

        assert!(async_reader.read_batch(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_skips_invalid_rows_without_ending_batch() {
        let csv_content = "function,args\nmint,A1\nread\nread,A1\n";
        let reader = Cursor::new(csv_content.as_bytes());
        let mut async_reader = AsyncReader::new(reader);

        let batch = async_reader.read_batch(1).await;

        assert_eq!(
            batch,
            vec![Invocation::Read {
                name: "A1".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_async_reader_comments_and_whitespace() {
        let csv_content = "function,args\n# comment\n  init_account ,A1,Bob,USD,1\nwrite,k, v \n";
        let reader = Cursor::new(csv_content.as_bytes());
        let mut async_reader = AsyncReader::new(reader);

        let batch = async_reader.read_batch(10).await;

        assert_eq!(
            batch,
            vec![
                Invocation::InitAccount {
                    account_no: "A1".to_string(),
                    legal_entity: "Bob".to_string(),
                    currency: "USD".to_string(),
                    initial_balance: "1".to_string(),
                },
                Invocation::Write {
                    name: "k".to_string(),
                    value: " v ".to_string(),
                },
            ]
        );
    }
}
