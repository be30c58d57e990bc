//! Asynchronous ledger reader
//!
//! Reads a whole ledger from any `futures` `AsyncRead` source. The header is
//! validated in `new()` before any row is deserialized; malformed rows are
//! logged and skipped, keeping record indices dense.
//!
//! # Architecture
//!
//! ```text
//! tokio File -> compat -> AsyncReader -> Ledger
//!                             |
//!                      csv_format module
//!               (LedgerCsvRow, convert_ledger_row)
//! ```

use crate::io::csv_format::{convert_ledger_row, validate_headers, LedgerCsvRow};
use crate::types::{Ledger, LedgerSide, ReconError};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous CSV ledger reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    side: LedgerSide,
}

impl<R: AsyncRead + Unpin + Send> AsyncReader<R> {
    /// Wrap an async reader and validate the ledger header
    ///
    /// Configured like the synchronous reader: all fields trimmed and
    /// flexible field counts. The header is awaited and checked here, so a
    /// reader that exists always has the required columns.
    ///
    /// # Arguments
    ///
    /// * `reader` - Any `futures` `AsyncRead`, e.g. a tokio file wrapped with `compat()`
    /// * `side` - Which ledger this is, used in logs and errors
    ///
    /// # Returns
    ///
    /// * `Ok(AsyncReader)` if the header has every required column
    /// * `Err(MissingColumns)` if a required column is absent
    /// * `Err(ParseError)` if the header row itself cannot be read
    ///
    /// # Examples
    ///
    /// ```
    /// use futures::io::Cursor;
    /// use ledger_reconciler::io::AsyncReader;
    /// use ledger_reconciler::LedgerSide;
    ///
    /// # futures::executor::block_on(async {
    /// let csv = "date,description,debit,credit\n2024-01-01,Invoice,100,\n";
    /// let reader = AsyncReader::new(Cursor::new(csv.as_bytes()), LedgerSide::A)
    ///     .await
    ///     .expect("valid header");
    /// assert_eq!(reader.read_ledger().await.records.len(), 1);
    /// # });
    /// ```
    pub async fn new(reader: R, side: LedgerSide) -> Result<Self, ReconError> {
        let mut csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        let headers = csv_reader.headers().await?;
        validate_headers(side, headers.iter())?;

        Ok(Self { csv_reader, side })
    }

    /// Read every remaining row into a ledger
    pub async fn read_ledger(mut self) -> Ledger {
        let side = self.side;
        let mut records = Vec::new();
        let mut skipped = 0usize;
        let mut rows = self.csv_reader.deserialize::<LedgerCsvRow>();

        while let Some(result) = rows.next().await {
            match result {
                Ok(row) => records.push(convert_ledger_row(row, records.len())),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(ledger = %side, "Skipping row: {}", ReconError::from(e));
                }
            }
        }

        tracing::info!(
            ledger = %side,
            records = records.len(),
            skipped,
            "Loaded ledger"
        );
        Ledger::new(records)
    }
}
