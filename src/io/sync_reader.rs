//! Synchronous ledger reader with iterator interface
//!
//! Provides a streaming iterator over ledger rows from a CSV file and a
//! `read_ledger` convenience that collects them. Delegates CSV format
//! concerns to the csv_format module.
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors, missing required columns) are
//!   returned from `new()`, before any row is read
//! - Malformed rows are yielded as `ParseError`s carrying the line number;
//!   `read_ledger` logs and skips them
//!
//! Record indices are dense: a skipped row does not consume an index.

use crate::io::csv_format::{convert_ledger_row, validate_headers, LedgerCsvRow};
use crate::types::{Ledger, LedgerSide, ReconError, TransactionRecord};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Synchronous CSV ledger reader
#[derive(Debug)]
pub struct SyncReader<R: Read = File> {
    reader: csv::Reader<R>,
    headers: StringRecord,
    side: LedgerSide,
    next_index: usize,
}

impl SyncReader<File> {
    /// Open a ledger file and validate its header
    ///
    /// The header row is read and checked before any record is returned.
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields, header names included
    /// - Allow flexible field counts (short rows fill missing columns with empty values)
    /// - Use an 8KB buffer for efficient I/O
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the ledger CSV file
    /// * `side` - Which ledger this is, used in logs and errors
    ///
    /// # Returns
    ///
    /// * `Ok(SyncReader)` if the file opened and its header has every required column
    /// * `Err(FileNotFound)` if `path` does not exist
    /// * `Err(IoError)` if it cannot be opened or read
    /// * `Err(MissingColumns)` if a required column is absent
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ledger_reconciler::io::SyncReader;
    /// use ledger_reconciler::LedgerSide;
    /// use std::path::Path;
    ///
    /// match SyncReader::new(Path::new("bank.csv"), LedgerSide::A) {
    ///     Ok(reader) => println!("Loaded {} records", reader.read_ledger().records.len()),
    ///     Err(e) => eprintln!("Failed to open ledger: {}", e),
    /// }
    /// ```
    pub fn new(path: &Path, side: LedgerSide) -> Result<Self, ReconError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ReconError::file_not_found(&path.display().to_string()),
            _ => ReconError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), e),
            },
        })?;

        Self::from_reader(file, side)
    }
}

impl<R: Read> SyncReader<R> {
    /// Wrap any reader; the header is validated immediately
    pub fn from_reader(reader: R, side: LedgerSide) -> Result<Self, ReconError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        validate_headers(side, headers.iter())?;

        Ok(Self {
            reader,
            headers,
            side,
            next_index: 0,
        })
    }

    pub fn side(&self) -> LedgerSide {
        self.side
    }

    /// Read every remaining row into a ledger, skipping malformed rows
    pub fn read_ledger(self) -> Ledger {
        let side = self.side;
        let mut skipped = 0usize;

        let records: Vec<TransactionRecord> = self
            .filter_map(|result| match result {
                Ok(record) => Some(record),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(ledger = %side, "Skipping row: {}", e);
                    None
                }
            })
            .collect();

        tracing::info!(
            ledger = %side,
            records = records.len(),
            skipped,
            "Loaded ledger"
        );
        Ledger::new(records)
    }
}

impl<R: Read> Iterator for SyncReader<R> {
    type Item = Result<TransactionRecord, ReconError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut raw = StringRecord::new();
        match self.reader.read_record(&mut raw) {
            Ok(false) => None,
            Ok(true) => {
                let row = raw.deserialize::<LedgerCsvRow>(Some(&self.headers));
                Some(row.map_err(ReconError::from).map(|row| {
                    let record = convert_ledger_row(row, self.next_index);
                    self.next_index += 1;
                    record
                }))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
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

    const HEADER: &str = "date,description,debit,credit\n";

    #[test]
    fn test_sync_reader_new_opens_file() {
        let file = create_temp_csv(HEADER);

        assert!(SyncReader::new(file.path(), LedgerSide::A).is_ok());
    }

    #[test]
    fn test_sync_reader_new_fails_on_missing_file() {
        let result = SyncReader::new(Path::new("nonexistent.csv"), LedgerSide::A);

        assert_eq!(
            result.unwrap_err(),
            ReconError::file_not_found("nonexistent.csv")
        );
    }

    #[test]
    fn test_sync_reader_rejects_missing_columns_before_reading_rows() {
        let file = create_temp_csv("date,debit\n2024-01-01,10\n");

        match SyncReader::new(file.path(), LedgerSide::B) {
            Err(ReconError::MissingColumns { ledger, columns }) => {
                assert_eq!(ledger, LedgerSide::B);
                assert_eq!(columns, vec!["description", "credit"]);
            }
            other => panic!("Expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_sync_reader_iterates_records() {
        let file = create_temp_csv(
            "date,description,debit,credit,balance\n\
             2024-01-01,Rent,1200.00,,3800.00\n\
             2024-01-02,Salary,,5000\n",
        );

        let records: Vec<_> = SyncReader::new(file.path(), LedgerSide::A)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].description, "Rent");
        assert_eq!(records[0].debit, Decimal::new(1200, 0));
        assert_eq!(records[0].balance, Some(Decimal::new(3800, 0)));
        assert_eq!(records[1].index, 1);
        assert_eq!(records[1].credit, Decimal::new(5000, 0));
        assert_eq!(records[1].balance, None);
    }

    #[test]
    fn test_sync_reader_ignores_extra_columns_and_order() {
        let file = create_temp_csv(
            "ref,credit,debit,description,date\nX1,25,,Refund,2024-03-01\n",
        );

        let ledger = SyncReader::new(file.path(), LedgerSide::A)
            .unwrap()
            .read_ledger();

        assert_eq!(ledger.records.len(), 1);
        assert_eq!(ledger.records[0].credit, Decimal::new(25, 0));
        assert_eq!(ledger.records[0].description, "Refund");
    }

    #[test]
    fn test_sync_reader_handles_whitespace() {
        let file = create_temp_csv(
            " date , description , debit , credit \n  2024-01-01  ,  Fee  ,  7.5  ,  \n",
        );

        let ledger = SyncReader::new(file.path(), LedgerSide::A)
            .unwrap()
            .read_ledger();

        assert_eq!(ledger.records[0].description, "Fee");
        assert_eq!(ledger.records[0].debit, Decimal::new(75, 1));
    }

    #[test]
    fn test_read_ledger_skips_malformed_rows_with_dense_indices() {
        // The middle row is not valid UTF-8
        let content: &[u8] = b"date,description,debit,credit\n\
            2024-01-01,First,10,\n\
            2024-01-02,Bad \xFF row,20,\n\
            2024-01-03,Third,30,\n";
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content).expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");

        let ledger = SyncReader::new(file.path(), LedgerSide::A)
            .unwrap()
            .read_ledger();

        assert_eq!(ledger.records.len(), 2);
        assert_eq!(ledger.records[0].description, "First");
        assert_eq!(ledger.records[1].description, "Third");
        assert_eq!(ledger.records[1].index, 1);
    }

    #[test]
    fn test_sync_reader_is_lenient_with_values() {
        let file = create_temp_csv(&format!("{}not-a-date,Odd,abc,1e2\n", HEADER));

        let ledger = SyncReader::new(file.path(), LedgerSide::A)
            .unwrap()
            .read_ledger();

        let record = &ledger.records[0];
        assert_eq!(record.date, None);
        assert_eq!(record.debit, Decimal::ZERO);
        assert_eq!(record.credit, Decimal::new(100, 0));
    }

    #[test]
    fn test_sync_reader_handles_empty_file_after_header() {
        let file = create_temp_csv(HEADER);

        let ledger = SyncReader::new(file.path(), LedgerSide::A)
            .unwrap()
            .read_ledger();

        assert!(ledger.records.is_empty());
        assert_eq!(ledger.opening_balance, Decimal::ZERO);
    }
}
