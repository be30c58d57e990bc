//! I/O module
//!
//! Handles ledger CSV parsing and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (header validation, row conversion, output serialization)
//! - `sync_reader` - Synchronous ledger reader with iterator interface
//! - `async_reader` - Asynchronous ledger reader

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{
    convert_ledger_row, parse_amount, parse_date, write_annotated_ledger_csv, write_report_csv,
    LedgerCsvRow, REQUIRED_COLUMNS,
};
pub use sync_reader::SyncReader;
