//! Error types for the ledger reconciler
//!
//! This module defines all error types that can occur while loading ledgers,
//! reconciling them and writing results.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Errors**: Malformed CSV rows (recoverable, the row is skipped)
//! - **Schema Errors**: A ledger lacks a required column (fatal)
//! - **Configuration Errors**: Out-of-range matching options (fatal)
//! - **Arithmetic Errors**: A ledger total exceeds the decimal range (fatal)
//! - **Output Errors**: The report or annotated ledgers cannot be written

use crate::types::LedgerSide;
use thiserror::Error;

/// Main error type for the ledger reconciler
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// This is a recoverable error - the malformed row is skipped
    /// and loading continues with the next row.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A ledger is missing one or more required columns
    ///
    /// This is fatal: the whole reconciliation is aborted and no partial
    /// output is produced.
    #[error("{ledger} is missing required columns: {}", columns.join(", "))]
    MissingColumns {
        /// Ledger whose header is incomplete
        ledger: LedgerSide,
        /// Every required column that was not found
        columns: Vec<String>,
    },

    /// A matching option is out of range
    #[error("Invalid configuration for {option}: {message}")]
    InvalidConfig {
        /// Name of the offending option
        option: String,
        /// Why the value was rejected
        message: String,
    },

    /// A ledger total left the representable decimal range
    ///
    /// This is fatal: closing figures built from a wrapped or truncated sum
    /// would be meaningless.
    #[error("Arithmetic overflow in {operation} for {ledger}")]
    ArithmeticOverflow {
        /// Sum that would overflow
        operation: String,
        /// Ledger being totalled
        ledger: LedgerSide,
    },

    /// Writing the report or an annotated ledger failed
    #[error("Write error: {message}")]
    WriteError {
        /// Description of the write failure
        message: String,
    },
}

// Conversion from io::Error to ReconError
impl From<std::io::Error> for ReconError {
    fn from(error: std::io::Error) -> Self {
        ReconError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to ReconError
impl From<csv::Error> for ReconError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        ReconError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for ReconError {
    fn from(error: csv_async::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        ReconError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl ReconError {
    /// Create a FileNotFound error
    pub fn file_not_found(path: &str) -> Self {
        ReconError::FileNotFound {
            path: path.to_string(),
        }
    }

    /// Create a MissingColumns error
    pub fn missing_columns(ledger: LedgerSide, columns: &[&str]) -> Self {
        ReconError::MissingColumns {
            ledger,
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(option: &str, message: impl Into<String>) -> Self {
        ReconError::InvalidConfig {
            option: option.to_string(),
            message: message.into(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, ledger: LedgerSide) -> Self {
        ReconError::ArithmeticOverflow {
            operation: operation.to_string(),
            ledger,
        }
    }

    /// Create a WriteError
    pub fn write_error(message: impl Into<String>) -> Self {
        ReconError::WriteError {
            message: message.into(),
        }
    }
}
