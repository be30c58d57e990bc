//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `ledger`: Ledger input and per-run working state
//! - `transaction`: Transaction records, classifications and categories
//! - `error`: Error types for the reconciler

pub mod error;
pub mod ledger;
pub mod transaction;

pub use error::ReconError;
pub use ledger::{Ledger, LedgerSide, LedgerWorkingState};
pub use transaction::{
    format_amount, Classification, Direction, MatchCategory, RecordIndex, TransactionRecord,
};
