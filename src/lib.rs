//! Ledger Reconciler Library
//! # Overview
//!
//! This library reconciles two independently produced ledgers of financial
//! transactions. Every record ends up in exactly one match category, and the
//! closing balances of both ledgers are checked against each other.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (records, classifications, ledgers, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Reconciliation logic:
//!   - [`core::matchers`] - The matching stages
//!   - [`core::engine`] - Stage orchestration
//!   - [`core::balance`] - Closing-balance validation
//!   - [`core::report`] - Category counts and status flags
//! - [`io`] - Ledger CSV parsing and report output
//! - [`strategy`] - Sync and async processing pipelines
//!
//! # Matching Stages
//!
//! Stages run in a fixed order, each seeing only records that earlier stages
//! left unmatched:
//!
//! 1. **Exact**: same day, mirrored (or identical) debit and credit
//! 2. **Fuzzy**: same amounts, dates up to `fuzzy_date_range` days apart
//! 3. **Split**: one record against a group of records summing to it,
//!    first from ledger A to B, then from B to A
//! 4. **Rounding**: amounts that round to the same integer
//! 5. **Returned**: a transaction and its reversal within one ledger
//!
//! Whatever is left is classified as unmatched.
//!
//! # Example
//!
//! ```
//! use ledger_reconciler::{Ledger, MatchConfig, ReconciliationEngine, TransactionRecord};
//! use rust_decimal::Decimal;
//!
//! let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1);
//! let a = Ledger::new(vec![TransactionRecord::new(0, date, "Invoice", Decimal::new(100, 0), Decimal::ZERO)]);
//! let b = Ledger::new(vec![TransactionRecord::new(0, date, "Payment", Decimal::ZERO, Decimal::new(100, 0))]);
//!
//! let result = ReconciliationEngine::new(MatchConfig::default())
//!     .reconcile(a, b)
//!     .unwrap();
//! assert_eq!(result.ledger_a.records[0].classification.to_string(), "Matched");
//! assert!(result.closing_match());
//! ```

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{
    MatchConfig, ReconciliationEngine, ReconciliationReport, ReconciliationResult,
};
pub use io::{write_annotated_ledger_csv, write_report_csv};
pub use types::{
    Classification, Ledger, LedgerSide, MatchCategory, ReconError, TransactionRecord,
};
