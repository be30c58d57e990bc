//! Core reconciliation logic
//!
//! This module contains the reconciliation components:
//! - `config` - Matching configuration snapshot
//! - `compare` - Tolerance-based amount and date comparisons
//! - `traits` - The `MatchStrategy` abstraction shared by cross-ledger stages
//! - `matchers` - Exact, fuzzy, split, rounding and returned-transaction stages
//! - `balance` - Closing-balance computation and cross-ledger checks
//! - `engine` - Stage orchestration
//! - `report` - Category counts, status flags and color legend

pub mod balance;
pub mod compare;
pub mod config;
pub mod engine;
pub mod matchers;
pub mod report;
pub mod traits;

pub use balance::{BalanceCheck, ClosingBalance, LedgerTotals};
pub use config::MatchConfig;
pub use engine::{LedgerOutcome, ReconciliationEngine, ReconciliationResult, StageCounts};
pub use report::{CategoryCounts, MatchStatus, ReconciliationReport, COLOR_LEGEND};
pub use traits::MatchStrategy;
