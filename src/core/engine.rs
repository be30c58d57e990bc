//! Reconciliation engine
//!
//! This module provides the ReconciliationEngine that runs the matching
//! stages over two ledgers in a fixed order:
//!
//! Exact -> Fuzzy -> Split(A to B) -> Split(B to A) -> Rounding ->
//! Returned(A) -> Returned(B) -> finalize remaining records as Unmatched.
//!
//! Stage order matters: each stage only sees records that earlier stages
//! left in the unmatched sets. The engine is a pure, synchronous
//! computation; it owns both working states for the duration of one call.

use crate::core::balance::{BalanceCheck, LedgerTotals};
use crate::core::config::MatchConfig;
use crate::core::matchers::{
    ExactMatcher, FuzzyMatcher, ReturnedTransactionMatcher, RoundingMatcher, SplitMatcher,
};
use crate::core::traits::MatchStrategy;
use crate::types::{
    Ledger, LedgerSide, LedgerWorkingState, MatchCategory, ReconError, RecordIndex,
    TransactionRecord,
};
use std::collections::BTreeMap;
use tracing::instrument;

/// Number of pairs (or groups) each stage committed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageCounts {
    pub exact: usize,
    pub fuzzy: usize,
    pub split_a_to_b: usize,
    pub split_b_to_a: usize,
    pub rounding: usize,
    pub returned_a: usize,
    pub returned_b: usize,
    pub unmatched_a: usize,
    pub unmatched_b: usize,
}

/// Final classification of one ledger
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerOutcome {
    pub side: LedgerSide,
    /// Records in input order, each carrying its final classification
    pub records: Vec<TransactionRecord>,
    /// Indices per category, in commit order
    pub category_rows: BTreeMap<MatchCategory, Vec<RecordIndex>>,
}

impl LedgerOutcome {
    fn from_state(state: LedgerWorkingState) -> Self {
        let side = state.side();
        let (records, category_rows) = state.into_parts();
        LedgerOutcome {
            side,
            records,
            category_rows,
        }
    }

    pub fn rows(&self, category: MatchCategory) -> &[RecordIndex] {
        self.category_rows
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Result of one reconciliation run
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationResult {
    pub ledger_a: LedgerOutcome,
    pub ledger_b: LedgerOutcome,
    pub balance: BalanceCheck,
    pub stages: StageCounts,
}

impl ReconciliationResult {
    pub fn closing_match(&self) -> bool {
        self.balance.closing_match
    }

    pub fn total_match(&self) -> bool {
        self.balance.total_match
    }

    pub fn outcome(&self, side: LedgerSide) -> &LedgerOutcome {
        match side {
            LedgerSide::A => &self.ledger_a,
            LedgerSide::B => &self.ledger_b,
        }
    }
}

/// Reconciliation engine
///
/// Holds the configuration snapshot; every call to
/// [`ReconciliationEngine::reconcile`] builds fresh working states, so one
/// engine can serve any number of independent runs.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    config: MatchConfig,
}

impl ReconciliationEngine {
    pub fn new(config: MatchConfig) -> Self {
        ReconciliationEngine { config }
    }

    /// Reconcile two ledgers
    ///
    /// # Errors
    ///
    /// * `InvalidConfig` if the configuration fails validation
    /// * `ArithmeticOverflow` if a ledger's totals exceed the decimal range
    #[instrument(skip_all, fields(records_a = ledger_a.records.len(), records_b = ledger_b.records.len()))]
    pub fn reconcile(
        &self,
        ledger_a: Ledger,
        ledger_b: Ledger,
    ) -> Result<ReconciliationResult, ReconError> {
        self.config.validate()?;
        let config = &self.config;

        let Ledger {
            records: records_a,
            opening_balance: opening_a,
        } = ledger_a;
        let Ledger {
            records: records_b,
            opening_balance: opening_b,
        } = ledger_b;

        let mut a = LedgerWorkingState::new(LedgerSide::A, records_a);
        let mut b = LedgerWorkingState::new(LedgerSide::B, records_b);
        let mut stages = StageCounts::default();

        stages.exact = ExactMatcher.run(&mut a, &mut b, config);
        stages.fuzzy = FuzzyMatcher.run(&mut a, &mut b, config);
        stages.split_a_to_b = SplitMatcher.run(&mut a, &mut b, config);
        stages.split_b_to_a = SplitMatcher.run(&mut b, &mut a, config);
        stages.rounding = RoundingMatcher.run(&mut a, &mut b, config);
        stages.returned_a = ReturnedTransactionMatcher.apply(&mut a, config);
        stages.returned_b = ReturnedTransactionMatcher.apply(&mut b, config);
        stages.unmatched_a = a.finalize_unmatched();
        stages.unmatched_b = b.finalize_unmatched();

        tracing::info!(
            unmatched_a = stages.unmatched_a,
            unmatched_b = stages.unmatched_b,
            "Finalized unmatched records"
        );

        let balance = BalanceCheck::new(
            LedgerTotals::compute(LedgerSide::A, a.records(), opening_a)?,
            LedgerTotals::compute(LedgerSide::B, b.records(), opening_b)?,
            config.match_tolerance,
        );
        tracing::info!(
            closing_match = balance.closing_match,
            total_match = balance.total_match,
            "Balance validation complete"
        );

        Ok(ReconciliationResult {
            ledger_a: LedgerOutcome::from_state(a),
            ledger_b: LedgerOutcome::from_state(b),
            balance,
            stages,
        })
    }
}
