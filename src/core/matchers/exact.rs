//! Same-day exact matching
//!
//! All qualifying pairs are collected first, then committed in ascending
//! `(i, j)` order. A candidate commits only if both sides are still
//! unmatched, since an earlier commit in the same pass may have consumed one
//! of them. First-found wins; the assignment is greedy, not optimal.

use crate::core::compare::{amounts_correspond, calendar_dates_equal};
use crate::core::config::MatchConfig;
use crate::core::traits::MatchStrategy;
use crate::types::{Classification, LedgerWorkingState, RecordIndex};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatcher;

impl ExactMatcher {
    /// Every `(i, j)` pair on the same calendar day with corresponding amounts
    pub fn candidates(
        &self,
        left: &LedgerWorkingState,
        right: &LedgerWorkingState,
        config: &MatchConfig,
    ) -> Vec<(RecordIndex, RecordIndex)> {
        let right_indices = right.unmatched_indices();
        let mut candidates = Vec::new();

        for i in left.unmatched_indices() {
            let record_i = left.record(i);
            for &j in &right_indices {
                let record_j = right.record(j);
                if calendar_dates_equal(record_i.date, record_j.date)
                    && amounts_correspond(record_i, record_j, config.match_tolerance)
                {
                    candidates.push((i, j));
                }
            }
        }

        candidates
    }
}

impl MatchStrategy for ExactMatcher {
    fn name(&self) -> &'static str {
        "exact matches"
    }

    fn is_enabled(&self, config: &MatchConfig) -> bool {
        config.enable_exact_match
    }

    fn apply(
        &self,
        left: &mut LedgerWorkingState,
        right: &mut LedgerWorkingState,
        config: &MatchConfig,
    ) -> usize {
        let mut committed = 0;

        for (i, j) in self.candidates(left, right, config) {
            if left.is_unmatched(i) && right.is_unmatched(j) {
                left.classify(i, Classification::Matched);
                right.classify(j, Classification::Matched);
                committed += 1;
            }
        }

        committed
    }
}
