//! Date-tolerant matching
//!
//! Same amount predicate as exact matching, but the dates must be between 1
//! and `fuzzy_date_range` days apart (same-day pairs belong to the exact
//! stage). Candidates are committed closest-gap first; equal gaps keep their
//! enumeration order.

use crate::core::compare::{amounts_correspond, day_difference};
use crate::core::config::MatchConfig;
use crate::core::traits::MatchStrategy;
use crate::types::{Classification, LedgerWorkingState, RecordIndex};

/// A fuzzy candidate pair and its day gap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyCandidate {
    pub left: RecordIndex,
    pub right: RecordIndex,
    pub day_gap: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyMatcher;

impl FuzzyMatcher {
    /// Candidate pairs sorted by ascending day gap
    pub fn candidates(
        &self,
        left: &LedgerWorkingState,
        right: &LedgerWorkingState,
        config: &MatchConfig,
    ) -> Vec<FuzzyCandidate> {
        let max_gap = u64::from(config.fuzzy_date_range);
        let right_indices = right.unmatched_indices();
        let mut candidates = Vec::new();

        for i in left.unmatched_indices() {
            let record_i = left.record(i);
            for &j in &right_indices {
                let record_j = right.record(j);
                if !amounts_correspond(record_i, record_j, config.match_tolerance) {
                    continue;
                }
                let Some(day_gap) = day_difference(record_i.date, record_j.date) else {
                    continue;
                };
                if (1..=max_gap).contains(&day_gap) {
                    candidates.push(FuzzyCandidate {
                        left: i,
                        right: j,
                        day_gap,
                    });
                }
            }
        }

        // Stable sort: equal gaps stay in (i, j) order
        candidates.sort_by_key(|candidate| candidate.day_gap);
        candidates
    }
}

impl MatchStrategy for FuzzyMatcher {
    fn name(&self) -> &'static str {
        "fuzzy matches"
    }

    fn is_enabled(&self, config: &MatchConfig) -> bool {
        config.enable_fuzzy_match
    }

    fn apply(
        &self,
        left: &mut LedgerWorkingState,
        right: &mut LedgerWorkingState,
        config: &MatchConfig,
    ) -> usize {
        let mut committed = 0;

        for candidate in self.candidates(left, right, config) {
            if left.is_unmatched(candidate.left) && right.is_unmatched(candidate.right) {
                left.classify(candidate.left, Classification::MatchedCheckDate);
                right.classify(candidate.right, Classification::MatchedCheckDate);
                committed += 1;
            }
        }

        committed
    }
}
