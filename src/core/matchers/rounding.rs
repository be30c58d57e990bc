//! Rounding-error matching
//!
//! Pairs whose mirrored amounts differ by less than `rounding_tolerance` and
//! round (half-up) to the same integer. This is a single greedy pass: the
//! first qualifying `(i, j)` in ascending order commits immediately and the
//! scan moves on to the next `i`. There is no backtracking, so a different
//! assignment could sometimes pair more records.

use crate::core::compare::{approx_eq, day_difference, round_half_up};
use crate::core::config::MatchConfig;
use crate::core::traits::MatchStrategy;
use crate::types::{Classification, LedgerWorkingState, TransactionRecord};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, Default)]
pub struct RoundingMatcher;

impl RoundingMatcher {
    /// The first amount pair of `left`/`right` that differs only by rounding
    ///
    /// Tests `(left.debit, right.credit)` then `(left.credit, right.debit)`.
    pub fn rounding_pair(
        &self,
        left: &TransactionRecord,
        right: &TransactionRecord,
        tolerance: Decimal,
    ) -> Option<(Decimal, Decimal)> {
        [(left.debit, right.credit), (left.credit, right.debit)]
            .into_iter()
            .find(|(x, y)| {
                *x > Decimal::ZERO
                    && *y > Decimal::ZERO
                    && approx_eq(*x, *y, tolerance)
                    && round_half_up(*x) == round_half_up(*y)
            })
    }
}

impl MatchStrategy for RoundingMatcher {
    fn name(&self) -> &'static str {
        "rounding errors"
    }

    fn is_enabled(&self, config: &MatchConfig) -> bool {
        config.enable_rounding_match
    }

    fn apply(
        &self,
        left: &mut LedgerWorkingState,
        right: &mut LedgerWorkingState,
        config: &MatchConfig,
    ) -> usize {
        let max_gap = u64::from(config.rounding_date_range);
        let right_indices = right.unmatched_indices();
        let mut committed = 0;

        for i in left.unmatched_indices() {
            for &j in &right_indices {
                if !right.is_unmatched(j) {
                    continue;
                }
                let (record_i, record_j) = (left.record(i), right.record(j));
                match day_difference(record_i.date, record_j.date) {
                    Some(gap) if gap <= max_gap => {}
                    _ => continue,
                }

                if let Some((x, y)) =
                    self.rounding_pair(record_i, record_j, config.rounding_tolerance)
                {
                    let classification = Classification::RoundingError { left: x, right: y };
                    left.classify(i, classification.clone());
                    right.classify(j, classification);
                    committed += 1;
                    break;
                }
            }
        }

        committed
    }
}
