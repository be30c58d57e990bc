//! Split-transaction matching
//!
//! A one-sided record in the source ledger is matched against a group of
//! target records whose opposite-side amounts add up to it. The search is
//! bounded: single candidates, then pairs, then an exhaustive subset scan
//! only when the pool has at most [`EXHAUSTIVE_SEARCH_LIMIT`] members.
//! Larger pools without a single or pair hit yield no split.
//!
//! The engine runs this stage twice (A to B, then B to A). Records consumed
//! by the first pass are gone for the second.

use crate::core::compare::{approx_eq, day_difference};
use crate::core::config::MatchConfig;
use crate::core::traits::MatchStrategy;
use crate::types::{Classification, LedgerWorkingState, RecordIndex};
use rust_decimal::Decimal;

/// Largest candidate pool searched exhaustively
pub const EXHAUSTIVE_SEARCH_LIMIT: usize = 10;

/// Outcome of a subset-sum search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubsetMatch {
    /// The required amount is within tolerance of zero; there is nothing
    /// to match and the caller must not treat this as a match
    NotNeeded,
    /// Target indices whose amounts sum to the required amount
    Found(Vec<RecordIndex>),
    NotFound,
}

/// Find a subset of `candidates` summing to `target` within `tolerance`
///
/// Search order: a single candidate, then the first pair in `(i, j)` order,
/// then (for pools of at most [`EXHAUSTIVE_SEARCH_LIMIT`]) every non-empty
/// subset in ascending bitmask order. The first hit wins.
pub fn subset_sum(
    candidates: &[(RecordIndex, Decimal)],
    target: Decimal,
    tolerance: Decimal,
) -> SubsetMatch {
    if target.abs() < tolerance {
        return SubsetMatch::NotNeeded;
    }

    if let Some((index, _)) = candidates
        .iter()
        .find(|(_, amount)| approx_eq(*amount, target, tolerance))
    {
        return SubsetMatch::Found(vec![*index]);
    }

    for (position, (index_i, amount_i)) in candidates.iter().enumerate() {
        for (index_j, amount_j) in &candidates[position + 1..] {
            let pair_sum = amount_i.checked_add(*amount_j);
            if pair_sum.is_some_and(|sum| approx_eq(sum, target, tolerance)) {
                return SubsetMatch::Found(vec![*index_i, *index_j]);
            }
        }
    }

    let n = candidates.len();
    if n <= EXHAUSTIVE_SEARCH_LIMIT {
        for mask in 1u32..(1u32 << n) {
            let mut chosen = Vec::new();
            // None once the running sum overflows
            let mut sum = Some(Decimal::ZERO);
            for (bit, (index, amount)) in candidates.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    chosen.push(*index);
                    sum = sum.and_then(|s| s.checked_add(*amount));
                }
            }
            if sum.is_some_and(|sum| approx_eq(sum, target, tolerance)) {
                return SubsetMatch::Found(chosen);
            }
        }
    }

    SubsetMatch::NotFound
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SplitMatcher;

impl SplitMatcher {
    /// Target records eligible to be part of a split for `source_index`
    ///
    /// Returns `None` when the source record is not one-sided or has no date.
    /// Otherwise returns the required amount and the pool of
    /// `(target index, opposite-side amount)` within the date window.
    pub fn candidate_pool(
        &self,
        source: &LedgerWorkingState,
        target: &LedgerWorkingState,
        source_index: RecordIndex,
        config: &MatchConfig,
    ) -> Option<(Decimal, Vec<(RecordIndex, Decimal)>)> {
        let record = source.record(source_index);
        let (required, direction) = record.one_sided_amount()?;
        record.date?;

        let max_gap = u64::from(config.split_match_date_range);
        let pool = target
            .unmatched_indices()
            .into_iter()
            .filter_map(|j| {
                let candidate = target.record(j);
                let amount = candidate.amount(direction.opposite());
                if amount <= Decimal::ZERO {
                    return None;
                }
                match day_difference(record.date, candidate.date) {
                    Some(gap) if gap <= max_gap => Some((j, amount)),
                    _ => None,
                }
            })
            .collect();

        Some((required, pool))
    }
}

impl MatchStrategy for SplitMatcher {
    fn name(&self) -> &'static str {
        "split transactions"
    }

    fn is_enabled(&self, config: &MatchConfig) -> bool {
        config.enable_split_match
    }

    fn apply(
        &self,
        source: &mut LedgerWorkingState,
        target: &mut LedgerWorkingState,
        config: &MatchConfig,
    ) -> usize {
        let mut committed = 0;

        for i in source.unmatched_indices() {
            let Some((required, pool)) = self.candidate_pool(source, target, i, config) else {
                continue;
            };

            match subset_sum(&pool, required, config.match_tolerance) {
                SubsetMatch::Found(chosen) => {
                    source.classify(i, Classification::SplitTransaction);
                    for j in chosen {
                        target.classify(j, Classification::SplitTransaction);
                    }
                    committed += 1;
                }
                SubsetMatch::NotNeeded | SubsetMatch::NotFound => {}
            }
        }

        committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matchers::test_support::{ledger, rec, rec_dec};
    use crate::types::{LedgerSide, MatchCategory};
    use rstest::rstest;

    fn tol() -> Decimal {
        Decimal::new(1, 2)
    }

    fn pool(amounts: &[i64]) -> Vec<(RecordIndex, Decimal)> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, a)| (i, Decimal::new(*a, 0)))
            .collect()
    }

    #[rstest]
    #[case::single(&[40, 150, 60], 150, SubsetMatch::Found(vec![1]))]
    #[case::pair(&[100, 30, 50], 150, SubsetMatch::Found(vec![0, 2]))]
    #[case::first_pair_wins(&[70, 80, 20, 130], 150, SubsetMatch::Found(vec![0, 1]))]
    #[case::triple(&[10, 20, 40, 500], 70, SubsetMatch::Found(vec![0, 1, 2]))]
    #[case::none(&[10, 20], 150, SubsetMatch::NotFound)]
    #[case::empty_pool(&[], 150, SubsetMatch::NotFound)]
    fn test_subset_sum(
        #[case] amounts: &[i64],
        #[case] target: i64,
        #[case] expected: SubsetMatch,
    ) {
        assert_eq!(
            subset_sum(&pool(amounts), Decimal::new(target, 0), tol()),
            expected
        );
    }

    #[test]
    fn test_subset_sum_near_zero_target_is_not_needed() {
        assert_eq!(
            subset_sum(&pool(&[1, 2]), Decimal::new(5, 3), tol()),
            SubsetMatch::NotNeeded
        );
    }

    #[test]
    fn test_subset_sum_skips_exhaustive_search_for_large_pools() {
        // 11 candidates, only a triple adds up: no single or pair hit
        let amounts = [1, 2, 4, 1000, 1000, 1000, 1000, 1000, 1000, 1000, 1000];
        assert_eq!(
            subset_sum(&pool(&amounts), Decimal::new(7, 0), tol()),
            SubsetMatch::NotFound
        );
        assert_eq!(
            subset_sum(&pool(&amounts[..10]), Decimal::new(7, 0), tol()),
            SubsetMatch::Found(vec![0, 1, 2])
        );
    }

    #[rstest]
    // MAX + MAX and MAX + small overflow; 2 + 3 is the first pair that fits
    #[case::pair(5, SubsetMatch::Found(vec![2, 3]))]
    // Every mask below 0b11100 either overflows or misses 7
    #[case::exhaustive(7, SubsetMatch::Found(vec![2, 3, 4]))]
    fn test_subset_sum_treats_overflowing_sums_as_misses(
        #[case] target: i64,
        #[case] expected: SubsetMatch,
    ) {
        let candidates = [
            (0, Decimal::MAX),
            (1, Decimal::MAX),
            (2, Decimal::new(2, 0)),
            (3, Decimal::new(3, 0)),
            (4, Decimal::new(2, 0)),
        ];

        assert_eq!(
            subset_sum(&candidates, Decimal::new(target, 0), tol()),
            expected
        );
    }

    #[test]
    fn test_near_zero_source_is_left_alone() {
        let half_cent = Decimal::new(5, 3);
        let mut a = ledger(
            LedgerSide::A,
            vec![rec_dec(Some("2024-01-01"), half_cent, Decimal::ZERO)],
        );
        let mut b = ledger(
            LedgerSide::B,
            vec![
                rec_dec(Some("2024-01-01"), Decimal::ZERO, half_cent),
                rec(Some("2024-01-01"), 0, 1),
            ],
        );

        let committed = SplitMatcher.apply(&mut a, &mut b, &MatchConfig::default());

        assert_eq!(committed, 0);
        assert!(a.is_unmatched(0));
        assert_eq!(b.unmatched_len(), 2);
        assert!(b.category_rows(MatchCategory::SplitTransaction).is_empty());
    }

    #[test]
    fn test_split_debit_against_two_credits() {
        let mut a = ledger(LedgerSide::A, vec![rec(Some("2024-01-01"), 150, 0)]);
        let mut b = ledger(
            LedgerSide::B,
            vec![
                rec(Some("2024-01-01"), 0, 100),
                rec(Some("2024-01-02"), 0, 50),
            ],
        );

        let committed = SplitMatcher.apply(&mut a, &mut b, &MatchConfig::default());

        assert_eq!(committed, 1);
        assert_eq!(a.record(0).classification, Classification::SplitTransaction);
        assert_eq!(b.category_rows(MatchCategory::SplitTransaction), &[0, 1]);
        assert_eq!(b.unmatched_len(), 0);
    }

    #[test]
    fn test_split_ignores_targets_outside_date_window() {
        let mut a = ledger(LedgerSide::A, vec![rec(Some("2024-01-01"), 150, 0)]);
        let mut b = ledger(
            LedgerSide::B,
            vec![
                rec(Some("2024-01-01"), 0, 100),
                rec(Some("2024-01-05"), 0, 50),
            ],
        );

        assert_eq!(
            SplitMatcher.apply(&mut a, &mut b, &MatchConfig::default()),
            0
        );
        assert!(a.is_unmatched(0));
        assert_eq!(b.unmatched_len(), 2);
    }

    #[test]
    fn test_split_uses_opposite_side_of_target() {
        // Source credit needs target debits; target credits are ignored
        let mut a = ledger(LedgerSide::A, vec![rec(Some("2024-01-01"), 0, 90)]);
        let mut b = ledger(
            LedgerSide::B,
            vec![
                rec(Some("2024-01-01"), 0, 90),
                rec(Some("2024-01-01"), 40, 0),
                rec(Some("2024-01-01"), 50, 0),
            ],
        );

        assert_eq!(
            SplitMatcher.apply(&mut a, &mut b, &MatchConfig::default()),
            1
        );
        assert!(b.is_unmatched(0));
        assert_eq!(b.category_rows(MatchCategory::SplitTransaction), &[1, 2]);
    }

    #[rstest]
    #[case::both_sides(rec(Some("2024-01-01"), 10, 10))]
    #[case::both_zero(rec(Some("2024-01-01"), 0, 0))]
    #[case::missing_date(rec(None, 10, 0))]
    fn test_split_skips_ineligible_sources(#[case] source: crate::types::TransactionRecord) {
        let mut a = ledger(LedgerSide::A, vec![source]);
        let mut b = ledger(LedgerSide::B, vec![rec(Some("2024-01-01"), 0, 10)]);

        assert_eq!(
            SplitMatcher.apply(&mut a, &mut b, &MatchConfig::default()),
            0
        );
    }

    #[test]
    fn test_target_consumed_by_earlier_source_is_unavailable() {
        let mut a = ledger(
            LedgerSide::A,
            vec![
                rec(Some("2024-01-01"), 100, 0),
                rec(Some("2024-01-01"), 100, 0),
            ],
        );
        let mut b = ledger(LedgerSide::B, vec![rec(Some("2024-01-01"), 0, 100)]);

        assert_eq!(
            SplitMatcher.apply(&mut a, &mut b, &MatchConfig::default()),
            1
        );
        assert!(!a.is_unmatched(0));
        assert!(a.is_unmatched(1));
    }
}
