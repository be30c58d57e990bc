//! Returned (reversed) transaction detection within one ledger
//!
//! A pure debit followed, within a day, by a pure credit of the same amount
//! in the same ledger (or the other way round) is a transaction that was
//! booked and then returned. There is no enable flag and no cross-ledger
//! variant; the engine runs it once per ledger.

use crate::core::compare::{approx_eq, day_difference};
use crate::core::config::MatchConfig;
use crate::types::{Classification, LedgerWorkingState, TransactionRecord};

/// Largest day gap between a transaction and its reversal
pub const RETURN_DATE_RANGE: u64 = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnedTransactionMatcher;

impl ReturnedTransactionMatcher {
    /// Whether `later` reverses `earlier`
    pub fn is_reversal(
        &self,
        earlier: &TransactionRecord,
        later: &TransactionRecord,
        config: &MatchConfig,
    ) -> bool {
        match day_difference(earlier.date, later.date) {
            Some(gap) if gap <= RETURN_DATE_RANGE => {}
            _ => return false,
        }

        match (earlier.one_sided_amount(), later.one_sided_amount()) {
            (Some((amount_i, direction_i)), Some((amount_j, direction_j))) => {
                direction_i == direction_j.opposite()
                    && approx_eq(amount_i, amount_j, config.match_tolerance)
            }
            _ => false,
        }
    }

    /// Pair up reversals among the unmatched records of `ledger`
    ///
    /// For each ascending `i`, the first later `j` that reverses it wins and
    /// both leave the unmatched set at once, so neither is reused in the
    /// same scan. Returns the number of pairs.
    pub fn apply(&self, ledger: &mut LedgerWorkingState, config: &MatchConfig) -> usize {
        let indices = ledger.unmatched_indices();
        let mut pairs = 0;

        for (position, &i) in indices.iter().enumerate() {
            if !ledger.is_unmatched(i) {
                continue;
            }
            let partner = indices[position + 1..].iter().copied().find(|&j| {
                ledger.is_unmatched(j)
                    && self.is_reversal(ledger.record(i), ledger.record(j), config)
            });

            if let Some(j) = partner {
                ledger.classify(i, Classification::ReturnedTransaction);
                ledger.classify(j, Classification::ReturnedTransaction);
                pairs += 1;
            }
        }

        tracing::info!(ledger = %ledger.side(), "Found {} returned transactions", pairs);
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matchers::test_support::{ledger, rec};
    use crate::types::{LedgerSide, MatchCategory};
    use rstest::rstest;

    #[rstest]
    #[case::debit_then_credit(rec(Some("2024-01-01"), 80, 0), rec(Some("2024-01-01"), 0, 80), true)]
    #[case::credit_then_debit(rec(Some("2024-01-01"), 0, 80), rec(Some("2024-01-02"), 80, 0), true)]
    #[case::two_days_apart(rec(Some("2024-01-01"), 80, 0), rec(Some("2024-01-03"), 0, 80), false)]
    #[case::same_direction(rec(Some("2024-01-01"), 80, 0), rec(Some("2024-01-01"), 80, 0), false)]
    #[case::different_amount(rec(Some("2024-01-01"), 80, 0), rec(Some("2024-01-01"), 0, 81), false)]
    #[case::both_sided(rec(Some("2024-01-01"), 80, 5), rec(Some("2024-01-01"), 0, 80), false)]
    #[case::missing_date(rec(None, 80, 0), rec(None, 0, 80), false)]
    fn test_is_reversal(
        #[case] earlier: TransactionRecord,
        #[case] later: TransactionRecord,
        #[case] expected: bool,
    ) {
        assert_eq!(
            ReturnedTransactionMatcher.is_reversal(&earlier, &later, &MatchConfig::default()),
            expected
        );
    }

    #[test]
    fn test_pairs_are_marked_and_listed_twice() {
        let mut state = ledger(
            LedgerSide::A,
            vec![
                rec(Some("2024-01-01"), 80, 0),
                rec(Some("2024-01-01"), 15, 0),
                rec(Some("2024-01-02"), 0, 80),
            ],
        );

        let pairs = ReturnedTransactionMatcher.apply(&mut state, &MatchConfig::default());

        assert_eq!(pairs, 1);
        assert_eq!(
            state.category_rows(MatchCategory::ReturnedTransaction),
            &[0, 2]
        );
        assert!(state.is_unmatched(1));
        assert_eq!(
            state.record(2).classification.to_string(),
            "Returned Transaction"
        );
    }

    #[test]
    fn test_partner_is_not_reused() {
        // r0 pairs with r1; r2 has no free partner left.
        let mut state = ledger(
            LedgerSide::B,
            vec![
                rec(Some("2024-01-01"), 50, 0),
                rec(Some("2024-01-01"), 0, 50),
                rec(Some("2024-01-01"), 50, 0),
            ],
        );

        assert_eq!(
            ReturnedTransactionMatcher.apply(&mut state, &MatchConfig::default()),
            1
        );
        assert!(state.is_unmatched(2));
    }

    #[test]
    fn test_already_classified_records_are_ignored() {
        let mut state = ledger(
            LedgerSide::A,
            vec![rec(Some("2024-01-01"), 50, 0), rec(Some("2024-01-01"), 0, 50)],
        );
        state.classify(1, Classification::Matched);

        assert_eq!(
            ReturnedTransactionMatcher.apply(&mut state, &MatchConfig::default()),
            0
        );
        assert!(state.is_unmatched(0));
    }
}
