//! Report aggregation
//!
//! Turns a [`ReconciliationResult`] into the figures a report renderer
//! needs: per-category counts for both ledgers, closing figures, status
//! flags and the fixed color legend.

use crate::core::balance::ClosingBalance;
use crate::core::engine::{LedgerOutcome, ReconciliationResult};
use crate::types::MatchCategory;
use std::fmt;

/// Legend color for a matching closing balance
pub const CLOSING_MATCHED_COLOR: &str = "C6EFCE";
/// Legend color for a mismatching closing balance
pub const CLOSING_UNMATCHED_COLOR: &str = "FFC7CE";

/// Fixed label to color mapping handed to the renderer
pub const COLOR_LEGEND: [(&str, &str); 8] = [
    ("Matched", "5C7AFF"),
    ("Matched but check date", "B39CD0"),
    ("Split Transaction", "59D2FE"),
    ("Returned Transaction", "44E5E7"),
    ("Rounding Error", "73FBD3"),
    ("Unmatched", "8EC1FF"),
    ("Closing Balance Matched", CLOSING_MATCHED_COLOR),
    ("Closing Balance Unmatched", CLOSING_UNMATCHED_COLOR),
];

/// Agreement status printed in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Matched,
    Unmatched,
}

impl MatchStatus {
    pub fn from_flag(matched: bool) -> Self {
        if matched {
            MatchStatus::Matched
        } else {
            MatchStatus::Unmatched
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            MatchStatus::Matched => CLOSING_MATCHED_COLOR,
            MatchStatus::Unmatched => CLOSING_UNMATCHED_COLOR,
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Matched => f.write_str("MATCHED"),
            MatchStatus::Unmatched => f.write_str("UNMATCHED"),
        }
    }
}

/// Per-category counts for one ledger
///
/// Returned transactions are counted in pairs: each pair contributes two
/// rows, so the count is half the row count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub matched: usize,
    pub matched_check_date: usize,
    pub split: usize,
    pub returned: usize,
    pub rounding: usize,
    pub unmatched: usize,
}

impl CategoryCounts {
    pub fn from_outcome(outcome: &LedgerOutcome) -> Self {
        CategoryCounts {
            matched: outcome.rows(MatchCategory::Matched).len(),
            matched_check_date: outcome.rows(MatchCategory::MatchedCheckDate).len(),
            split: outcome.rows(MatchCategory::SplitTransaction).len(),
            returned: outcome.rows(MatchCategory::ReturnedTransaction).len() / 2,
            rounding: outcome.rows(MatchCategory::RoundingError).len(),
            unmatched: outcome.rows(MatchCategory::Unmatched).len(),
        }
    }

    pub fn get(&self, category: MatchCategory) -> usize {
        match category {
            MatchCategory::Matched => self.matched,
            MatchCategory::MatchedCheckDate => self.matched_check_date,
            MatchCategory::SplitTransaction => self.split,
            MatchCategory::ReturnedTransaction => self.returned,
            MatchCategory::RoundingError => self.rounding,
            MatchCategory::Unmatched => self.unmatched,
        }
    }
}

/// Summary of a reconciliation run
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationReport {
    pub counts_a: CategoryCounts,
    pub counts_b: CategoryCounts,
    pub closing_a: ClosingBalance,
    pub closing_b: ClosingBalance,
    pub closing_status: MatchStatus,
    pub total_status: MatchStatus,
}

impl ReconciliationReport {
    pub fn from_result(result: &ReconciliationResult) -> Self {
        ReconciliationReport {
            counts_a: CategoryCounts::from_outcome(&result.ledger_a),
            counts_b: CategoryCounts::from_outcome(&result.ledger_b),
            closing_a: result.balance.closing_a(),
            closing_b: result.balance.closing_b(),
            closing_status: MatchStatus::from_flag(result.closing_match()),
            total_status: MatchStatus::from_flag(result.total_match()),
        }
    }

    pub fn closing_match(&self) -> bool {
        self.closing_status == MatchStatus::Matched
    }

    pub fn total_match(&self) -> bool {
        self.total_status == MatchStatus::Matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MatchConfig;
    use crate::core::engine::ReconciliationEngine;
    use crate::core::matchers::test_support::rec;
    use crate::types::Ledger;
    use rstest::rstest;

    #[test]
    fn test_legend_agrees_with_categories() {
        for category in MatchCategory::ALL {
            assert!(
                COLOR_LEGEND.contains(&(category.label(), category.color())),
                "{} missing from legend",
                category
            );
        }
    }

    #[rstest]
    #[case::matched(true, "MATCHED", "C6EFCE")]
    #[case::unmatched(false, "UNMATCHED", "FFC7CE")]
    fn test_status(#[case] flag: bool, #[case] text: &str, #[case] color: &str) {
        let status = MatchStatus::from_flag(flag);
        assert_eq!(status.to_string(), text);
        assert_eq!(status.color(), color);
    }

    #[test]
    fn test_counts_and_returned_halving() {
        let a = vec![
            rec(Some("2024-01-01"), 100, 0),
            rec(Some("2024-01-01"), 40, 0),
            rec(Some("2024-01-01"), 0, 40),
            rec(Some("2024-01-10"), 5, 0),
            rec(Some("2024-01-11"), 0, 5),
            rec(Some("2024-02-01"), 7, 0),
        ];
        let b = vec![rec(Some("2024-01-01"), 0, 100)];

        let result = ReconciliationEngine::new(MatchConfig::default())
            .reconcile(Ledger::new(a), Ledger::new(b))
            .expect("reconcile");
        let report = ReconciliationReport::from_result(&result);

        assert_eq!(result.ledger_a.rows(MatchCategory::ReturnedTransaction).len(), 4);
        assert_eq!(
            report.counts_a,
            CategoryCounts {
                matched: 1,
                returned: 2,
                unmatched: 1,
                ..CategoryCounts::default()
            }
        );
        assert_eq!(report.counts_b.get(MatchCategory::Matched), 1);
        assert_eq!(report.closing_status, MatchStatus::Unmatched);
    }
}
