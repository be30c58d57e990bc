//! Ledger-related types for the ledger reconciler
//!
//! This module defines the loaded ledger and the per-run working state the
//! matching stages mutate.

use super::transaction::{Classification, MatchCategory, RecordIndex, TransactionRecord};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Which of the two ledgers a record or error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerSide {
    A,
    B,
}

impl fmt::Display for LedgerSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerSide::A => f.write_str("Ledger A"),
            LedgerSide::B => f.write_str("Ledger B"),
        }
    }
}

/// A loaded ledger ready for reconciliation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    /// Records in source order
    pub records: Vec<TransactionRecord>,

    /// Balance brought forward before the first record
    pub opening_balance: Decimal,
}

impl Ledger {
    /// Create a ledger with a zero opening balance
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Ledger {
            records,
            opening_balance: Decimal::ZERO,
        }
    }

    /// Set the opening balance
    pub fn with_opening_balance(mut self, opening_balance: Decimal) -> Self {
        self.opening_balance = opening_balance;
        self
    }
}

/// Mutable matching state of one ledger during a reconciliation run
///
/// The unmatched set is the single source of truth for "still eligible".
/// A record leaves it exactly once, through [`LedgerWorkingState::classify`],
/// and can never re-enter it.
#[derive(Debug, Clone)]
pub struct LedgerWorkingState {
    side: LedgerSide,
    records: Vec<TransactionRecord>,
    unmatched: BTreeSet<RecordIndex>,
    /// Classified indices per category, in commit order
    category_rows: BTreeMap<MatchCategory, Vec<RecordIndex>>,
}

impl LedgerWorkingState {
    /// Build the working state for a ledger
    ///
    /// Records are re-indexed by position and reset to `Unset`, so every
    /// record starts in the unmatched set.
    pub fn new(side: LedgerSide, mut records: Vec<TransactionRecord>) -> Self {
        for (position, record) in records.iter_mut().enumerate() {
            record.index = position;
            record.classification = Classification::Unset;
        }
        let unmatched = (0..records.len()).collect();

        LedgerWorkingState {
            side,
            records,
            unmatched,
            category_rows: BTreeMap::new(),
        }
    }

    pub fn side(&self) -> LedgerSide {
        self.side
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Record at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; indices handed out by this state
    /// are always valid.
    pub fn record(&self, index: RecordIndex) -> &TransactionRecord {
        &self.records[index]
    }

    pub fn is_unmatched(&self, index: RecordIndex) -> bool {
        self.unmatched.contains(&index)
    }

    pub fn unmatched_len(&self) -> usize {
        self.unmatched.len()
    }

    /// Snapshot of the unmatched indices in ascending order
    pub fn unmatched_indices(&self) -> Vec<RecordIndex> {
        self.unmatched.iter().copied().collect()
    }

    /// Move a record out of the unmatched set into `classification`
    ///
    /// Returns `false` and leaves the state untouched when the record is not
    /// (or no longer) unmatched, or when `classification` is `Unset`.
    pub fn classify(&mut self, index: RecordIndex, classification: Classification) -> bool {
        let Some(category) = classification.category() else {
            return false;
        };
        if !self.unmatched.remove(&index) {
            return false;
        }

        self.records[index].classification = classification;
        self.category_rows.entry(category).or_default().push(index);
        true
    }

    /// Classify every remaining record as `Unmatched`
    ///
    /// Returns the number of records finalized.
    pub fn finalize_unmatched(&mut self) -> usize {
        let remaining = self.unmatched_indices();
        for index in &remaining {
            self.classify(*index, Classification::Unmatched);
        }
        remaining.len()
    }

    /// Indices classified into `category`, in commit order
    pub fn category_rows(&self, category: MatchCategory) -> &[RecordIndex] {
        self.category_rows
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Consume the state, yielding the classified records and category rows
    pub fn into_parts(
        self,
    ) -> (
        Vec<TransactionRecord>,
        BTreeMap<MatchCategory, Vec<RecordIndex>>,
    ) {
        (self.records, self.category_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(count: usize) -> Vec<TransactionRecord> {
        (0..count)
            .map(|i| TransactionRecord::new(i * 10, None, "row", Decimal::ONE, Decimal::ZERO))
            .collect()
    }

    #[test]
    fn test_new_reindexes_and_marks_everything_unmatched() {
        let state = LedgerWorkingState::new(LedgerSide::A, records(3));

        assert_eq!(state.unmatched_indices(), vec![0, 1, 2]);
        assert_eq!(state.record(2).index, 2);
        assert!(state
            .records()
            .iter()
            .all(|r| r.classification == Classification::Unset));
    }

    #[test]
    fn test_classify_removes_from_unmatched() {
        let mut state = LedgerWorkingState::new(LedgerSide::A, records(2));

        assert!(state.classify(1, Classification::Matched));
        assert!(!state.is_unmatched(1));
        assert!(state.is_unmatched(0));
        assert_eq!(state.record(1).classification, Classification::Matched);
        assert_eq!(state.category_rows(MatchCategory::Matched), &[1]);
    }

    #[test]
    fn test_classify_is_write_once() {
        let mut state = LedgerWorkingState::new(LedgerSide::B, records(1));

        assert!(state.classify(0, Classification::SplitTransaction));
        assert!(!state.classify(0, Classification::Matched));
        assert_eq!(
            state.record(0).classification,
            Classification::SplitTransaction
        );
        assert!(state.category_rows(MatchCategory::Matched).is_empty());
    }

    #[test]
    fn test_classify_rejects_unset_and_unknown_index() {
        let mut state = LedgerWorkingState::new(LedgerSide::A, records(1));

        assert!(!state.classify(0, Classification::Unset));
        assert!(!state.classify(5, Classification::Matched));
        assert!(state.is_unmatched(0));
    }

    #[test]
    fn test_finalize_unmatched_classifies_remaining() {
        let mut state = LedgerWorkingState::new(LedgerSide::A, records(3));
        state.classify(1, Classification::Matched);

        assert_eq!(state.finalize_unmatched(), 2);
        assert_eq!(state.unmatched_len(), 0);
        assert_eq!(state.category_rows(MatchCategory::Unmatched), &[0, 2]);
    }

    #[test]
    fn test_ledger_side_display() {
        assert_eq!(LedgerSide::A.to_string(), "Ledger A");
        assert_eq!(LedgerSide::B.to_string(), "Ledger B");
    }
}
