//! Matching stages
//!
//! - `exact` - same-day amount matches
//! - `fuzzy` - amount matches a few days apart, closest first
//! - `split` - one record against a group summing to it (bounded subset-sum)
//! - `rounding` - amounts that differ only by rounding
//! - `returned` - reversed pairs within a single ledger

pub mod exact;
pub mod fuzzy;
pub mod returned;
pub mod rounding;
pub mod split;

pub use exact::ExactMatcher;
pub use fuzzy::FuzzyMatcher;
pub use returned::ReturnedTransactionMatcher;
pub use rounding::RoundingMatcher;
pub use split::{subset_sum, SplitMatcher, SubsetMatch};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::io::csv_format::parse_date;
    use crate::types::{LedgerSide, LedgerWorkingState, TransactionRecord};
    use rust_decimal::Decimal;

    /// Record with whole-unit amounts
    pub fn rec(date: Option<&str>, debit: i64, credit: i64) -> TransactionRecord {
        rec_dec(date, Decimal::new(debit, 0), Decimal::new(credit, 0))
    }

    pub fn rec_dec(date: Option<&str>, debit: Decimal, credit: Decimal) -> TransactionRecord {
        TransactionRecord::new(0, date.and_then(parse_date), "test", debit, credit)
    }

    pub fn ledger(side: LedgerSide, records: Vec<TransactionRecord>) -> LedgerWorkingState {
        LedgerWorkingState::new(side, records)
    }
}
