//! Transaction-related types for the ledger reconciler
//!
//! This module defines the canonical transaction record read from a ledger,
//! the classification each record receives during reconciliation, and the
//! report-level match categories.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

/// Record identifier within one ledger
///
/// Indices are dense positions (0, 1, 2, ...) assigned at load time and stay
/// stable for the whole reconciliation run.
pub type RecordIndex = usize;

/// Format an amount with two decimal places, ties rounded away from zero
///
/// `Decimal`'s own `{:.2}` truncates extra digits, so the value is rounded
/// first.
///
/// # Examples
///
/// ```
/// use ledger_reconciler::types::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::new(99996, 3)), "100.00");
/// assert_eq!(format_amount(Decimal::new(5, 3)), "0.01");
/// ```
pub fn format_amount(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// A single ledger line
///
/// Debit and credit are independently non-negative. Nothing enforces that
/// exactly one of them is nonzero; directional matchers simply skip records
/// where both are zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// Position of the record in its ledger
    pub index: RecordIndex,

    /// Calendar date, `None` when missing or unparseable
    ///
    /// A record without a date never passes a date-gated comparison.
    pub date: Option<NaiveDate>,

    /// Free-form description
    pub description: String,

    /// Debit amount (missing values read as zero)
    pub debit: Decimal,

    /// Credit amount (missing values read as zero)
    pub credit: Decimal,

    /// Running balance as printed on the source document, if any
    pub balance: Option<Decimal>,

    /// Classification assigned by the reconciliation engine
    pub classification: Classification,
}

impl TransactionRecord {
    /// Create an unclassified record
    pub fn new(
        index: RecordIndex,
        date: Option<NaiveDate>,
        description: impl Into<String>,
        debit: Decimal,
        credit: Decimal,
    ) -> Self {
        TransactionRecord {
            index,
            date,
            description: description.into(),
            debit,
            credit,
            balance: None,
            classification: Classification::Unset,
        }
    }

    /// The single nonzero side of a one-directional record
    ///
    /// Returns `Some((amount, Direction::Debit))` for a pure debit,
    /// `Some((amount, Direction::Credit))` for a pure credit, and `None` when
    /// both sides are zero or both are nonzero.
    pub fn one_sided_amount(&self) -> Option<(Decimal, Direction)> {
        if self.debit > Decimal::ZERO && self.credit.is_zero() {
            Some((self.debit, Direction::Debit))
        } else if self.credit > Decimal::ZERO && self.debit.is_zero() {
            Some((self.credit, Direction::Credit))
        } else {
            None
        }
    }

    /// Amount on the given side of the record
    pub fn amount(&self, direction: Direction) -> Decimal {
        match direction {
            Direction::Debit => self.debit,
            Direction::Credit => self.credit,
        }
    }
}

/// Debit or credit column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    /// The column on the other side of the ledger
    pub fn opposite(self) -> Self {
        match self {
            Direction::Debit => Direction::Credit,
            Direction::Credit => Direction::Debit,
        }
    }
}

/// Classification written into a record's remarks
///
/// Every record starts as `Unset` and transitions exactly once to one of the
/// other variants. `Unset` renders as an empty remark.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Classification {
    #[default]
    Unset,

    /// Same-day exact amount match
    Matched,

    /// Exact amount match with the dates a few days apart
    MatchedCheckDate,

    /// Part of a one-to-many split group
    SplitTransaction,

    /// One half of a reversed pair within the same ledger
    ReturnedTransaction,

    /// Amounts that differ only by rounding
    RoundingError {
        /// Amount taken from ledger A
        left: Decimal,
        /// Amount taken from ledger B
        right: Decimal,
    },

    /// Nothing matched this record
    Unmatched,
}

impl Classification {
    /// The report category for this classification (`None` while unset)
    pub fn category(&self) -> Option<MatchCategory> {
        match self {
            Classification::Unset => None,
            Classification::Matched => Some(MatchCategory::Matched),
            Classification::MatchedCheckDate => Some(MatchCategory::MatchedCheckDate),
            Classification::SplitTransaction => Some(MatchCategory::SplitTransaction),
            Classification::ReturnedTransaction => Some(MatchCategory::ReturnedTransaction),
            Classification::RoundingError { .. } => Some(MatchCategory::RoundingError),
            Classification::Unmatched => Some(MatchCategory::Unmatched),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Unset => Ok(()),
            Classification::RoundingError { left, right } => {
                write!(
                    f,
                    "Rounding Error: {} vs {}",
                    format_amount(*left),
                    format_amount(*right)
                )
            }
            other => match other.category() {
                Some(category) => f.write_str(category.label()),
                None => Ok(()),
            },
        }
    }
}

/// Report-level match category
///
/// Ordered the way categories appear in the summary report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchCategory {
    Matched,
    MatchedCheckDate,
    SplitTransaction,
    ReturnedTransaction,
    RoundingError,
    Unmatched,
}

impl MatchCategory {
    /// All categories in report order
    pub const ALL: [MatchCategory; 6] = [
        MatchCategory::Matched,
        MatchCategory::MatchedCheckDate,
        MatchCategory::SplitTransaction,
        MatchCategory::ReturnedTransaction,
        MatchCategory::RoundingError,
        MatchCategory::Unmatched,
    ];

    /// Human-readable label used in remarks and the report
    pub fn label(self) -> &'static str {
        match self {
            MatchCategory::Matched => "Matched",
            MatchCategory::MatchedCheckDate => "Matched but check date",
            MatchCategory::SplitTransaction => "Split Transaction",
            MatchCategory::ReturnedTransaction => "Returned Transaction",
            MatchCategory::RoundingError => "Rounding Error",
            MatchCategory::Unmatched => "Unmatched",
        }
    }

    /// Fill color (RGB hex) used by report renderers
    pub fn color(self) -> &'static str {
        match self {
            MatchCategory::Matched => "5C7AFF",
            MatchCategory::MatchedCheckDate => "B39CD0",
            MatchCategory::SplitTransaction => "59D2FE",
            MatchCategory::ReturnedTransaction => "44E5E7",
            MatchCategory::RoundingError => "73FBD3",
            MatchCategory::Unmatched => "8EC1FF",
        }
    }
}

impl fmt::Display for MatchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
