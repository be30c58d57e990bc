//! Comparison utilities shared by the matching stages
//!
//! Tolerance-based amount equality, half-up rounding and day-granular date
//! gaps. A missing date makes every date-gated comparison fail.

use crate::types::TransactionRecord;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Compare two optional amounts within `tolerance`
///
/// Two missing amounts are equal; exactly one missing amount is not.
/// Otherwise the absolute difference must be strictly below `tolerance`; a
/// difference outside the `Decimal` range counts as unequal.
pub fn amounts_equal(a: Option<Decimal>, b: Option<Decimal>, tolerance: Decimal) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.checked_sub(b).is_some_and(|diff| diff.abs() < tolerance),
        _ => false,
    }
}

/// `amounts_equal` for two present amounts
pub fn approx_eq(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    amounts_equal(Some(a), Some(b), tolerance)
}

/// Round to the nearest integer with ties going away from zero
///
/// Equivalent to `floor(x + 0.5)` for non-negative values and
/// `ceil(x - 0.5)` for negative ones.
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Absolute number of days between two dates
///
/// `None` when either date is missing.
pub fn day_difference(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<u64> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a - b).num_days().unsigned_abs()),
        _ => None,
    }
}

/// Whether both dates are present and fall on the same calendar day
pub fn calendar_dates_equal(a: Option<NaiveDate>, b: Option<NaiveDate>) -> bool {
    day_difference(a, b) == Some(0)
}

/// Cross-ledger amount predicate used by the exact and fuzzy matchers
///
/// True when the debit of one record mirrors the credit of the other (and
/// vice versa), or when both records carry the same debit and credit.
pub fn amounts_correspond(
    left: &TransactionRecord,
    right: &TransactionRecord,
    tolerance: Decimal,
) -> bool {
    let mirrored = approx_eq(left.debit, right.credit, tolerance)
        && approx_eq(left.credit, right.debit, tolerance);
    let same_side = approx_eq(left.debit, right.debit, tolerance)
        && approx_eq(left.credit, right.credit, tolerance);
    mirrored || same_side
}
