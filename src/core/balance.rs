//! Closing-balance computation and cross-ledger agreement checks
//!
//! Each ledger's net position is `opening + sum(credit) - sum(debit)`, split
//! into a non-negative closing debit or credit. The two ledgers agree when
//! their closing figures mirror each other: A's closing debit against B's
//! closing credit and the other way round. The grand totals
//! (`sum(debit) + closing debit`, `sum(credit) + closing credit`) are
//! checked the same way.

use crate::core::compare::approx_eq;
use crate::types::{LedgerSide, ReconError, TransactionRecord};
use rust_decimal::Decimal;

/// Closing balance split into its debit and credit components
///
/// At most one of the two fields is nonzero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClosingBalance {
    pub debit: Decimal,
    pub credit: Decimal,
}

/// Split a signed net balance into closing debit and credit
///
/// A positive net is a closing credit; zero or negative is a closing debit
/// of `-net`.
pub fn closing_split(net: Decimal) -> ClosingBalance {
    if net > Decimal::ZERO {
        ClosingBalance {
            debit: Decimal::ZERO,
            credit: net,
        }
    } else {
        ClosingBalance {
            debit: net.abs(),
            credit: Decimal::ZERO,
        }
    }
}

/// Column sums and closing figures for one ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerTotals {
    pub opening_balance: Decimal,
    pub sum_debit: Decimal,
    pub sum_credit: Decimal,
    pub closing: ClosingBalance,
    /// Debit column total including the closing debit
    pub total_debit: Decimal,
    /// Credit column total including the closing credit
    pub total_credit: Decimal,
}

impl LedgerTotals {
    /// Sum the columns of one ledger and derive its closing figures
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if any sum leaves the `Decimal` range.
    pub fn compute(
        side: LedgerSide,
        records: &[TransactionRecord],
        opening_balance: Decimal,
    ) -> Result<Self, ReconError> {
        let overflow = |operation: &str| ReconError::arithmetic_overflow(operation, side);

        let mut totals = LedgerTotals {
            opening_balance,
            ..LedgerTotals::default()
        };
        for record in records {
            totals.sum_debit = totals
                .sum_debit
                .checked_add(record.debit)
                .ok_or_else(|| overflow("debit sum"))?;
            totals.sum_credit = totals
                .sum_credit
                .checked_add(record.credit)
                .ok_or_else(|| overflow("credit sum"))?;
        }

        let net = totals
            .net_balance()
            .ok_or_else(|| overflow("net balance"))?;
        totals.closing = closing_split(net);
        totals.total_debit = totals
            .sum_debit
            .checked_add(totals.closing.debit)
            .ok_or_else(|| overflow("debit total"))?;
        totals.total_credit = totals
            .sum_credit
            .checked_add(totals.closing.credit)
            .ok_or_else(|| overflow("credit total"))?;

        Ok(totals)
    }

    /// `opening + sum(credit) - sum(debit)`, or `None` on overflow
    pub fn net_balance(&self) -> Option<Decimal> {
        self.opening_balance
            .checked_add(self.sum_credit)?
            .checked_sub(self.sum_debit)
    }
}

/// Balance agreement between the two ledgers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceCheck {
    pub totals_a: LedgerTotals,
    pub totals_b: LedgerTotals,
    pub closing_match: bool,
    pub total_match: bool,
}

impl BalanceCheck {
    pub fn new(totals_a: LedgerTotals, totals_b: LedgerTotals, tolerance: Decimal) -> Self {
        let closing_match = mirrors(
            (totals_a.closing.debit, totals_a.closing.credit),
            (totals_b.closing.debit, totals_b.closing.credit),
            tolerance,
        );
        let total_match = mirrors(
            (totals_a.total_debit, totals_a.total_credit),
            (totals_b.total_debit, totals_b.total_credit),
            tolerance,
        );

        BalanceCheck {
            totals_a,
            totals_b,
            closing_match,
            total_match,
        }
    }

    pub fn closing_a(&self) -> ClosingBalance {
        self.totals_a.closing
    }

    pub fn closing_b(&self) -> ClosingBalance {
        self.totals_b.closing
    }
}

/// `(debit, credit)` of one side against `(credit, debit)` of the other
fn mirrors(a: (Decimal, Decimal), b: (Decimal, Decimal), tolerance: Decimal) -> bool {
    approx_eq(a.0, b.1, tolerance) && approx_eq(a.1, b.0, tolerance)
}
