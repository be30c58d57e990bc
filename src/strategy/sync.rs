//! Synchronous processing strategy
//!
//! Loads ledger A, then ledger B, each with a streaming `SyncReader`, on the
//! calling thread. The shared `ProcessingStrategy::process` then runs the
//! engine and writes the output.

use crate::io::sync_reader::SyncReader;
use crate::strategy::{ProcessingStrategy, ReconcileJob};
use crate::types::{Ledger, LedgerSide, ReconError};

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use ledger_reconciler::strategy::{ProcessingStrategy, ReconcileJob, SyncProcessingStrategy};
/// use std::io;
///
/// let job = ReconcileJob::new("bank.csv", "books.csv");
/// SyncProcessingStrategy
///     .process(&job, &mut io::stdout())
///     .expect("Reconciliation failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl SyncProcessingStrategy {
    fn load(&self, job: &ReconcileJob, side: LedgerSide) -> Result<Ledger, ReconError> {
        let ledger = SyncReader::new(job.path(side), side)?.read_ledger();
        Ok(ledger.with_opening_balance(job.opening_balance(side)))
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn load_ledgers(&self, job: &ReconcileJob) -> Result<(Ledger, Ledger), ReconError> {
        let ledger_a = self.load(job, LedgerSide::A)?;
        let ledger_b = self.load(job, LedgerSide::B)?;
        Ok((ledger_a, ledger_b))
    }
}
