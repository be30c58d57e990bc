//! Processing strategy module for ledger reconciliation
//!
//! This module defines the Strategy pattern for the complete reconciliation
//! pipeline: loading both ledgers, running the engine and writing the
//! report. Strategies differ only in how ledgers are loaded (sequentially
//! or concurrently); the engine itself always runs synchronously.

use crate::cli::StrategyType;
use crate::core::{MatchConfig, MatchStatus, ReconciliationEngine, ReconciliationReport};
use crate::io::csv_format::{write_annotated_ledger_csv, write_report_csv};
use crate::types::{Ledger, LedgerSide, ReconError};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, RuntimeConfig};
pub use sync::SyncProcessingStrategy;

/// File name of the annotated copy of each ledger in the output directory
pub fn annotated_file_name(side: LedgerSide) -> &'static str {
    match side {
        LedgerSide::A => "ledger_a_annotated.csv",
        LedgerSide::B => "ledger_b_annotated.csv",
    }
}

/// Everything one reconciliation run needs
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileJob {
    pub ledger_a: PathBuf,
    pub ledger_b: PathBuf,
    pub opening_balance_a: Decimal,
    pub opening_balance_b: Decimal,
    pub config: MatchConfig,
    /// Directory for the annotated ledgers; none are written when unset
    pub output_dir: Option<PathBuf>,
}

impl ReconcileJob {
    /// A job with default configuration and zero opening balances
    pub fn new(ledger_a: impl Into<PathBuf>, ledger_b: impl Into<PathBuf>) -> Self {
        ReconcileJob {
            ledger_a: ledger_a.into(),
            ledger_b: ledger_b.into(),
            opening_balance_a: Decimal::ZERO,
            opening_balance_b: Decimal::ZERO,
            config: MatchConfig::default(),
            output_dir: None,
        }
    }

    pub fn path(&self, side: LedgerSide) -> &Path {
        match side {
            LedgerSide::A => &self.ledger_a,
            LedgerSide::B => &self.ledger_b,
        }
    }

    pub fn opening_balance(&self, side: LedgerSide) -> Decimal {
        match side {
            LedgerSide::A => self.opening_balance_a,
            LedgerSide::B => self.opening_balance_b,
        }
    }
}

/// Processing strategy trait for complete reconciliation pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Load both ledgers of `job`, opening balances applied
    ///
    /// # Errors
    ///
    /// Any fatal load error (missing file, unreadable file, missing
    /// required column) aborts the run before the engine starts.
    fn load_ledgers(&self, job: &ReconcileJob) -> Result<(Ledger, Ledger), ReconError>;

    /// Reconcile the ledgers of `job` and write the report to `output`
    ///
    /// This is the complete pipeline:
    /// 1. Load both ledgers with the strategy's loader (`load_ledgers`)
    /// 2. Run the reconciliation engine with `job.config`
    /// 3. Write annotated ledgers to `job.output_dir`, when it is set
    /// 4. Write the summary report CSV to `output`
    ///
    /// Nothing is written if loading or reconciliation fails.
    ///
    /// # Arguments
    ///
    /// * `job` - Ledger paths, opening balances, matching options and output directory
    /// * `output` - Destination for the summary report (typically stdout)
    ///
    /// # Returns
    ///
    /// * `Ok(ReconciliationReport)` with the counts and statuses that were written
    /// * `Err(ReconError)` on a fatal load, configuration, arithmetic or write error
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ledger_reconciler::cli::StrategyType;
    /// use ledger_reconciler::strategy::{create_strategy, ReconcileJob};
    ///
    /// let strategy = create_strategy(StrategyType::Sync, None);
    /// let job = ReconcileJob::new("bank.csv", "books.csv");
    /// let report = strategy
    ///     .process(&job, &mut std::io::stdout())
    ///     .expect("reconciliation failed");
    /// println!("closing balance: {}", report.closing_status);
    /// ```
    fn process(
        &self,
        job: &ReconcileJob,
        output: &mut dyn Write,
    ) -> Result<ReconciliationReport, ReconError> {
        let (ledger_a, ledger_b) = self.load_ledgers(job)?;

        let result = ReconciliationEngine::new(job.config.clone()).reconcile(ledger_a, ledger_b)?;
        let report = ReconciliationReport::from_result(&result);

        if let Some(dir) = &job.output_dir {
            std::fs::create_dir_all(dir).map_err(|e| {
                ReconError::write_error(format!(
                    "Failed to create output directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;

            for side in [LedgerSide::A, LedgerSide::B] {
                let path = dir.join(annotated_file_name(side));
                let file = File::create(&path).map_err(|e| {
                    ReconError::write_error(format!("Failed to create '{}': {}", path.display(), e))
                })?;
                let totals = match side {
                    LedgerSide::A => &result.balance.totals_a,
                    LedgerSide::B => &result.balance.totals_b,
                };
                write_annotated_ledger_csv(
                    result.outcome(side),
                    totals,
                    MatchStatus::from_flag(result.closing_match()),
                    MatchStatus::from_flag(result.total_match()),
                    &mut BufWriter::new(file),
                )?;
                tracing::info!(ledger = %side, path = %path.display(), "Wrote annotated ledger");
            }
        }

        write_report_csv(&report, output)?;
        Ok(report)
    }
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` only affects the async strategy; it falls back to
/// `RuntimeConfig::default()` when absent.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<RuntimeConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}
