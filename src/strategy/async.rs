//! Asynchronous processing strategy
//!
//! Both ledgers are read concurrently on a tokio multi-threaded runtime with
//! csv-async. Once both are loaded the runtime is done; reconciliation
//! itself is synchronous and runs in the shared `ProcessingStrategy::process`.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── RuntimeConfig (worker_threads)
//!     ├── tokio::fs::File + compat (one per ledger)
//!     └── AsyncReader (header validation + row conversion)
//! ```

use crate::io::async_reader::AsyncReader;
use crate::strategy::{ProcessingStrategy, ReconcileJob};
use crate::types::{Ledger, LedgerSide, ReconError};
use std::io::ErrorKind;
use tokio_util::compat::TokioAsyncReadCompatExt;

/// Configuration for the async runtime
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Number of tokio worker threads
    pub worker_threads: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get(),
        }
    }
}

impl RuntimeConfig {
    /// Create a RuntimeConfig, replacing a zero thread count with the default
    pub fn new(worker_threads: usize) -> Self {
        if worker_threads == 0 {
            let default = Self::default();
            tracing::warn!(
                "Invalid worker_threads ({}), using default ({})",
                worker_threads,
                default.worker_threads
            );
            return default;
        }

        Self { worker_threads }
    }
}

/// Asynchronous processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: RuntimeConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: RuntimeConfig) -> Self {
        Self { config }
    }

    async fn load(job: &ReconcileJob, side: LedgerSide) -> Result<Ledger, ReconError> {
        let path = job.path(side);
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ReconError::file_not_found(&path.display().to_string()),
                _ => ReconError::IoError {
                    message: format!("Failed to open file '{}': {}", path.display(), e),
                },
            })?;

        let reader = AsyncReader::new(file.compat(), side).await?;
        let ledger = reader.read_ledger().await;
        Ok(ledger.with_opening_balance(job.opening_balance(side)))
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn load_ledgers(&self, job: &ReconcileJob) -> Result<(Ledger, Ledger), ReconError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .build()
            .map_err(|e| ReconError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        let (ledger_a, ledger_b) = runtime.block_on(async {
            futures::join!(
                Self::load(job, LedgerSide::A),
                Self::load(job, LedgerSide::B)
            )
        });
        Ok((ledger_a?, ledger_b?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::SyncProcessingStrategy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_runtime_config_rejects_zero_threads() {
        assert_eq!(RuntimeConfig::new(0), RuntimeConfig::default());
        assert_eq!(RuntimeConfig::new(3).worker_threads, 3);
    }

    #[test]
    fn test_async_strategy_matches_sync_output() {
        let a = create_temp_csv(
            "date,description,debit,credit\n\
             2024-01-01,Invoice,150,\n\
             2024-01-02,Fee,12.40,\n\
             2024-01-09,Refund,,30\n",
        );
        let b = create_temp_csv(
            "date,description,debit,credit\n\
             2024-01-01,Part 1,,100\n\
             2024-01-02,Part 2,,50\n\
             2024-01-03,Fee,,12\n",
        );
        let job = ReconcileJob::new(a.path(), b.path());

        let mut async_output = Vec::new();
        let async_report = AsyncProcessingStrategy::new(RuntimeConfig::new(2))
            .process(&job, &mut async_output)
            .unwrap();
        let mut sync_output = Vec::new();
        let sync_report = SyncProcessingStrategy.process(&job, &mut sync_output).unwrap();

        assert_eq!(async_report, sync_report);
        assert_eq!(async_output, sync_output);
        assert_eq!(async_report.counts_a.split, 1);
        assert_eq!(async_report.counts_a.rounding, 1);
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let b = create_temp_csv("date,description,debit,credit\n");
        let job = ReconcileJob::new("nonexistent.csv", b.path());
        let mut output = Vec::new();

        let result = AsyncProcessingStrategy::new(RuntimeConfig::default()).process(&job, &mut output);

        assert_eq!(
            result.unwrap_err(),
            ReconError::file_not_found("nonexistent.csv")
        );
    }

    #[test]
    fn test_async_strategy_reports_missing_columns() {
        let a = create_temp_csv("date,debit,credit\n");
        let b = create_temp_csv("date,description,debit,credit\n");
        let job = ReconcileJob::new(a.path(), b.path());

        let result = AsyncProcessingStrategy::new(RuntimeConfig::new(1)).load_ledgers(&job);

        assert!(matches!(
            result,
            Err(ReconError::MissingColumns {
                ledger: LedgerSide::A,
                ..
            })
        ));
    }
}
