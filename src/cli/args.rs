use crate::core::MatchConfig;
use crate::strategy::{ReconcileJob, RuntimeConfig};
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Reconcile two transaction ledgers
#[derive(Parser, Debug)]
#[command(name = "ledger-reconciler")]
#[command(about = "Reconcile two transaction ledgers and report matches and balances", long_about = None)]
pub struct CliArgs {
    /// First ledger (CSV with date, description, debit, credit)
    #[arg(value_name = "LEDGER_A", help = "Path to the first ledger CSV file")]
    pub ledger_a: PathBuf,

    /// Second ledger, reconciled against the first
    #[arg(value_name = "LEDGER_B", help = "Path to the second ledger CSV file")]
    pub ledger_b: PathBuf,

    /// Loading strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        env = "RECON_STRATEGY",
        help = "Loading strategy: 'sync' reads the ledgers one after the other, 'async' concurrently"
    )]
    pub strategy: StrategyType,

    #[arg(long, value_name = "AMOUNT", default_value = "0.01", env = "RECON_MATCH_TOLERANCE")]
    pub match_tolerance: Decimal,

    #[arg(long, value_name = "DAYS", default_value_t = 7, env = "RECON_FUZZY_DATE_RANGE")]
    pub fuzzy_date_range: u32,

    #[arg(long, value_name = "AMOUNT", default_value = "0.5", env = "RECON_ROUNDING_TOLERANCE")]
    pub rounding_tolerance: Decimal,

    #[arg(long, value_name = "DAYS", default_value_t = 2, env = "RECON_ROUNDING_DATE_RANGE")]
    pub rounding_date_range: u32,

    #[arg(long, value_name = "DAYS", default_value_t = 3, env = "RECON_SPLIT_MATCH_DATE_RANGE")]
    pub split_match_date_range: u32,

    #[arg(long, env = "RECON_NO_EXACT_MATCH", help = "Skip the exact matching stage")]
    pub no_exact_match: bool,

    #[arg(long, env = "RECON_NO_FUZZY_MATCH", help = "Skip the fuzzy matching stage")]
    pub no_fuzzy_match: bool,

    #[arg(long, env = "RECON_NO_SPLIT_MATCH", help = "Skip both split matching stages")]
    pub no_split_match: bool,

    #[arg(long, env = "RECON_NO_ROUNDING_MATCH", help = "Skip the rounding-error stage")]
    pub no_rounding_match: bool,

    #[arg(
        long,
        value_name = "AMOUNT",
        default_value = "0",
        allow_negative_numbers = true,
        env = "RECON_OPENING_BALANCE_A"
    )]
    pub opening_balance_a: Decimal,

    #[arg(
        long,
        value_name = "AMOUNT",
        default_value = "0",
        allow_negative_numbers = true,
        env = "RECON_OPENING_BALANCE_B"
    )]
    pub opening_balance_b: Decimal,

    /// Directory for the annotated ledgers
    #[arg(
        long,
        value_name = "DIR",
        env = "RECON_OUTPUT_DIR",
        help = "Write annotated copies of both ledgers into this directory"
    )]
    pub output_dir: Option<PathBuf>,

    /// Tokio worker threads (async strategy only)
    #[arg(
        long = "worker-threads",
        value_name = "COUNT",
        env = "RECON_WORKER_THREADS",
        help = "Number of async worker threads (default: CPU cores)"
    )]
    pub worker_threads: Option<usize>,
}

/// Available strategies for loading the ledgers
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    pub fn to_match_config(&self) -> MatchConfig {
        MatchConfig {
            match_tolerance: self.match_tolerance,
            fuzzy_date_range: self.fuzzy_date_range,
            rounding_tolerance: self.rounding_tolerance,
            rounding_date_range: self.rounding_date_range,
            split_match_date_range: self.split_match_date_range,
            enable_exact_match: !self.no_exact_match,
            enable_fuzzy_match: !self.no_fuzzy_match,
            enable_split_match: !self.no_split_match,
            enable_rounding_match: !self.no_rounding_match,
        }
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        self.worker_threads
            .map(RuntimeConfig::new)
            .unwrap_or_default()
    }

    pub fn to_job(&self) -> ReconcileJob {
        ReconcileJob {
            ledger_a: self.ledger_a.clone(),
            ledger_b: self.ledger_b.clone(),
            opening_balance_a: self.opening_balance_a,
            opening_balance_b: self.opening_balance_b,
            config: self.to_match_config(),
            output_dir: self.output_dir.clone(),
        }
    }
}
