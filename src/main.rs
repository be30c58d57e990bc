//! Ledger Reconciler CLI
//!
//! Command-line interface for reconciling two ledger CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- bank.csv books.csv > report.csv
//! cargo run -- --strategy sync bank.csv books.csv > report.csv
//! cargo run -- --opening-balance-a 1000 --output-dir annotated bank.csv books.csv
//! RUST_LOG=debug cargo run -- --fuzzy-date-range 3 bank.csv books.csv
//! ```
//!
//! The summary report goes to stdout; logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, missing required columns, invalid configuration, etc.)

use ledger_reconciler::cli;
use ledger_reconciler::strategy;
use std::process;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.as_str()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install log subscriber: {}", e);
    }

    let args = cli::parse_args();

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_runtime_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let job = args.to_job();
    let mut output = std::io::stdout();
    match strategy.process(&job, &mut output) {
        Ok(report) => {
            tracing::info!(
                closing = %report.closing_status,
                total = %report.total_status,
                "Reconciliation complete"
            );
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
