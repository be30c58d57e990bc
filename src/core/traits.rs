//! Core traits for the matching stages
//!
//! Every cross-ledger stage implements [`MatchStrategy`] so the engine can
//! drive them uniformly in a fixed order. Stages receive both working states
//! by mutable reference for the duration of one call and never keep them.

use crate::core::config::MatchConfig;
use crate::types::LedgerWorkingState;

/// A cross-ledger matching stage
pub trait MatchStrategy {
    /// Short stage name used in logs
    fn name(&self) -> &'static str;

    /// Whether the stage runs under `config`
    fn is_enabled(&self, config: &MatchConfig) -> bool;

    /// Commit matches between `source` and `target`
    ///
    /// Only records still in the unmatched sets are considered. Returns the
    /// number of committed pairs (or groups, for split matching).
    fn apply(
        &self,
        source: &mut LedgerWorkingState,
        target: &mut LedgerWorkingState,
        config: &MatchConfig,
    ) -> usize;

    /// Run the stage if enabled, returning 0 when it is skipped
    fn run(
        &self,
        source: &mut LedgerWorkingState,
        target: &mut LedgerWorkingState,
        config: &MatchConfig,
    ) -> usize {
        if !self.is_enabled(config) {
            tracing::debug!(stage = self.name(), "stage disabled, skipping");
            return 0;
        }
        let committed = self.apply(source, target, config);
        tracing::info!(
            stage = self.name(),
            source = %source.side(),
            target = %target.side(),
            "Found {} {}",
            committed,
            self.name()
        );
        committed
    }
}
