/*!
 * Process Lifecycle Library
 * Child creation, zombie observation, and the reaping strategies
 */

pub mod core;
pub mod monitoring;
pub mod process;
pub mod reaping;
pub mod signals;

// Re-exports
pub use crate::core::{ExitStatus, LifecycleError, LifecycleResult, ProcessIdentity};
pub use monitoring::init_tracing;
pub use process::{
    spawn, wait_any, wait_for, Branch, ProcState, ProcessInspector, ProcessStateReport,
    ProcfsInspector, ReapOutcome, ReapedChild,
};
pub use reaping::{strategy_for, ReapStrategy, StrategyConfig, StrategyKind, StrategyReport};
pub use signals::{declare_disinterest, restore_default, NotificationReaper, ReapStats};

/// Run `strategy` against procfs and log the report
///
/// Entry point shared by the strategy executables; returns only in the
/// original process.
pub fn run_strategy(strategy: &dyn ReapStrategy) -> LifecycleResult<StrategyReport> {
    let inspector = ProcfsInspector::default();
    let report = strategy.run(&inspector)?;

    if !report.upholds_contract() {
        tracing::warn!(
            strategy = %report.strategy,
            zombies = ?report.zombies(),
            "Unexpected zombie state"
        );
    }
    match serde_json::to_string(&report) {
        Ok(json) => tracing::debug!(report = %json, "Strategy finished"),
        Err(e) => tracing::warn!(error = %e, "Could not serialize strategy report"),
    }

    Ok(report)
}
