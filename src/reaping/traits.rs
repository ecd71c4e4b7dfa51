/*!
 * Strategy Traits
 * The pluggable reaping policy seam
 */

use super::types::{StrategyConfig, StrategyKind, StrategyReport};
use crate::core::errors::LifecycleResult;
use crate::process::inspector::ProcessInspector;

/// A parent-side policy for reclaiming child process records
///
/// `run` spawns the strategy's children and returns only in the original
/// process; every child branch ends in `_exit` inside the strategy.
pub trait ReapStrategy {
    fn kind(&self) -> StrategyKind;

    fn config(&self) -> &StrategyConfig;

    /// Spawn, apply the policy, then inspect the children
    fn run(&self, inspector: &dyn ProcessInspector) -> LifecycleResult<StrategyReport>;
}
