/*!
 * No-Reap Strategy
 * Baseline that leaves its child as a ZOMBIE
 */

use super::traits::ReapStrategy;
use super::types::{ChildObservation, ChildRole, StrategyConfig, StrategyKind, StrategyReport};
use super::run_child;
use crate::core::errors::LifecycleResult;
use crate::monitoring::span_strategy;
use crate::process::inspector::ProcessInspector;
use crate::process::spawner::{spawn, Branch};
use tracing::{info, warn};

/// Spawn one child and never reap it
///
/// The child stays ZOMBIE until this process exits and the system reaper
/// adopts it. Callers that keep running should reap it themselves.
#[derive(Debug, Clone, Default)]
pub struct NoReap {
    config: StrategyConfig,
}

impl NoReap {
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }
}

impl ReapStrategy for NoReap {
    fn kind(&self) -> StrategyKind {
        StrategyKind::NoReap
    }

    fn config(&self) -> &StrategyConfig {
        &self.config
    }

    fn run(&self, inspector: &dyn ProcessInspector) -> LifecycleResult<StrategyReport> {
        let _span = span_strategy(self.kind().name()).entered();

        let child = match spawn()? {
            Branch::Child { own } => run_child(&self.config, own),
            Branch::Parent { child } => child,
        };
        info!(pid = %child, "Spawned child, leaving it unreaped");

        std::thread::sleep(self.config.settle);

        let observed = inspector.inspect(child)?;
        if !observed.is_zombie() {
            warn!(pid = %child, state = ?observed.state, "Unreaped child is not a zombie");
        }

        let mut report = StrategyReport::new(self.kind());
        report.children.push(ChildObservation {
            identity: child,
            role: ChildRole::Child,
            reaped: None,
            observed,
        });
        Ok(report)
    }
}
