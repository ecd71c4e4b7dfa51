/*!
 * Blocking Strategy
 * Parent suspends in wait until its child terminates
 */

use super::traits::ReapStrategy;
use super::types::{ChildObservation, ChildRole, StrategyConfig, StrategyKind, StrategyReport};
use super::run_child;
use crate::core::errors::LifecycleResult;
use crate::monitoring::span_strategy;
use crate::process::inspector::ProcessInspector;
use crate::process::reap::{try_reap, wait_any};
use crate::process::spawner::{spawn, Branch};
use tracing::{debug, info, warn};

/// Spawn one child and reclaim it with a blocking wait
///
/// With a non-zero settle delay the child is usually ZOMBIE before the
/// wait starts, and the wait completes without blocking.
#[derive(Debug, Clone, Default)]
pub struct BlockingWait {
    config: StrategyConfig,
}

impl BlockingWait {
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }
}

impl ReapStrategy for BlockingWait {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Blocking
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
        info!(pid = %child, "Spawned child");

        if !self.config.settle.is_zero() {
            debug!(settle = ?self.config.settle, "Delaying before wait");
            std::thread::sleep(self.config.settle);
        }

        let reaped = wait_any()?;

        let mut report = StrategyReport::new(self.kind());
        report.children.push(ChildObservation {
            identity: reaped.identity,
            role: ChildRole::Child,
            reaped: Some(reaped.status),
            observed: inspector.inspect(reaped.identity)?,
        });

        // Our own child is still unreaped; keep it in the report
        if reaped.identity != child {
            warn!(expected = %child, reaped = %reaped.identity, "Wait reclaimed a different child");
            report.children.push(ChildObservation {
                identity: child,
                role: ChildRole::Child,
                reaped: None,
                observed: inspector.inspect(child)?,
            });
        }

        // A reclaimed identity is no longer ours to reap
        report.followup = Some(try_reap(Some(reaped.identity))?);
        Ok(report)
    }
}
