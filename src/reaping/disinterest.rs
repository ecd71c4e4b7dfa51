/*!
 * Disinterest Strategy
 * SIGCHLD ignored; the OS reclaims children on exit
 */

use super::traits::ReapStrategy;
use super::types::{ChildObservation, ChildRole, StrategyConfig, StrategyKind, StrategyReport};
use super::run_child;
use crate::core::errors::LifecycleResult;
use crate::monitoring::span_strategy;
use crate::process::inspector::ProcessInspector;
use crate::process::reap::{try_reap, ReapOutcome};
use crate::process::spawner::{spawn, Branch};
use crate::signals::declare_disinterest;
use tracing::{info, warn};

/// Declare disinterest, then spawn one child and never wait for it
///
/// The declaration is process-wide and outlives `run`.
#[derive(Debug, Clone, Default)]
pub struct Disinterest {
    config: StrategyConfig,
}

impl Disinterest {
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }
}

impl ReapStrategy for Disinterest {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Disinterest
    }

    fn config(&self) -> &StrategyConfig {
        &self.config
    }

    fn run(&self, inspector: &dyn ProcessInspector) -> LifecycleResult<StrategyReport> {
        let _span = span_strategy(self.kind().name()).entered();

        declare_disinterest()?;

        let child = match spawn()? {
            Branch::Child { own } => run_child(&self.config, own),
            Branch::Parent { child } => child,
        };
        info!(pid = %child, "Spawned child under disinterest");

        std::thread::sleep(self.config.settle);

        let observed = inspector.inspect(child)?;
        if observed.is_zombie() {
            warn!(pid = %child, "Child became a zombie despite ignored SIGCHLD");
        }

        // the OS already took the record, so there is nothing left to wait on
        let followup = try_reap(Some(child))?;
        if let ReapOutcome::Reaped(reaped) = followup {
            warn!(pid = %reaped.identity, "Reclaimed a child the OS should have taken");
        }

        let mut report = StrategyReport::new(self.kind());
        report.children.push(ChildObservation {
            identity: child,
            role: ChildRole::Child,
            reaped: None,
            observed,
        });
        report.followup = Some(followup);
        Ok(report)
    }
}
