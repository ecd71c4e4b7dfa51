/*!
 * Notification Strategy
 * SIGCHLD handler reclaims children as they terminate
 */

use super::traits::ReapStrategy;
use super::types::{ChildObservation, ChildRole, StrategyConfig, StrategyKind, StrategyReport};
use super::run_child;
use crate::core::errors::LifecycleResult;
use crate::core::limits::REAP_LOG_CAPACITY;
use crate::monitoring::span_strategy;
use crate::process::inspector::ProcessInspector;
use crate::process::spawner::{spawn, Branch};
use crate::signals::NotificationReaper;
use tracing::{info, warn};

/// Arm the SIGCHLD reaper, then spawn `config.children` children
///
/// The handler stays armed after `run` returns.
#[derive(Debug, Clone, Default)]
pub struct NotifyReap {
    config: StrategyConfig,
}

impl NotifyReap {
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }
}

impl ReapStrategy for NotifyReap {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Notify
    }

    fn config(&self) -> &StrategyConfig {
        &self.config
    }

    fn run(&self, inspector: &dyn ProcessInspector) -> LifecycleResult<StrategyReport> {
        let _span = span_strategy(self.kind().name()).entered();

        // armed before the first fork so no termination goes unnoticed
        let reaper = NotificationReaper::arm()?;
        let baseline = reaper.stats().reaped;

        let mut children = Vec::with_capacity(self.config.children);
        for _ in 0..self.config.children {
            match spawn()? {
                Branch::Child { own } => run_child(&self.config, own),
                Branch::Parent { child } => children.push(child),
            }
        }
        info!(count = children.len(), "Spawned children");

        let reaped =
            reaper.wait_for_reaped(baseline + children.len(), self.config.notify_timeout)?;

        let mut report = StrategyReport::new(self.kind());
        for &child in &children {
            if !reaped.contains(&child) && reaped.len() < REAP_LOG_CAPACITY {
                warn!(pid = %child, "Child missing from the handler's reap log");
            }
            report.children.push(ChildObservation {
                identity: child,
                role: ChildRole::Child,
                reaped: None,
                observed: inspector.inspect(child)?,
            });
        }

        let stats = reaper.stats();
        info!(
            deliveries = stats.deliveries,
            reaped = stats.reaped,
            "Handler drained children"
        );
        report.notify = Some(stats);
        Ok(report)
    }
}
