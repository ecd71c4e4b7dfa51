/*!
 * Detach Strategy
 * Fork twice so the system reaper adopts the long-lived grandchild
 */

use super::traits::ReapStrategy;
use super::types::{ChildObservation, ChildRole, StrategyConfig, StrategyKind, StrategyReport};
use crate::core::errors::{LifecycleError, LifecycleResult};
use crate::core::types::ProcessIdentity;
use crate::monitoring::span_strategy;
use crate::process::inspector::ProcessInspector;
use crate::process::reap::wait_for;
use crate::process::spawner::{exit_child, spawn, Branch};
use nix::unistd::pipe;
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::os::fd::OwnedFd;
use tracing::{info, warn};

/// Spawn an intermediate child that spawns the real worker and exits
///
/// The original process waits only on the intermediate child, by identity.
/// The intermediate child reports the grandchild's identity over a pipe
/// before exiting so the parent can inspect it.
#[derive(Debug, Clone, Default)]
pub struct DoubleFork {
    config: StrategyConfig,
}

impl DoubleFork {
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }

    /// Intermediate child: spawn the grandchild, report it, exit regardless
    fn run_intermediate(&self, reader: OwnedFd, writer: OwnedFd) -> ! {
        drop(reader);
        match spawn() {
            Ok(Branch::Parent { child: grandchild }) => {
                let mut channel = File::from(writer);
                let code = match channel.write_all(&grandchild.as_raw().to_le_bytes()) {
                    Ok(()) => 0,
                    Err(_) => 1,
                };
                exit_child(code)
            }
            Ok(Branch::Child { .. }) => {
                drop(writer);
                self.run_grandchild()
            }
            Err(_) => exit_child(1),
        }
    }

    fn run_grandchild(&self) -> ! {
        std::thread::sleep(self.config.grandchild_linger);
        if self.config.announce {
            println!("second child, parent pid = {}", ProcessIdentity::parent());
        }
        exit_child(self.config.exit_code)
    }
}

/// Read the grandchild identity; `None` when the intermediate never sent one
fn receive_identity(reader: OwnedFd) -> LifecycleResult<Option<ProcessIdentity>> {
    let mut buf = [0u8; 4];
    match File::from(reader).read_exact(&mut buf) {
        Ok(()) => Ok(Some(ProcessIdentity::from_raw(i32::from_le_bytes(buf)))),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(LifecycleError::Channel(e)),
    }
}

impl ReapStrategy for DoubleFork {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Detach
    }

    fn config(&self) -> &StrategyConfig {
        &self.config
    }

    fn run(&self, inspector: &dyn ProcessInspector) -> LifecycleResult<StrategyReport> {
        let _span = span_strategy(self.kind().name()).entered();

        let (reader, writer) = pipe().map_err(|e| LifecycleError::Channel(e.into()))?;

        let intermediate = match spawn()? {
            Branch::Child { .. } => self.run_intermediate(reader, writer),
            Branch::Parent { child } => child,
        };
        drop(writer);
        info!(pid = %intermediate, "Spawned intermediate child");

        // targeted: "any child" could pick up an unrelated zombie instead
        let reaped = wait_for(intermediate)?;
        let grandchild = receive_identity(reader)?;

        let mut report = StrategyReport::new(self.kind());
        report.children.push(ChildObservation {
            identity: intermediate,
            role: ChildRole::Intermediate,
            reaped: Some(reaped.status),
            observed: inspector.inspect(intermediate)?,
        });

        match grandchild {
            Some(grandchild) => {
                let observed = inspector.inspect(grandchild)?;
                info!(
                    pid = %grandchild,
                    adopted_by = ?observed.parent,
                    "Grandchild detached"
                );
                report.children.push(ChildObservation {
                    identity: grandchild,
                    role: ChildRole::Grandchild,
                    reaped: None,
                    observed,
                });
            }
            None => warn!(pid = %intermediate, "Intermediate child exited without a grandchild"),
        }

        Ok(report)
    }
}
