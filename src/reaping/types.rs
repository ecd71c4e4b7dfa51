/*!
 * Strategy Types
 * Configuration and reports shared by the reaping strategies
 */

use crate::core::limits::{
    DEFAULT_GRANDCHILD_LINGER, DEFAULT_NOTIFY_CHILDREN, DEFAULT_NOTIFY_TIMEOUT, DEFAULT_SETTLE,
};
use crate::core::types::{ExitStatus, ProcessIdentity};
use crate::process::inspector::ProcessStateReport;
use crate::process::reap::ReapOutcome;
use crate::signals::ReapStats;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The reaping policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Never reap; the child stays ZOMBIE
    NoReap,
    /// Block in `wait` until the child terminates
    Blocking,
    /// Reap from a SIGCHLD handler
    Notify,
    /// Ignore SIGCHLD so the OS reclaims children
    Disinterest,
    /// Fork twice and let the system reaper adopt the grandchild
    Detach,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::NoReap,
        StrategyKind::Blocking,
        StrategyKind::Notify,
        StrategyKind::Disinterest,
        StrategyKind::Detach,
    ];

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            StrategyKind::NoReap => "no_reap",
            StrategyKind::Blocking => "blocking",
            StrategyKind::Notify => "notify",
            StrategyKind::Disinterest => "disinterest",
            StrategyKind::Detach => "detach",
        }
    }

    /// Whether a correct run leaves the direct child as a ZOMBIE
    #[must_use]
    pub const fn expects_zombie(&self) -> bool {
        matches!(self, StrategyKind::NoReap)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Timing and shape of a strategy run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyConfig {
    /// Parent delay before it inspects or reaps
    pub settle: Duration,
    /// How long each direct child runs before exiting
    pub child_linger: Duration,
    /// How long the detached grandchild runs before exiting
    pub grandchild_linger: Duration,
    /// Children spawned by the notification strategy
    pub children: usize,
    /// Exit code used by every child
    pub exit_code: i32,
    /// Upper bound on waiting for the SIGCHLD handler
    pub notify_timeout: Duration,
    /// Children print their identity to stdout
    pub announce: bool,
}

impl StrategyConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            settle: DEFAULT_SETTLE,
            child_linger: Duration::ZERO,
            grandchild_linger: DEFAULT_GRANDCHILD_LINGER,
            children: DEFAULT_NOTIFY_CHILDREN,
            exit_code: 0,
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
            announce: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_child_linger(mut self, linger: Duration) -> Self {
        self.child_linger = linger;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_grandchild_linger(mut self, linger: Duration) -> Self {
        self.grandchild_linger = linger;
        self
    }

    /// Clamped to at least one child
    #[inline]
    #[must_use]
    pub fn with_children(mut self, children: usize) -> Self {
        self.children = children.max(1);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_notify_timeout(mut self, timeout: Duration) -> Self {
        self.notify_timeout = timeout;
        self
    }

    #[inline]
    #[must_use]
    pub fn announce(mut self, announce: bool) -> Self {
        self.announce = announce;
        self
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of an observed process in the family tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildRole {
    /// Direct child of the strategy's process
    Child,
    /// Direct child that only exists to spawn a grandchild
    Intermediate,
    /// Grandchild handed to the system reaper
    Grandchild,
}

/// What the parent learned about one child
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildObservation {
    pub identity: ProcessIdentity,
    pub role: ChildRole,
    /// Exit status when this process reclaimed the child itself
    pub reaped: Option<ExitStatus>,
    /// Inspector report taken after the strategy's reap step
    pub observed: ProcessStateReport,
}

/// Outcome of one strategy run, as seen by the original parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyReport {
    pub strategy: StrategyKind,
    pub parent: ProcessIdentity,
    pub children: Vec<ChildObservation>,
    /// Non-blocking reap issued after the strategy finished
    pub followup: Option<ReapOutcome>,
    /// Handler counters, notification strategy only
    pub notify: Option<ReapStats>,
}

impl StrategyReport {
    #[must_use]
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            parent: ProcessIdentity::current(),
            children: Vec::new(),
            followup: None,
            notify: None,
        }
    }

    /// Observations for `role`, in spawn order
    pub fn with_role(&self, role: ChildRole) -> impl Iterator<Item = &ChildObservation> {
        self.children.iter().filter(move |c| c.role == role)
    }

    /// Direct children still occupying a table slot as ZOMBIE
    #[must_use]
    pub fn zombies(&self) -> Vec<ProcessIdentity> {
        self.children
            .iter()
            .filter(|c| c.observed.is_zombie())
            .map(|c| c.identity)
            .collect()
    }

    /// True when the observed zombie set matches what the strategy promises
    #[must_use]
    pub fn upholds_contract(&self) -> bool {
        let direct_zombies = self
            .children
            .iter()
            .filter(|c| c.role != ChildRole::Grandchild && c.observed.is_zombie())
            .count();
        if self.strategy.expects_zombie() {
            direct_zombies == self.children.len()
        } else {
            direct_zombies == 0
        }
    }
}
