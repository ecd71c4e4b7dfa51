/*!
 * Core Types
 * Process identities and exit statuses shared across the crate
 */

use nix::sys::wait::WaitStatus;
use nix::unistd::{getpid, getppid, Pid};
use serde::{Deserialize, Serialize};
use std::fmt;

/// OS-assigned process identifier
///
/// A handle, not a resource: holding one does not keep the process table
/// entry alive, and the OS reuses the number once the record is reclaimed.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessIdentity(i32);

impl ProcessIdentity {
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        self.0
    }

    /// Identity of the calling process
    #[inline]
    #[must_use]
    pub fn current() -> Self {
        getpid().into()
    }

    /// Identity of the calling process's current parent
    ///
    /// Changes after re-parenting: once the original parent exits this
    /// returns the system reaper (or the nearest subreaper).
    #[inline]
    #[must_use]
    pub fn parent() -> Self {
        getppid().into()
    }

    #[inline]
    #[must_use]
    pub fn as_nix(self) -> Pid {
        Pid::from_raw(self.0)
    }
}

impl From<Pid> for ProcessIdentity {
    #[inline]
    fn from(pid: Pid) -> Self {
        Self(pid.as_raw())
    }
}

impl From<ProcessIdentity> for Pid {
    #[inline]
    fn from(identity: ProcessIdentity) -> Self {
        identity.as_nix()
    }
}

impl fmt::Display for ProcessIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a reaped child terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExitStatus {
    /// Child called exit with the given code
    Exited { code: i32 },
    /// Child was terminated by a signal
    Signaled { signal: i32, core_dumped: bool },
}

impl ExitStatus {
    #[inline]
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self, ExitStatus::Exited { code: 0 })
    }

    #[inline]
    #[must_use]
    pub const fn code(&self) -> Option<i32> {
        match self {
            ExitStatus::Exited { code } => Some(*code),
            ExitStatus::Signaled { .. } => None,
        }
    }

    /// Extract a terminal status from a wait result
    ///
    /// Stop/continue/ptrace notifications and `StillAlive` are not
    /// terminations and yield `None`.
    #[must_use]
    pub fn from_wait_status(status: WaitStatus) -> Option<(ProcessIdentity, Self)> {
        match status {
            WaitStatus::Exited(pid, code) => Some((pid.into(), ExitStatus::Exited { code })),
            WaitStatus::Signaled(pid, signal, core_dumped) => Some((
                pid.into(),
                ExitStatus::Signaled {
                    signal: signal as i32,
                    core_dumped,
                },
            )),
            _ => None,
        }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Exited { code } => write!(f, "exited with code {}", code),
            ExitStatus::Signaled {
                signal,
                core_dumped: true,
            } => write!(f, "killed by signal {} (core dumped)", signal),
            ExitStatus::Signaled { signal, .. } => write!(f, "killed by signal {}", signal),
        }
    }
}
