/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use super::types::ProcessIdentity;
use miette::Diagnostic;
use nix::errno::Errno;
use thiserror::Error;

/// Lifecycle operation result
///
/// # Must Use
/// A dropped spawn or reap error leaks a process table entry
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Process lifecycle errors
#[derive(Error, Debug, Diagnostic)]
pub enum LifecycleError {
    #[error("Process table exhausted: {0}")]
    #[diagnostic(
        code(lifecycle::resource_exhaustion),
        help("No process slot is available. Reap finished children or raise the process limit.")
    )]
    ResourceExhaustion(Errno),

    #[error("Failed to spawn child: {0}")]
    #[diagnostic(code(lifecycle::spawn_failed))]
    SpawnFailed(Errno),

    #[error("No unreaped children remain")]
    #[diagnostic(
        code(lifecycle::no_children),
        help("Every child was already reclaimed, or the target is not our child.")
    )]
    NoChildren,

    #[error("Wait failed: {0}")]
    #[diagnostic(code(lifecycle::wait_failed))]
    WaitFailed(Errno),

    #[error("Failed to change SIGCHLD disposition: {0}")]
    #[diagnostic(code(lifecycle::signal_setup))]
    SignalSetup(Errno),

    #[error("Notification reaper collected {reaped} of {expected} children before timing out")]
    #[diagnostic(
        code(lifecycle::notify_timeout),
        help("A child may still be running, or the SIGCHLD handler was disarmed.")
    )]
    NotifyTimeout { expected: usize, reaped: usize },

    #[error("Failed to inspect process {pid}: {source}")]
    #[diagnostic(code(lifecycle::inspect_failed))]
    Inspect {
        pid: ProcessIdentity,
        #[source]
        source: std::io::Error,
    },

    #[error("Child channel failed: {0}")]
    #[diagnostic(code(lifecycle::channel))]
    Channel(#[from] std::io::Error),
}

impl LifecycleError {
    /// Map a fork errno onto the spawn error taxonomy
    #[must_use]
    pub fn from_fork(errno: Errno) -> Self {
        match errno {
            Errno::EAGAIN | Errno::ENOMEM => LifecycleError::ResourceExhaustion(errno),
            other => LifecycleError::SpawnFailed(other),
        }
    }

    /// True for the expected "nothing left to reap" outcome
    #[inline]
    #[must_use]
    pub const fn is_no_children(&self) -> bool {
        matches!(self, LifecycleError::NoChildren)
    }
}
