/*!
 * Reap Primitives
 * Blocking, targeted, and non-blocking reclamation of terminated children
 */

use crate::core::errors::{LifecycleError, LifecycleResult};
use crate::core::types::{ExitStatus, ProcessIdentity};
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A child whose record has been reclaimed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReapedChild {
    pub identity: ProcessIdentity,
    pub status: ExitStatus,
}

/// Result of a non-blocking reap attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReapOutcome {
    /// A terminated child was reclaimed
    Reaped(ReapedChild),
    /// Eligible children exist but none has terminated yet
    StillRunning,
    /// No unreaped children remain
    NoChildren,
}

/// Block until any child terminates, then reclaim it
///
/// Returns immediately when a child is already ZOMBIE. `EINTR` is retried.
///
/// # Errors
/// `NoChildren` when the caller has no unreaped children.
pub fn wait_any() -> LifecycleResult<ReapedChild> {
    blocking_wait(None)
}

/// Block until the child `target` terminates, then reclaim it
///
/// Never reclaims any other child, even one that is already ZOMBIE.
///
/// # Errors
/// `NoChildren` when `target` is not an unreaped child of the caller,
/// including a second reap of an identity already reclaimed.
pub fn wait_for(target: ProcessIdentity) -> LifecycleResult<ReapedChild> {
    blocking_wait(Some(target))
}

fn blocking_wait(target: Option<ProcessIdentity>) -> LifecycleResult<ReapedChild> {
    let pid = target.map(ProcessIdentity::as_nix);
    loop {
        match waitpid(pid, None) {
            Ok(status) => {
                if let Some((identity, status)) = ExitStatus::from_wait_status(status) {
                    info!(pid = %identity, %status, "Reaped child");
                    return Ok(ReapedChild { identity, status });
                }
                debug!(?status, "Ignoring non-terminal wait status");
            }
            Err(Errno::EINTR) => {
                debug!(pid = ?target, "Wait interrupted, retrying");
            }
            Err(Errno::ECHILD) => return Err(LifecycleError::NoChildren),
            Err(errno) => return Err(LifecycleError::WaitFailed(errno)),
        }
    }
}

/// Reclaim one terminated child without blocking
///
/// `target` of `None` accepts any child. Performs no allocation, locking or
/// logging, so it is safe to call from a signal handler.
///
/// # Errors
/// `WaitFailed` for errno values other than `ECHILD` and `EINTR`.
pub fn try_reap(target: Option<ProcessIdentity>) -> LifecycleResult<ReapOutcome> {
    let pid = target.map(ProcessIdentity::as_nix);
    loop {
        match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => return Ok(ReapOutcome::StillRunning),
            Ok(status) => match ExitStatus::from_wait_status(status) {
                Some((identity, status)) => {
                    return Ok(ReapOutcome::Reaped(ReapedChild { identity, status }))
                }
                // stop/continue report; the child is still alive
                None => return Ok(ReapOutcome::StillRunning),
            },
            Err(Errno::EINTR) => continue,
            Err(Errno::ECHILD) => return Ok(ReapOutcome::NoChildren),
            Err(errno) => return Err(LifecycleError::WaitFailed(errno)),
        }
    }
}

/// Reclaim every child that has already terminated
///
/// Stops at the first `StillRunning` or `NoChildren`, invoking `on_reaped`
/// for each reclaimed child. Returns the number reclaimed.
pub fn drain<F>(mut on_reaped: F) -> LifecycleResult<usize>
where
    F: FnMut(ReapedChild),
{
    let mut reaped = 0;
    while let ReapOutcome::Reaped(child) = try_reap(None)? {
        on_reaped(child);
        reaped += 1;
    }
    Ok(reaped)
}
