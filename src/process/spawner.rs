/*!
 * Process Spawner
 * Fork-based child creation with a tagged two-branch result
 */

use crate::core::errors::{LifecycleError, LifecycleResult};
use crate::core::types::ProcessIdentity;
use nix::unistd::{fork, ForkResult};

/// Which side of a fork the caller resumed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// Original process; `child` is the new record in RUNNING state
    Parent { child: ProcessIdentity },
    /// New process; `own` is its freshly assigned identity
    Child { own: ProcessIdentity },
}

/// Create a child process
///
/// Invokes `fork` exactly once and returns in both processes. The child
/// branch must finish through [`exit_child`]; it must not return into code
/// that expects to run once (test harness, destructors of shared state).
///
/// # Errors
/// `ResourceExhaustion` when the process table or memory is exhausted
/// (`EAGAIN`/`ENOMEM`); `SpawnFailed` for anything else. Neither is retried.
pub fn spawn() -> LifecycleResult<Branch> {
    // SAFETY: the child branch only performs async-signal-safe work
    // (raw syscalls, stdout writes in single-threaded executables) before
    // leaving through `_exit`.
    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => Ok(Branch::Parent {
            child: child.into(),
        }),
        Ok(ForkResult::Child) => Ok(Branch::Child {
            own: ProcessIdentity::current(),
        }),
        Err(errno) => Err(LifecycleError::from_fork(errno)),
    }
}

/// Terminate a child branch with `code`
///
/// Calls `_exit` so no destructors or atexit hooks inherited from the
/// parent run twice. Stdout is line buffered; anything printed without a
/// trailing newline is lost.
pub fn exit_child(code: i32) -> ! {
    // SAFETY: `_exit` is async-signal-safe and never returns; it skips
    // atexit handlers and stdio teardown shared with the parent.
    unsafe { nix::libc::_exit(code) }
}
