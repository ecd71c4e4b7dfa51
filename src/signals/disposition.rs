/*!
 * SIGCHLD Disposition
 * Process-wide declarations about child termination status
 */

use crate::core::errors::{LifecycleError, LifecycleResult};
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use tracing::info;

/// Declare that this process will never collect child exit statuses
///
/// Sets SIGCHLD to `SIG_IGN` with `SA_NOCLDWAIT`: the OS reclaims every
/// current and future child the moment it terminates, and `wait` calls
/// report `NoChildren` once they are gone. Must be called before spawning.
pub fn declare_disinterest() -> LifecycleResult<()> {
    let action = SigAction::new(SigHandler::SigIgn, SaFlags::SA_NOCLDWAIT, SigSet::empty());
    install(action)?;
    info!("Declared disinterest in child status (SIGCHLD ignored)");
    Ok(())
}

/// Restore the default SIGCHLD disposition
///
/// Children terminating afterwards become zombies again until reaped.
pub fn restore_default() -> LifecycleResult<()> {
    let action = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
    install(action)?;
    info!("Restored default SIGCHLD disposition");
    Ok(())
}

/// True when SIGCHLD is currently ignored
///
/// A child terminating during the brief swap below is left as a zombie,
/// so only call this while no children are running.
pub fn is_disinterested() -> LifecycleResult<bool> {
    // sigaction has no query-only form: read by swapping in the default,
    // then put the previous action straight back.
    let previous = install(SigAction::new(
        SigHandler::SigDfl,
        SaFlags::empty(),
        SigSet::empty(),
    ))?;
    let ignored = matches!(previous.handler(), SigHandler::SigIgn);
    install(previous)?;
    Ok(ignored)
}

pub(crate) fn install(action: SigAction) -> LifecycleResult<SigAction> {
    // SAFETY: the handlers installed through this crate are SIG_IGN, SIG_DFL
    // or `on_sigchld`, which only touches atomics and waitpid.
    unsafe { sigaction(Signal::SIGCHLD, &action) }.map_err(LifecycleError::SignalSetup)
}
