/*!
 * Shared test fixtures
 * Guards that put process-wide signal state back when a test ends or panics
 */

use nix::sys::signal::{sigaction, SigAction, Signal};
use proc_lifecycle::restore_default;

/// Restores the default SIGCHLD disposition on drop
pub struct DefaultSigchld;

impl Drop for DefaultSigchld {
    fn drop(&mut self) {
        let _ = restore_default();
    }
}

/// Installs `action` for `signal` and reinstates the previous action on drop
pub struct ScopedAction {
    signal: Signal,
    previous: SigAction,
}

impl ScopedAction {
    pub fn install(signal: Signal, action: &SigAction) -> Self {
        // SAFETY: test handlers only touch atomics.
        let previous = unsafe { sigaction(signal, action) }.unwrap();
        Self { signal, previous }
    }
}

impl Drop for ScopedAction {
    fn drop(&mut self) {
        // SAFETY: reinstates the action that was in place before `install`.
        let _ = unsafe { sigaction(self.signal, &self.previous) };
    }
}
