/*!
 * SIGCHLD Notification Reaper
 * Signal-driven reclamation with lock-free shared state
 *
 * The handler runs interleaved with the main flow on whichever thread the
 * kernel picks. It touches only atomics and `waitpid`: no allocation, no
 * locks, no logging. Results flow back to the main flow through the
 * process-wide `REAP_LOG`.
 */

use super::disposition::install;
use crate::core::errors::{LifecycleError, LifecycleResult};
use crate::core::limits::{NOTIFY_POLL_INTERVAL, REAP_LOG_CAPACITY};
use crate::core::types::ProcessIdentity;
use crate::process::reap;
use nix::errno::Errno;
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet};
use serde::{Deserialize, Serialize};
use std::ffi::c_int;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Snapshot of the handler's counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReapStats {
    /// SIGCHLD deliveries observed (several exits may coalesce into one)
    pub deliveries: usize,
    /// Children reclaimed by the handler or the arming drain
    pub reaped: usize,
    /// Reclaimed children whose identity did not fit in the log
    pub dropped: usize,
}

/// Fixed-capacity, append-only record of reaped identities
///
/// # Performance
/// - Cache-line aligned so the hot counters don't share a line with other statics
#[repr(C, align(64))]
struct ReapLog {
    deliveries: AtomicUsize,
    next_slot: AtomicUsize,
    reaped: AtomicUsize,
    entries: [AtomicI32; REAP_LOG_CAPACITY],
}

const EMPTY_SLOT: AtomicI32 = AtomicI32::new(0);

impl ReapLog {
    const fn new() -> Self {
        Self {
            deliveries: AtomicUsize::new(0),
            next_slot: AtomicUsize::new(0),
            reaped: AtomicUsize::new(0),
            entries: [EMPTY_SLOT; REAP_LOG_CAPACITY],
        }
    }

    /// Async-signal-safe
    #[inline(always)]
    fn record(&self, identity: ProcessIdentity) {
        let slot = self.next_slot.fetch_add(1, Ordering::AcqRel);
        if let Some(entry) = self.entries.get(slot) {
            entry.store(identity.as_raw(), Ordering::Release);
        }
        // counted after the store so readers never see a count ahead of its entry
        self.reaped.fetch_add(1, Ordering::AcqRel);
    }

    fn reset(&self) {
        for entry in &self.entries {
            entry.store(0, Ordering::Relaxed);
        }
        self.deliveries.store(0, Ordering::Relaxed);
        self.next_slot.store(0, Ordering::Relaxed);
        self.reaped.store(0, Ordering::Release);
    }

    fn snapshot(&self) -> ReapStats {
        let reaped = self.reaped.load(Ordering::Acquire);
        ReapStats {
            deliveries: self.deliveries.load(Ordering::Acquire),
            reaped,
            dropped: reaped.saturating_sub(REAP_LOG_CAPACITY),
        }
    }

    fn identities(&self) -> Vec<ProcessIdentity> {
        self.entries
            .iter()
            .map(|entry| entry.load(Ordering::Acquire))
            .filter(|&raw| raw != 0)
            .map(ProcessIdentity::from_raw)
            .collect()
    }
}

static REAP_LOG: ReapLog = ReapLog::new();
static ARMED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_sigchld(_signo: c_int) {
    let saved = Errno::last_raw();
    REAP_LOG.deliveries.fetch_add(1, Ordering::AcqRel);
    // NoChildren/StillRunning end the loop; a hard wait error has nowhere
    // to go from here
    let _ = reap::drain(|child| REAP_LOG.record(child.identity));
    Errno::set_raw(saved);
}

/// Handle to the process-wide SIGCHLD reaper
///
/// Armed once per process; stays armed until [`NotificationReaper::disarm`].
#[derive(Debug)]
pub struct NotificationReaper {
    _private: (),
}

impl NotificationReaper {
    /// Install the SIGCHLD handler, then drain children that already exited
    ///
    /// Arm before spawning. The drain covers children that became ZOMBIE
    /// before the handler existed, whose notification was discarded under
    /// the default disposition. Arming an armed reaper keeps its counters.
    pub fn arm() -> LifecycleResult<Self> {
        if ARMED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            REAP_LOG.reset();
            let action = SigAction::new(
                SigHandler::Handler(on_sigchld),
                SaFlags::SA_RESTART | SaFlags::SA_NOCLDSTOP,
                SigSet::empty(),
            );
            if let Err(e) = install(action) {
                ARMED.store(false, Ordering::Release);
                return Err(e);
            }
            info!("SIGCHLD notification reaper armed");
        } else {
            debug!("SIGCHLD notification reaper already armed");
        }

        let early = reap::drain(|child| REAP_LOG.record(child.identity))?;
        if early > 0 {
            debug!(reaped = early, "Drained children that exited before arming");
        }

        Ok(Self { _private: () })
    }

    /// Whether the handler is currently installed
    pub fn is_armed() -> bool {
        ARMED.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> ReapStats {
        REAP_LOG.snapshot()
    }

    /// Identities reaped so far, in log order
    pub fn reaped(&self) -> Vec<ProcessIdentity> {
        REAP_LOG.identities()
    }

    /// Wait until at least `expected` children have been reaped
    ///
    /// # Errors
    /// `NotifyTimeout` when `timeout` elapses first.
    pub fn wait_for_reaped(
        &self,
        expected: usize,
        timeout: Duration,
    ) -> LifecycleResult<Vec<ProcessIdentity>> {
        let deadline = Instant::now() + timeout;
        loop {
            let reaped = REAP_LOG.reaped.load(Ordering::Acquire);
            if reaped >= expected {
                return Ok(self.reaped());
            }
            if Instant::now() >= deadline {
                warn!(expected, reaped, "Timed out waiting for SIGCHLD reaps");
                return Err(LifecycleError::NotifyTimeout { expected, reaped });
            }
            std::thread::sleep(NOTIFY_POLL_INTERVAL);
        }
    }

    /// Restore the default SIGCHLD disposition
    ///
    /// Children exiting afterwards stay ZOMBIE until reaped another way.
    pub fn disarm(self) -> LifecycleResult<ReapStats> {
        install(SigAction::new(
            SigHandler::SigDfl,
            SaFlags::empty(),
            SigSet::empty(),
        ))?;
        ARMED.store(false, Ordering::Release);
        let stats = REAP_LOG.snapshot();
        info!(
            deliveries = stats.deliveries,
            reaped = stats.reaped,
            "SIGCHLD notification reaper disarmed"
        );
        Ok(stats)
    }
}
