/*!
 * Lifecycle Limits and Constants
 *
 * Timing defaults for the reaping strategies and the capacity of the
 * signal-handler reap log.
 */

use std::time::Duration;

// =============================================================================
// TIMING
// =============================================================================

/// Delay before the parent inspects or reaps (1s)
/// Long enough for a child that exits immediately to reach ZOMBIE first
pub const DEFAULT_SETTLE: Duration = Duration::from_secs(1);

/// How long a detached grandchild keeps running (2s)
/// Outlives the intermediate child so re-parenting is observable
pub const DEFAULT_GRANDCHILD_LINGER: Duration = Duration::from_secs(2);

/// Upper bound on waiting for the SIGCHLD handler to drain all children (5s)
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Poll interval while waiting on the handler's reap counter (10ms)
pub const NOTIFY_POLL_INTERVAL: Duration = Duration::from_millis(10);

// =============================================================================
// NOTIFICATION REAPER
// =============================================================================

/// Identities recorded by the SIGCHLD handler before the log saturates
/// Reaps past this point are still counted, only not recorded
pub const REAP_LOG_CAPACITY: usize = 64;

/// Children spawned by the notification strategy by default
pub const DEFAULT_NOTIFY_CHILDREN: usize = 3;
