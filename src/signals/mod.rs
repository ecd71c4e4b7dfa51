/*!
 * Signals Module
 * SIGCHLD dispositions and the signal-driven reaper
 */

pub mod disposition;
mod handler;

pub use disposition::{declare_disinterest, is_disinterested, restore_default};
pub use handler::{NotificationReaper, ReapStats};
