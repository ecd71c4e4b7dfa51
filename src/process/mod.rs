/*!
 * Process Module
 * Spawning, reaping, and inspection primitives
 */

pub mod inspector;
pub mod reap;
pub mod spawner;

// Re-export for convenience
pub use inspector::{
    parse_status, ProcState, ProcessInspector, ProcessStateReport, ProcfsInspector,
};
pub use reap::{drain, try_reap, wait_any, wait_for, ReapOutcome, ReapedChild};
pub use spawner::{exit_child, spawn, Branch};
