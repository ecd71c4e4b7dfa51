/*!
 * zombie - Produce a Zombie Process
 *
 * Spawns a child that exits immediately and never reaps it, then prints the
 * child's process-table state (expected `Z (zombie)`).
 */

use proc_lifecycle::reaping::NoReap;
use proc_lifecycle::{init_tracing, run_strategy, ProcessIdentity, StrategyConfig};
use tracing::info;

fn main() -> miette::Result<()> {
    init_tracing();
    println!("parent process pid = {}", ProcessIdentity::current());

    let strategy = NoReap::new(StrategyConfig::default().announce(true));
    let report = run_strategy(&strategy)?;

    for child in &report.children {
        println!("state of child {}: {}", child.identity, child.observed);
    }
    info!("Exiting; the system reaper adopts the zombie");
    Ok(())
}
