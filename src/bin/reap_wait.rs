/*!
 * reap-wait - Reap With a Blocking Wait
 *
 * Spawns a child, lets it exit, then reclaims it with `wait`. The child's
 * process-table entry is gone afterwards.
 */

use proc_lifecycle::reaping::BlockingWait;
use proc_lifecycle::{init_tracing, run_strategy, ProcessIdentity, StrategyConfig};

fn main() -> miette::Result<()> {
    init_tracing();
    println!("parent process pid = {}", ProcessIdentity::current());

    let strategy = BlockingWait::new(StrategyConfig::default().announce(true));
    let report = run_strategy(&strategy)?;

    for child in &report.children {
        if let Some(status) = child.reaped {
            println!("reaped child process pid = {} ({})", child.identity, status);
        }
        println!("state of child {}: {}", child.identity, child.observed);
    }
    Ok(())
}
