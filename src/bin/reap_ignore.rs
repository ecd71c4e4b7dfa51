/*!
 * reap-ignore - Let the OS Reap Children
 *
 * Ignores SIGCHLD before spawning, so the child never lingers as a zombie.
 */

use proc_lifecycle::reaping::Disinterest;
use proc_lifecycle::{init_tracing, run_strategy, ProcessIdentity, StrategyConfig};

fn main() -> miette::Result<()> {
    init_tracing();
    println!("parent process pid = {}", ProcessIdentity::current());

    let report = run_strategy(&Disinterest::new(StrategyConfig::default().announce(true)))?;

    for child in &report.children {
        println!("state of child {}: {}", child.identity, child.observed);
    }
    Ok(())
}
