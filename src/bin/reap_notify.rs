/*!
 * reap-notify - Reap From a SIGCHLD Handler
 *
 * Installs the SIGCHLD handler before spawning; the handler drains every
 * terminated child as notifications arrive.
 */

use proc_lifecycle::reaping::NotifyReap;
use proc_lifecycle::{init_tracing, run_strategy, ProcessIdentity, StrategyConfig};

fn main() -> miette::Result<()> {
    init_tracing();
    println!("parent process pid = {}", ProcessIdentity::current());

    let strategy = NotifyReap::new(StrategyConfig::default().announce(true));
    let report = run_strategy(&strategy)?;

    for child in &report.children {
        println!("received SIGCHLD from child process pid = {}", child.identity);
    }
    for child in &report.children {
        println!("state of child {}: {}", child.identity, child.observed);
    }
    Ok(())
}
