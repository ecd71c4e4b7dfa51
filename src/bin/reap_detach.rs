/*!
 * reap-detach - Fork Twice
 *
 * The intermediate child exits right after spawning the worker, so the
 * worker is adopted by the system reaper and this process only waits on the
 * intermediate child.
 */

use proc_lifecycle::reaping::{ChildRole, DoubleFork};
use proc_lifecycle::{init_tracing, run_strategy, ProcessIdentity, StrategyConfig};

fn main() -> miette::Result<()> {
    init_tracing();
    println!("parent process pid = {}", ProcessIdentity::current());

    let report = run_strategy(&DoubleFork::new(StrategyConfig::default().announce(true)))?;

    for child in report.with_role(ChildRole::Intermediate) {
        println!("first child pid = {} reaped", child.identity);
    }
    for child in report.with_role(ChildRole::Grandchild) {
        if let Some(parent) = child.observed.parent {
            println!("second child pid = {}, now parented by {}", child.identity, parent);
        }
    }
    Ok(())
}
