/*!
 * Reaping Strategies
 * Pluggable parent-side policies for reclaiming child records
 */

mod blocking;
mod detach;
mod disinterest;
mod no_reap;
mod notify;
pub mod traits;
pub mod types;

pub use blocking::BlockingWait;
pub use detach::DoubleFork;
pub use disinterest::Disinterest;
pub use no_reap::NoReap;
pub use notify::NotifyReap;
pub use traits::ReapStrategy;
pub use types::{ChildObservation, ChildRole, StrategyConfig, StrategyKind, StrategyReport};

use crate::core::types::ProcessIdentity;
use crate::process::spawner::exit_child;

/// Build the strategy for `kind`
pub fn strategy_for(kind: StrategyKind, config: StrategyConfig) -> Box<dyn ReapStrategy> {
    match kind {
        StrategyKind::NoReap => Box::new(NoReap::new(config)),
        StrategyKind::Blocking => Box::new(BlockingWait::new(config)),
        StrategyKind::Notify => Box::new(NotifyReap::new(config)),
        StrategyKind::Disinterest => Box::new(Disinterest::new(config)),
        StrategyKind::Detach => Box::new(DoubleFork::new(config)),
    }
}

/// Body of an ordinary child branch: announce, linger, exit
pub(crate) fn run_child(config: &StrategyConfig, own: ProcessIdentity) -> ! {
    if config.announce {
        println!("child process pid = {}", own);
    }
    if !config.child_linger.is_zero() {
        std::thread::sleep(config.child_linger);
    }
    exit_child(config.exit_code)
}
