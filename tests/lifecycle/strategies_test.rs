/*!
 * Reaping Strategy Tests
 * Zombie observations for each policy under short timings
 */

use pretty_assertions::assert_eq;
use proc_lifecycle::process::exit_child;
use proc_lifecycle::reaping::{BlockingWait, ChildRole, Disinterest, DoubleFork, NoReap, NotifyReap};
use proc_lifecycle::{
    spawn, strategy_for, wait_for, Branch, ExitStatus, NotificationReaper,
    ProcState, ProcessIdentity, ProcessInspector, ProcfsInspector, ReapOutcome, ReapStrategy,
    StrategyConfig, StrategyKind,
};
use crate::support::DefaultSigchld;
use serial_test::serial;
use std::thread::sleep;
use std::time::Duration;

fn quick() -> StrategyConfig {
    StrategyConfig::new()
        .with_settle(Duration::from_millis(200))
        .with_grandchild_linger(Duration::from_millis(500))
}

#[test]
#[serial]
fn test_no_reap_leaves_zombie() {
    let inspector = ProcfsInspector::default();
    let report = NoReap::new(quick()).run(&inspector).unwrap();

    assert_eq!(report.strategy, StrategyKind::NoReap);
    assert_eq!(report.parent, ProcessIdentity::current());
    assert_eq!(report.children.len(), 1);

    let child = &report.children[0];
    assert_eq!(child.observed.state, ProcState::Zombie);
    assert!(child.observed.to_string().contains('Z'));
    assert_eq!(child.observed.parent, Some(ProcessIdentity::current()));
    assert!(report.upholds_contract());

    // clean up the zombie the strategy deliberately left behind
    let reaped = wait_for(child.identity).unwrap();
    assert!(reaped.status.success());
}

#[test]
#[serial]
fn test_blocking_wait_reclaims_child() {
    let inspector = ProcfsInspector::default();
    let report = BlockingWait::new(quick().with_exit_code(3))
        .run(&inspector)
        .unwrap();

    let child = &report.children[0];
    assert_eq!(child.reaped, Some(ExitStatus::Exited { code: 3 }));
    assert_eq!(child.observed.state, ProcState::NotFound);
    assert_eq!(report.followup, Some(ReapOutcome::NoChildren));
    assert!(report.upholds_contract());
}

#[test]
#[serial]
fn test_blocking_wait_without_settle_waits_for_running_child() {
    let inspector = ProcfsInspector::default();
    let config = quick()
        .with_settle(Duration::ZERO)
        .with_child_linger(Duration::from_millis(200));
    let report = BlockingWait::new(config).run(&inspector).unwrap();

    assert!(report.children[0].reaped.is_some());
    assert!(report.zombies().is_empty());
}

#[test]
#[serial]
fn test_blocking_wait_keeps_own_child_when_another_is_reaped() {
    let inspector = ProcfsInspector::default();
    let bystander = match spawn().unwrap() {
        Branch::Child { .. } => exit_child(0),
        Branch::Parent { child } => child,
    };
    sleep(Duration::from_millis(100));

    let config = quick()
        .with_settle(Duration::ZERO)
        .with_child_linger(Duration::from_millis(500));
    let report = BlockingWait::new(config).run(&inspector).unwrap();

    assert_eq!(report.children.len(), 2);
    assert_eq!(report.children[0].identity, bystander);
    assert!(report.children[0].reaped.is_some());

    let own = &report.children[1];
    assert_ne!(own.identity, bystander);
    assert_eq!(own.reaped, None);
    assert!(own.observed.state.exists());
    assert!(report.upholds_contract());

    let reaped = wait_for(own.identity).unwrap();
    assert!(reaped.status.success());
}

#[test]
#[serial]
fn test_notify_reclaims_every_child() {
    let inspector = ProcfsInspector::default();
    let report = NotifyReap::new(quick().with_children(5))
        .run(&inspector)
        .unwrap();

    assert_eq!(report.children.len(), 5);
    assert!(report.zombies().is_empty());
    assert!(report
        .children
        .iter()
        .all(|c| c.observed.state == ProcState::NotFound));

    let stats = report.notify.unwrap();
    assert!(stats.reaped >= 5);
    assert!(stats.deliveries >= 1);

    // the strategy leaves the handler armed
    assert!(NotificationReaper::is_armed());
    NotificationReaper::arm().unwrap().disarm().unwrap();
}

#[test]
#[serial]
fn test_disinterest_child_never_zombie() {
    let inspector = ProcfsInspector::default();
    let _restore = DefaultSigchld;
    let report = Disinterest::new(quick()).run(&inspector).unwrap();

    let child = &report.children[0];
    assert_eq!(child.observed.state, ProcState::NotFound);
    assert_eq!(child.reaped, None);
    assert_eq!(report.followup, Some(ReapOutcome::NoChildren));
    assert!(report.upholds_contract());
}

#[test]
#[serial]
fn test_double_fork_orphans_grandchild() {
    let inspector = ProcfsInspector::default();
    let report = DoubleFork::new(quick()).run(&inspector).unwrap();
    let me = ProcessIdentity::current();

    let intermediate: Vec<_> = report.with_role(ChildRole::Intermediate).collect();
    assert_eq!(intermediate.len(), 1);
    let intermediate = intermediate[0];
    assert_eq!(intermediate.reaped, Some(ExitStatus::Exited { code: 0 }));
    assert_eq!(intermediate.observed.state, ProcState::NotFound);

    let grandchild: Vec<_> = report.with_role(ChildRole::Grandchild).collect();
    assert_eq!(grandchild.len(), 1);
    let grandchild = grandchild[0];
    assert_ne!(grandchild.identity, intermediate.identity);
    assert!(grandchild.observed.state.exists());
    assert_ne!(grandchild.observed.parent, Some(me));
    assert_ne!(grandchild.observed.parent, Some(intermediate.identity));

    // the grandchild is not ours to reap
    assert!(wait_for(grandchild.identity).unwrap_err().is_no_children());
}

#[test]
#[serial]
fn test_double_fork_waits_only_on_intermediate() {
    let inspector = ProcfsInspector::default();
    let bystander = match spawn().unwrap() {
        Branch::Child { .. } => exit_child(0),
        Branch::Parent { child } => child,
    };
    sleep(Duration::from_millis(100));

    let report = DoubleFork::new(quick()).run(&inspector).unwrap();
    assert_eq!(report.with_role(ChildRole::Intermediate).count(), 1);

    assert!(inspector.inspect(bystander).unwrap().is_zombie());
    wait_for(bystander).unwrap();
}

#[test]
fn test_strategy_for_matches_kind() {
    for kind in StrategyKind::ALL {
        let strategy = strategy_for(kind, quick());
        assert_eq!(strategy.kind(), kind);
        assert_eq!(strategy.config().settle, Duration::from_millis(200));
    }
    assert!(StrategyKind::NoReap.expects_zombie());
    assert!(!StrategyKind::Detach.expects_zombie());
}
