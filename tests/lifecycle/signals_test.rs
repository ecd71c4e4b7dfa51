/*!
 * SIGCHLD Tests
 * Disinterest declarations and the notification reaper
 */

use pretty_assertions::assert_eq;
use proc_lifecycle::process::{exit_child, try_reap};
use proc_lifecycle::signals::is_disinterested;
use proc_lifecycle::{
    declare_disinterest, restore_default, spawn, Branch, LifecycleError, NotificationReaper,
    ProcessIdentity, ProcessInspector, ProcfsInspector, ReapOutcome,
};
use crate::support::DefaultSigchld;
use serial_test::serial;
use std::thread::sleep;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

fn child_exiting(linger: Duration) -> ProcessIdentity {
    match spawn().unwrap() {
        Branch::Child { .. } => {
            if !linger.is_zero() {
                sleep(linger);
            }
            exit_child(0)
        }
        Branch::Parent { child } => child,
    }
}

#[test]
#[serial]
fn test_disinterest_round_trip() {
    restore_default().unwrap();
    let _restore = DefaultSigchld;
    assert!(!is_disinterested().unwrap());

    declare_disinterest().unwrap();
    assert!(is_disinterested().unwrap());

    restore_default().unwrap();
    assert!(!is_disinterested().unwrap());
}

#[test]
#[serial]
fn test_disinterest_never_shows_a_zombie() {
    let inspector = ProcfsInspector::default();
    let _restore = DefaultSigchld;
    declare_disinterest().unwrap();

    let child = child_exiting(Duration::from_millis(50));
    for _ in 0..40 {
        let report = inspector.inspect(child).unwrap();
        assert!(!report.is_zombie(), "child {} observed as zombie", child);
        sleep(Duration::from_millis(10));
    }
    assert_eq!(try_reap(None).unwrap(), ReapOutcome::NoChildren);
}

#[test]
#[serial]
fn test_notification_reaper_collects_coalesced_exits() {
    let reaper = NotificationReaper::arm().unwrap();
    let baseline = reaper.stats().reaped;

    let mut spawned: Vec<ProcessIdentity> =
        (0..8).map(|_| child_exiting(Duration::ZERO)).collect();
    let mut reaped = reaper.wait_for_reaped(baseline + 8, TIMEOUT).unwrap();

    let stats = reaper.disarm().unwrap();
    assert!(stats.deliveries >= 1);
    assert_eq!(stats.dropped, 0);

    spawned.sort();
    reaped.sort();
    assert_eq!(reaped, spawned);
    assert!(!NotificationReaper::is_armed());
}

#[test]
#[serial]
fn test_arming_late_still_reaps_existing_zombie() {
    let inspector = ProcfsInspector::default();
    let child = child_exiting(Duration::ZERO);
    sleep(Duration::from_millis(200));
    assert!(inspector.inspect(child).unwrap().is_zombie());

    let reaper = NotificationReaper::arm().unwrap();
    assert!(reaper.reaped().contains(&child));
    assert!(!inspector.inspect(child).unwrap().state.exists());

    reaper.disarm().unwrap();
}

#[test]
#[serial]
fn test_wait_for_reaped_times_out() {
    let reaper = NotificationReaper::arm().unwrap();
    let baseline = reaper.stats().reaped;

    let child = child_exiting(Duration::from_millis(500));
    let err = reaper
        .wait_for_reaped(baseline + 1, Duration::from_millis(50))
        .unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::NotifyTimeout { expected, .. } if expected == baseline + 1
    ));

    // the handler still picks the child up once it exits
    let reaped = reaper.wait_for_reaped(baseline + 1, TIMEOUT).unwrap();
    assert!(reaped.contains(&child));
    reaper.disarm().unwrap();
}
