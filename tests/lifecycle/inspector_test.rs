/*!
 * Inspector Tests
 * procfs parsing against fake and live process tables
 */

use pretty_assertions::assert_eq;
use proc_lifecycle::{ProcState, ProcessIdentity, ProcessInspector, ProcfsInspector};
use std::fs;
use tempfile::TempDir;

fn fake_proc(entries: &[(i32, &str)]) -> TempDir {
    let root = tempfile::tempdir().unwrap();
    for (pid, status) in entries {
        let dir = root.path().join(pid.to_string());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("status"), status).unwrap();
    }
    root
}

#[test]
fn test_fake_zombie_entry() {
    let root = fake_proc(&[(
        300,
        "Name:\tzombie\nState:\tZ (zombie)\nTgid:\t300\nPid:\t300\nPPid:\t299\n",
    )]);
    let inspector = ProcfsInspector::new(root.path());

    let report = inspector.inspect(ProcessIdentity::from_raw(300)).unwrap();
    assert_eq!(report.state, ProcState::Zombie);
    assert_eq!(report.parent, Some(ProcessIdentity::from_raw(299)));
    assert_eq!(report.to_string(), "State:\tZ (zombie)");
}

#[test]
fn test_missing_entry_is_not_found() {
    let root = fake_proc(&[]);
    let inspector = ProcfsInspector::new(root.path());

    let report = inspector.inspect(ProcessIdentity::from_raw(301)).unwrap();
    assert_eq!(report.state, ProcState::NotFound);
    assert_eq!(report.parent, None);
    assert_eq!(report.to_string(), "no such process");
}

#[test]
fn test_unreadable_entry_is_an_error() {
    let root = tempfile::tempdir().unwrap();
    // a directory where the status file should be
    fs::create_dir_all(root.path().join("302").join("status")).unwrap();
    let inspector = ProcfsInspector::new(root.path());

    assert!(inspector.inspect(ProcessIdentity::from_raw(302)).is_err());
}

#[test]
fn test_live_parent_is_visible() {
    let inspector = ProcfsInspector::default();
    if !inspector.root().exists() {
        return;
    }

    let report = inspector.inspect(ProcessIdentity::parent()).unwrap();
    assert!(report.state.exists());
    assert!(!report.is_zombie());
}
