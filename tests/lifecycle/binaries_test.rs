/*!
 * Executable Output Tests
 * Console lines printed by the strategy binaries
 */

use serial_test::serial;
use std::process::Command;

fn run(exe: &str) -> String {
    let output = Command::new(exe)
        .env("RUST_LOG", "error")
        .output()
        .unwrap();
    assert!(output.status.success(), "{} exited with {}", exe, output.status);
    String::from_utf8(output.stdout).unwrap()
}

fn state_lines(stdout: &str) -> Vec<&str> {
    stdout
        .lines()
        .filter(|line| line.starts_with("state of child "))
        .collect()
}

#[test]
#[serial]
fn test_reap_ignore_prints_child_state() {
    let stdout = run(env!("CARGO_BIN_EXE_reap-ignore"));

    let states = state_lines(&stdout);
    assert_eq!(states.len(), 1, "stdout: {}", stdout);
    assert!(states[0].ends_with(": no such process"), "stdout: {}", stdout);
}

#[test]
#[serial]
fn test_reap_notify_prints_state_of_every_child() {
    let stdout = run(env!("CARGO_BIN_EXE_reap-notify"));

    let received = stdout
        .lines()
        .filter(|line| line.starts_with("received SIGCHLD from child process pid = "))
        .count();
    let states = state_lines(&stdout);
    assert_eq!(received, 3, "stdout: {}", stdout);
    assert_eq!(states.len(), 3, "stdout: {}", stdout);
    assert!(states.iter().all(|line| line.ends_with(": no such process")));
}
