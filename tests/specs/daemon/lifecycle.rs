//! Daemon lifecycle specs
//!
//! Single-instance exclusion, crash recovery via the advisory lock, and
//! clean shutdown on SIGTERM.

use crate::prelude::*;

/// A fetch script that never completes: keeps the daemon parked in the
/// Refreshing state so lifecycle behavior can be observed.
const BLOCKING_FETCH: &str = "#!/bin/sh\nsleep 60\nexit 1\n";

#[test]
fn second_instance_is_rejected_and_state_untouched() {
    let mut harness = DaemonHarness::new(BLOCKING_FETCH);
    harness.spawn();

    harness.wait_for_file("downloaderstatus", |s| s == "Running");
    let pid_before = harness.wait_for_file("daemon.lock", |s| !s.trim().is_empty());

    let output = harness.run_second_instance();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("gefsd is already running"),
        "expected already-running message, got: {stderr}"
    );
    assert!(stderr.contains("pid:"), "expected pid hint, got: {stderr}");

    // The loser leaves the winner's state alone.
    assert_eq!(
        std::fs::read_to_string(harness.path("downloaderstatus")).unwrap(),
        "Running"
    );
    assert_eq!(
        std::fs::read_to_string(harness.path("daemon.lock")).unwrap(),
        pid_before
    );

    harness.terminate();
}

#[test]
fn stale_running_marker_does_not_block_restart() {
    let mut harness = DaemonHarness::new(BLOCKING_FETCH);

    // Simulate a crashed instance: marker left at Running, lock free.
    std::fs::write(harness.path("downloaderstatus"), "Running").unwrap();

    harness.spawn();

    // The daemon takes over: lock file appears with its PID.
    harness.wait_for_file("daemon.lock", |s| !s.trim().is_empty());
    harness.wait_for_file("downloaderstatus", |s| s == "Running");

    harness.terminate();
}

#[test]
fn sigterm_resets_status_and_releases_the_lock() {
    let mut harness = DaemonHarness::new(BLOCKING_FETCH);
    harness.spawn();
    harness.wait_for_file("downloaderstatus", |s| s == "Running");

    harness.terminate();

    harness.wait_for_file("downloaderstatus", |s| s == "Idle");
    harness.wait_until("lock file is removed", || !harness.path("daemon.lock").exists());
}
