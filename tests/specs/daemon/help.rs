//! Daemon help and version specs
//!
//! Verify gefsd --help, --version, and related flags work without
//! acquiring the daemon lock (no startup attempt).

use crate::prelude::*;

#[test]
fn gefsd_version_shows_version() {
    let output = gefsd().arg("--version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with("gefsd 0.1.0"),
        "expected version banner, got: {stdout}"
    );
}

#[test]
fn gefsd_short_version_flags_work() {
    for flag in ["-v", "-V"] {
        let output = gefsd().arg(flag).output().unwrap();
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(
            stdout.starts_with("gefsd 0.1.0"),
            "expected version banner for {flag}, got: {stdout}"
        );
    }
}

#[test]
fn gefsd_help_shows_usage() {
    let output = gefsd().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("USAGE:"),
        "expected USAGE section, got: {stdout}"
    );
    assert!(stdout.contains("--help"), "expected --help in output");
    assert!(stdout.contains("--version"), "expected --version in output");
    assert!(
        stdout.contains("GEFSD_FETCH_COMMAND"),
        "expected environment section"
    );
}

#[test]
fn gefsd_rejects_unexpected_arguments() {
    let output = gefsd().arg("--frobnicate").output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("unexpected argument"),
        "expected argument error, got: {stderr}"
    );
}
