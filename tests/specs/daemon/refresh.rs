//! Refresh loop specs
//!
//! Drive one full fetch → publish → prune iteration end-to-end with a
//! scripted stand-in for the external fetch command.

use crate::prelude::*;
use gefsd_core::Cycle;

/// Fetch script that succeeds once (consuming the `allow` flag file) and
/// fails for every later cycle, writing a prefixed artifact on success.
fn fetch_script(state_dir: &std::path::Path) -> String {
    let state = state_dir.display();
    format!(
        r#"#!/bin/sh
# args: year month day hour (unpadded)
cycle=$(printf '%04d%02d%02d%02d' "$1" "$2" "$3" "$4")
if [ -f "{state}/allow" ]; then
    rm -f "{state}/allow"
    mkdir -p "{state}/gefs"
    : > "{state}/gefs/${{cycle}}_data.bin"
    exit 0
fi
exit 1
"#
    )
}

#[test]
fn daemon_fetches_publishes_and_prunes_one_cycle() {
    let mut harness = DaemonHarness::new("");
    let script = fetch_script(harness.state_dir());
    std::fs::write(harness.path("fetch.sh"), script).unwrap();

    let expected = Cycle::containing(chrono::Utc::now()).unwrap().prev();
    let stale = expected.prev();

    // Allow exactly one successful fetch; later cycles keep failing.
    std::fs::write(harness.path("allow"), "").unwrap();
    // Plant a leftover artifact from the cycle about to be superseded.
    std::fs::create_dir_all(harness.path("gefs")).unwrap();
    let stale_artifact = harness
        .path("gefs")
        .join(format!("{}_old.bin", stale.to_compact()));
    std::fs::write(&stale_artifact, b"stale").unwrap();

    harness.spawn();

    let marker = harness.wait_for_file("whichgefs", |s| s.len() == 10);

    // Tolerate a 6-hour boundary crossing between our clock read and the
    // daemon's: the marker must match one of the two candidates.
    let late = Cycle::containing(chrono::Utc::now()).unwrap().prev();
    assert!(
        marker == expected.to_compact() || marker == late.to_compact(),
        "unexpected marker {marker}"
    );

    if marker == expected.to_compact() {
        let artifact = harness
            .path("gefs")
            .join(format!("{}_data.bin", expected.to_compact()));
        harness.wait_until("fetched artifact exists", || artifact.exists());
        harness.wait_until("stale artifact purged", || !stale_artifact.exists());
    }

    // After publishing, the loop immediately starts on the next (failing)
    // cycle, so either the momentary Ready or the refreshing banner is
    // acceptable here.
    let status = harness.wait_for_file("serverstatus", |s| !s.is_empty());
    assert!(
        status == "Ready" || status == "Data refreshing. Sims may be slower than usual.",
        "unexpected service status {status}"
    );

    harness.terminate();
}

#[test]
fn failing_fetch_keeps_the_refreshing_banner_up() {
    // No allow flag: every fetch attempt fails and the daemon stays in
    // the Refreshing state without publishing a marker.
    let mut harness = DaemonHarness::new("");
    let script = fetch_script(harness.state_dir());
    std::fs::write(harness.path("fetch.sh"), script).unwrap();

    harness.spawn();

    harness.wait_for_file("serverstatus", |s| {
        s == "Data refreshing. Sims may be slower than usual."
    });
    assert!(!harness.path("whichgefs").exists());

    harness.terminate();
}
