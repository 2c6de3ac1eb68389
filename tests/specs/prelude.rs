//! Test helpers for behavioral specifications.
//!
//! Provides an isolated daemon harness: a tempdir state directory, a
//! scripted stand-in for the external fetch command, and polling helpers
//! for the published files.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};

// Spec polling timeouts
pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 10_000;

/// Returns the path to a binary, checking llvm-cov target directory first.
/// This works with both standard builds and llvm-cov coverage runs.
/// Falls back to resolving relative to the test binary itself when
/// CARGO_MANIFEST_DIR is stale (e.g. compiled by a removed worktree
/// into a shared target directory).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    // Check for llvm-cov target directory first
    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    // Standard target directory (works when CARGO_MANIFEST_DIR is correct)
    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    // Fallback: resolve relative to the test binary itself.
    // The test binary lives at target/debug/deps/specs-<hash>, so its
    // grandparent is target/debug/ where gefsd is built.
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

/// Returns the path to the gefsd daemon binary.
pub fn gefsd_binary() -> PathBuf {
    binary_path("gefsd")
}

/// Returns a Command configured to run the gefsd binary
pub fn gefsd() -> Command {
    Command::new(gefsd_binary())
}

/// A daemon under test: isolated state directory plus a scripted fetch
/// command standing in for the external downloader.
pub struct DaemonHarness {
    state_dir: tempfile::TempDir,
    child: Option<Child>,
}

impl DaemonHarness {
    /// Create a harness whose fetch command runs `fetch_script` (a shell
    /// script body; it receives `<year> <month> <day> <hour>` unpadded).
    pub fn new(fetch_script: &str) -> Self {
        let state_dir = tempfile::tempdir().unwrap();
        std::fs::write(state_dir.path().join("fetch.sh"), fetch_script).unwrap();
        Self {
            state_dir,
            child: None,
        }
    }

    pub fn state_dir(&self) -> &Path {
        self.state_dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.state_dir.path().join(name)
    }

    fn fetch_command(&self) -> String {
        format!("sh {}", self.path("fetch.sh").display())
    }

    /// Start the daemon against this harness's state directory.
    pub fn spawn(&mut self) {
        assert!(self.child.is_none(), "daemon already spawned");
        let child = gefsd()
            .env("GEFSD_STATE_DIR", self.state_dir.path())
            .env("GEFSD_FETCH_COMMAND", self.fetch_command())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();
        self.child = Some(child);
    }

    /// Run a second instance to completion and collect its output.
    pub fn run_second_instance(&self) -> Output {
        gefsd()
            .env("GEFSD_STATE_DIR", self.state_dir.path())
            .env("GEFSD_FETCH_COMMAND", self.fetch_command())
            .output()
            .unwrap()
    }

    /// Poll `name` under the state dir until its content satisfies `pred`.
    pub fn wait_for_file(&self, name: &str, pred: impl Fn(&str) -> bool) -> String {
        let deadline = Instant::now() + Duration::from_millis(SPEC_WAIT_MAX_MS);
        loop {
            if let Ok(content) = std::fs::read_to_string(self.path(name)) {
                if pred(&content) {
                    return content;
                }
            }
            assert!(
                Instant::now() < deadline,
                "timed out waiting for {name} in {}",
                self.state_dir.path().display()
            );
            std::thread::sleep(Duration::from_millis(SPEC_POLL_INTERVAL_MS));
        }
    }

    /// Poll until `pred` holds.
    pub fn wait_until(&self, what: &str, pred: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_millis(SPEC_WAIT_MAX_MS);
        while !pred() {
            assert!(Instant::now() < deadline, "timed out waiting until {what}");
            std::thread::sleep(Duration::from_millis(SPEC_POLL_INTERVAL_MS));
        }
    }

    /// SIGTERM the daemon and wait for it to exit (SIGKILL as last resort).
    pub fn terminate(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        let _ = Command::new("kill")
            .args(["-TERM", &child.id().to_string()])
            .status();

        let deadline = Instant::now() + Duration::from_millis(SPEC_WAIT_MAX_MS);
        loop {
            match child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) if Instant::now() < deadline => {
                    std::thread::sleep(Duration::from_millis(SPEC_POLL_INTERVAL_MS));
                }
                _ => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return;
                }
            }
        }
    }
}

impl Drop for DaemonHarness {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
