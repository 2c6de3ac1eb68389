// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: startup guard, shutdown cleanup.
//!
//! Instance exclusion is decided by an exclusive advisory lock on the lock
//! file, not by the status marker. The marker exists for external readers
//! (and as the original interface) and is only a mirror: a `Running`
//! marker with no live lock holder is a leftover from a crash and is taken
//! over silently except for a warning, so restart after a crash needs no
//! manual intervention.

use crate::config::Config;
use fs2::FileExt;
use gefsd_core::DaemonStatus;
use gefsd_store::{StatusStore, StoreError};
use std::fs::File;
use thiserror::Error;
use tracing::{info, warn};

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Live single-instance guard.
#[derive(Debug)]
pub struct InstanceGuard {
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
}

/// Acquire the single-instance guard for this state directory.
///
/// On `LockFailed` the caller must exit without altering any persisted
/// state - the lock file, marker, and published resources belong to the
/// running daemon.
pub fn acquire(
    config: &Config,
    status: &impl StatusStore,
) -> Result<InstanceGuard, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;

    // Acquire lock file FIRST - prevents races.
    // OpenOptions avoids truncating the file before the lock is held,
    // which would wipe the running daemon's PID.
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    // Write PID to the lock file (truncate now that the lock is held)
    use std::io::Write;
    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file; // Drop mutability

    if status.read()? == Some(DaemonStatus::Running) {
        warn!("stale Running marker with no live lock holder, taking over");
    }
    status.write(DaemonStatus::Running)?;

    info!(pid = std::process::id(), "single-instance guard acquired");

    Ok(InstanceGuard { lock_file })
}

/// Reset persisted state on deliberate shutdown.
///
/// Crash paths never get here; the next startup recovers through the
/// advisory lock instead.
pub fn release(guard: InstanceGuard, config: &Config, status: &impl StatusStore) {
    if let Err(e) = status.write(DaemonStatus::Idle) {
        warn!(error = %e, "failed to reset status marker on shutdown");
    }
    if config.lock_path.exists() {
        if let Err(e) = std::fs::remove_file(&config.lock_path) {
            warn!(error = %e, "failed to remove lock file");
        }
    }
    // Lock itself is released when the guard's file handle drops
    drop(guard);
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
