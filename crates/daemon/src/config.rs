// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration

use crate::lifecycle::LifecycleError;
use std::path::PathBuf;

/// Default fetch command; override with `GEFSD_FETCH_COMMAND`.
pub const DEFAULT_FETCH_COMMAND: &str = "python3 downloader.py";

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/gefsd)
    pub state_dir: PathBuf,
    /// Path to the advisory lock/PID file
    pub lock_path: PathBuf,
    /// Path to the daemon run-status marker
    pub status_path: PathBuf,
    /// Path to the service-status file read by the web front end
    pub service_status_path: PathBuf,
    /// Path to the current-cycle marker
    pub marker_path: PathBuf,
    /// Storage root for fetched cycle artifacts
    pub storage_root: PathBuf,
    /// Path to the daemon log file
    pub log_path: PathBuf,
    /// External fetch command line (program plus leading arguments)
    pub fetch_command: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// The file names `downloaderstatus`, `serverstatus`, `whichgefs`, and
    /// `gefs/` are the external interface existing readers depend on; only
    /// the directory that contains them is configurable.
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = state_dir()?;
        let fetch_command = std::env::var("GEFSD_FETCH_COMMAND")
            .unwrap_or_else(|_| DEFAULT_FETCH_COMMAND.to_string());
        Ok(Self::for_state_dir(state_dir, fetch_command))
    }

    /// Build a config rooted at an explicit state directory.
    pub fn for_state_dir(state_dir: PathBuf, fetch_command: String) -> Self {
        Self {
            lock_path: state_dir.join("daemon.lock"),
            status_path: state_dir.join("downloaderstatus"),
            service_status_path: state_dir.join("serverstatus"),
            marker_path: state_dir.join("whichgefs"),
            storage_root: state_dir.join("gefs"),
            log_path: state_dir.join("daemon.log"),
            fetch_command,
            state_dir,
        }
    }
}

/// Get the state directory for gefsd
fn state_dir() -> Result<PathBuf, LifecycleError> {
    // GEFSD_STATE_DIR takes priority (used by tests for isolation)
    if let Ok(dir) = std::env::var("GEFSD_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }

    // Fall back to XDG_STATE_HOME/gefsd or ~/.local/state/gefsd
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("gefsd"));
    }

    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/gefsd"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
