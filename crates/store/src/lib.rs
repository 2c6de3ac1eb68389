// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Filesystem persistence for the published daemon resources.
//!
//! All three published resources (daemon status, service status, current
//! cycle marker) are single-line text files; every write goes through an
//! atomic write-temp-then-rename so a reader never observes a truncated
//! file.

pub mod cycle_store;
pub mod service_status;
pub mod status_store;

pub use cycle_store::CycleStore;
pub use service_status::ServiceStatusFile;
pub use status_store::{FsStatusStore, StatusStore};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use status_store::MemoryStatusStore;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write `contents` to `path` atomically (write to .tmp, sync, rename).
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&tmp_path)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;

    Ok(())
}

/// Read a single-line text file, trimming trailing whitespace.
///
/// Returns `Ok(None)` when the file does not exist.
pub(crate) fn read_line(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw.trim_end().to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
