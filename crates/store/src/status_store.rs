// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence for the daemon's own run status.

use crate::{read_line, write_atomic, StoreError};
use gefsd_core::DaemonStatus;
use std::path::PathBuf;
use tracing::warn;

/// Store for the persisted daemon status, injected into the lifecycle so
/// tests can substitute an in-memory double.
pub trait StatusStore: Send + Sync {
    /// Read the persisted status. `Ok(None)` when nothing has been written
    /// yet. Unrecognized content is treated as absent after a warning: the
    /// advisory lock, not this marker, decides instance exclusion.
    fn read(&self) -> Result<Option<DaemonStatus>, StoreError>;

    /// Persist `status`, replacing any previous value.
    fn write(&self, status: DaemonStatus) -> Result<(), StoreError>;
}

/// Filesystem status store backed by the `downloaderstatus` file.
#[derive(Debug, Clone)]
pub struct FsStatusStore {
    path: PathBuf,
}

impl FsStatusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StatusStore for FsStatusStore {
    fn read(&self) -> Result<Option<DaemonStatus>, StoreError> {
        let Some(line) = read_line(&self.path)? else {
            return Ok(None);
        };
        match DaemonStatus::parse(&line) {
            Ok(status) => Ok(Some(status)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unrecognized status file content");
                Ok(None)
            }
        }
    }

    fn write(&self, status: DaemonStatus) -> Result<(), StoreError> {
        write_atomic(&self.path, status.as_str())
    }
}

/// In-memory status store for testing
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, Default)]
pub struct MemoryStatusStore {
    inner: std::sync::Arc<parking_lot::Mutex<Option<DaemonStatus>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl MemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a pre-existing status.
    pub fn with_status(status: DaemonStatus) -> Self {
        let store = Self::default();
        *store.inner.lock() = Some(status);
        store
    }
}

#[cfg(any(test, feature = "test-support"))]
impl StatusStore for MemoryStatusStore {
    fn read(&self) -> Result<Option<DaemonStatus>, StoreError> {
        Ok(*self.inner.lock())
    }

    fn write(&self, status: DaemonStatus) -> Result<(), StoreError> {
        *self.inner.lock() = Some(status);
        Ok(())
    }
}

#[cfg(test)]
#[path = "status_store_tests.rs"]
mod tests;
