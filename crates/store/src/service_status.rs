// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publisher for the human-readable service status.
//!
//! The web front end reads this file to warn users while a refresh is in
//! progress. Write-only from the daemon's perspective.

use crate::{read_line, write_atomic, StoreError};
use gefsd_core::ServiceStatus;
use std::path::PathBuf;

/// The `serverstatus` file.
#[derive(Debug, Clone)]
pub struct ServiceStatusFile {
    path: PathBuf,
}

impl ServiceStatusFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Atomically overwrite the published message.
    pub fn publish(&self, status: ServiceStatus) -> Result<(), StoreError> {
        write_atomic(&self.path, status.message())
    }

    /// Read back the published message. The daemon itself never calls
    /// this; it exists for tests and external tooling.
    pub fn read(&self) -> Result<Option<String>, StoreError> {
        read_line(&self.path)
    }
}

#[cfg(test)]
#[path = "service_status_tests.rs"]
mod tests;
