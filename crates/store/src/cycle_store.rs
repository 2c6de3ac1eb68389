// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk store of fetched cycle artifact sets.
//!
//! The store owns two things: the `whichgefs` marker naming the currently
//! published cycle, and the deletion of superseded artifact sets under the
//! storage root. Artifacts themselves are created by the external fetch
//! command; the only naming contract is the `YYYYMMDDHH` prefix.

use crate::{read_line, write_atomic, StoreError};
use gefsd_core::Cycle;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Manages the storage root and the current-cycle marker.
#[derive(Debug, Clone)]
pub struct CycleStore {
    root: PathBuf,
    marker_path: PathBuf,
}

impl CycleStore {
    pub fn new(root: impl Into<PathBuf>, marker_path: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            marker_path: marker_path.into(),
        }
    }

    /// Create the storage root if it does not exist yet.
    pub fn ensure_root(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Atomically overwrite the current-cycle marker with `cycle`.
    pub fn publish_current(&self, cycle: Cycle) -> Result<(), StoreError> {
        write_atomic(&self.marker_path, &cycle.to_compact())
    }

    /// The currently published cycle, if a valid marker exists.
    pub fn current(&self) -> Result<Option<Cycle>, StoreError> {
        let Some(line) = read_line(&self.marker_path)? else {
            return Ok(None);
        };
        match Cycle::parse(&line) {
            Ok(cycle) => Ok(Some(cycle)),
            Err(e) => {
                warn!(marker = %self.marker_path.display(), error = %e, "ignoring unparseable cycle marker");
                Ok(None)
            }
        }
    }

    /// Delete every artifact under the storage root belonging to `cycle`.
    ///
    /// Zero matches and a missing root are no-ops. Individual removal
    /// failures are logged and skipped: losing old data must never block
    /// publishing new data.
    pub fn purge(&self, cycle: Cycle) -> Result<(), StoreError> {
        let prefix = cycle.to_compact();

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0usize;
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(root = %self.root.display(), error = %e, "unreadable storage entry, skipping");
                    continue;
                }
            };
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !name.starts_with(prefix.as_str()) {
                continue;
            }

            let path = entry.path();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let result = if is_dir {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            match result {
                Ok(()) => removed += 1,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to remove superseded artifact");
                }
            }
        }

        if removed > 0 {
            debug!(cycle = %prefix, removed, "purged superseded cycle artifacts");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "cycle_store_tests.rs"]
mod tests;
