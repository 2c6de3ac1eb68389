// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fetch adapters for retrieving model cycle data

mod command;

pub use command::CommandFetcher;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeFetcher, FetchCall};

use async_trait::async_trait;
use gefsd_core::Cycle;
use thiserror::Error;

/// Errors from fetch operations
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("failed to launch fetch command: {0}")]
    SpawnFailed(String),
    #[error("fetch command failed: {0}")]
    CommandFailed(String),
}

/// Adapter for retrieving one model cycle's data from the upstream source.
///
/// Contract: a successful fetch populates the storage root with artifacts
/// whose file names carry the cycle's `YYYYMMDDHH` prefix. Failures carry
/// no transient/permanent distinction; callers decide whether to retry.
#[async_trait]
pub trait Fetcher: Clone + Send + Sync + 'static {
    /// Fetch all artifacts for `cycle`. May block for an arbitrary,
    /// unbounded duration.
    async fn fetch(&self, cycle: Cycle) -> Result<(), FetchError>;
}
