// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::fetcher::{FetchError, Fetcher};
use async_trait::async_trait;
use gefsd_core::Cycle;
use tracing::Instrument;

/// Wrapper that adds tracing to any Fetcher
#[derive(Clone)]
pub struct TracedFetcher<F> {
    inner: F,
}

impl<F> TracedFetcher<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<F: Fetcher> Fetcher for TracedFetcher<F> {
    async fn fetch(&self, cycle: Cycle) -> Result<(), FetchError> {
        async {
            tracing::info!("starting");
            let start = std::time::Instant::now();
            let result = self.inner.fetch(cycle).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "fetch complete"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "fetch failed"),
            }
            result
        }
        .instrument(tracing::info_span!("fetch.cycle", cycle = %cycle))
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
