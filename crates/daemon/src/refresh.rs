// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The refresh loop state machine.
//!
//! One strictly sequential flow: Starting, then Refreshing → Publishing →
//! Pruning forever, advancing one 6-hour cycle per iteration. There is no
//! terminal state under normal operation; the process runs until killed.
//! Duplicate-daemon exclusion is handled by the startup lifecycle, not
//! here.

use gefsd_adapters::{FetchError, Fetcher};
use gefsd_core::{retry, Clock, Cycle, CycleError, RetryPolicy, ServiceStatus};
use gefsd_store::{CycleStore, ServiceStatusFile, StoreError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Notify;
use tracing::{error, info, warn};

/// Delay before re-entering an iteration that failed to publish.
const ITERATION_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Errors from a single refresh iteration
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("cycle arithmetic error: {0}")]
    Cycle(#[from] CycleError),

    #[error("fetch failed permanently: {0}")]
    Fetch(#[from] FetchError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Drives fetch → publish → prune, one cycle at a time.
pub struct RefreshLoop<F, C> {
    fetcher: F,
    clock: C,
    service_status: ServiceStatusFile,
    store: CycleStore,
    policy: RetryPolicy,
    /// Cycle the next iteration will fetch; chosen on first use.
    cycle: Option<Cycle>,
}

impl<F: Fetcher, C: Clock> RefreshLoop<F, C> {
    pub fn new(
        fetcher: F,
        clock: C,
        service_status: ServiceStatusFile,
        store: CycleStore,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            fetcher,
            clock,
            service_status,
            store,
            policy,
            cycle: None,
        }
    }

    /// The cycle the next iteration will fetch.
    ///
    /// Starts one cycle behind "now": the upstream source needs time to
    /// finish publishing the files for the most recent boundary.
    pub fn target_cycle(&mut self) -> Result<Cycle, RefreshError> {
        if let Some(cycle) = self.cycle {
            return Ok(cycle);
        }
        let cycle = Cycle::containing(self.clock.now_utc())?.prev();
        self.cycle = Some(cycle);
        Ok(cycle)
    }

    /// One full iteration: refresh, publish, prune, advance.
    pub async fn run_once(&mut self) -> Result<(), RefreshError> {
        let cycle = self.target_cycle()?;

        // Refreshing: warn readers before the fetch starts. A failed
        // status write is not worth blocking the fetch over.
        if let Err(e) = self.service_status.publish(ServiceStatus::Refreshing) {
            warn!(error = %e, "failed to publish refreshing status");
        }
        info!(cycle = %cycle, "refreshing");
        retry(self.policy, "fetch", || self.fetcher.fetch(cycle)).await?;

        // Publishing: marker first, then flip the service status. The
        // marker is the one write that must not be lost.
        self.store.publish_current(cycle)?;
        if let Err(e) = self.service_status.publish(ServiceStatus::Ready) {
            warn!(error = %e, "failed to publish ready status");
        }
        info!(cycle = %cycle, "published");

        // Pruning: only the cycle superseded by this publish. On the very
        // first iteration that cycle was never fetched; purge is a no-op
        // then. Never fatal.
        let superseded = cycle.prev();
        if let Err(e) = self.store.purge(superseded) {
            warn!(cycle = %superseded, error = %e, "failed to purge superseded cycle");
        }

        self.cycle = Some(cycle.next());
        Ok(())
    }

    /// Drive iterations until `shutdown` fires.
    ///
    /// A failed iteration (bounded fetch policy exhausted, marker write
    /// error) is logged and re-entered after a delay without advancing, so
    /// a fetched cycle is never skipped. The fetch command must tolerate
    /// being re-run for the same cycle.
    pub async fn run(&mut self, shutdown: &Notify) {
        loop {
            tokio::select! {
                result = self.run_once() => {
                    if let Err(e) = result {
                        error!(error = %e, "refresh iteration failed");
                        tokio::select! {
                            _ = tokio::time::sleep(ITERATION_RETRY_DELAY) => {}
                            _ = shutdown.notified() => {
                                info!("refresh loop stopping");
                                return;
                            }
                        }
                    }
                }
                _ = shutdown.notified() => {
                    info!("refresh loop stopping");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "refresh_tests.rs"]
mod tests;
