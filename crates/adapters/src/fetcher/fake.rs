// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake fetcher for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{FetchError, Fetcher};
use async_trait::async_trait;
use gefsd_core::Cycle;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Recorded fetch invocation
#[derive(Debug, Clone)]
pub struct FetchCall {
    pub cycle: Cycle,
}

struct FakeFetcherState {
    calls: Vec<FetchCall>,
    /// Scripted outcomes consumed front-to-back; exhausted script means Ok.
    script: VecDeque<Result<(), FetchError>>,
}

/// Fake fetcher with scripted outcomes for testing
#[derive(Clone)]
pub struct FakeFetcher {
    inner: Arc<Mutex<FakeFetcherState>>,
}

impl Default for FakeFetcher {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeFetcherState {
                calls: Vec::new(),
                script: VecDeque::new(),
            })),
        }
    }
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome for the next unscripted fetch call.
    pub fn push_outcome(&self, outcome: Result<(), FetchError>) {
        self.inner.lock().script.push_back(outcome);
    }

    /// Queue `n` failures before fetches start succeeding again.
    pub fn fail_times(&self, n: usize) {
        let mut state = self.inner.lock();
        for _ in 0..n {
            state
                .script
                .push_back(Err(FetchError::CommandFailed("scripted failure".into())));
        }
    }

    /// Get all recorded fetch calls
    pub fn calls(&self) -> Vec<FetchCall> {
        self.inner.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().calls.len()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, cycle: Cycle) -> Result<(), FetchError> {
        let mut state = self.inner.lock();
        state.calls.push(FetchCall { cycle });
        state.script.pop_front().unwrap_or(Ok(()))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
