// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry combinator for operations against unreliable collaborators.
//!
//! The refresh loop never gives up on a cycle; the policy only controls
//! how noisily and how fast it keeps trying. Escalation is a log-level
//! promotion after a run of consecutive failures, so a permanently broken
//! fetch path shows up in the log as errors rather than an endless stream
//! of warnings.

use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

/// Controls attempt count, backoff, and escalation for [`retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Stop and return the last error after this many attempts.
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
    /// Delay after the first failure. Zero disables backoff entirely.
    pub initial_delay: Duration,
    /// Upper bound for the exponentially growing delay.
    pub max_delay: Duration,
    /// Log at error level every N consecutive failures. Zero disables.
    pub escalate_every: u32,
}

impl RetryPolicy {
    /// Unbounded retry with no delay between attempts.
    pub fn immediate() -> Self {
        Self {
            max_attempts: None,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            escalate_every: 0,
        }
    }

    /// Unbounded retry with capped exponential backoff (1s doubling up to
    /// 5min) and escalation every 10 consecutive failures.
    pub fn unbounded_backoff() -> Self {
        Self {
            max_attempts: None,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(300),
            escalate_every: 10,
        }
    }

    /// Delay to wait after the given 1-based failure count.
    pub fn delay_before(&self, failures: u32) -> Duration {
        if self.initial_delay.is_zero() {
            return Duration::ZERO;
        }
        let factor = 1u32
            .checked_shl(failures.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Drive `op` until it succeeds or the policy's attempt limit is reached.
///
/// Failures are logged with `op_name` for attribution; the error itself is
/// only returned to the caller when the policy is bounded and exhausted.
pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, op_name: &str, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut failures: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                failures = failures.saturating_add(1);
                if policy.max_attempts.is_some_and(|max| failures >= max) {
                    error!(op = op_name, attempts = failures, error = %err, "giving up");
                    return Err(err);
                }
                if policy.escalate_every > 0 && failures % policy.escalate_every == 0 {
                    error!(
                        op = op_name,
                        consecutive_failures = failures,
                        error = %err,
                        "operation still failing"
                    );
                } else {
                    warn!(op = op_name, attempt = failures, error = %err, "operation failed, retrying");
                }
                let delay = policy.delay_before(failures);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
