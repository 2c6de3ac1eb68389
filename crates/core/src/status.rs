// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted status values.
//!
//! Two independent single-line resources are published for external
//! readers: the daemon's own run status (consumed only by the startup
//! check) and the free-text service status shown to users by the web
//! front end. The exact service-status strings are part of the external
//! interface and must not change.

use std::fmt;
use thiserror::Error;

/// Unrecognized daemon-status file content
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized daemon status: {0:?}")]
pub struct StatusParseError(pub String);

/// The daemon's persisted run status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonStatus {
    Idle,
    Running,
}

impl DaemonStatus {
    /// The single-line form written to the status file.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Running => "Running",
        }
    }

    /// Parse the status file body (already trimmed).
    pub fn parse(s: &str) -> Result<Self, StatusParseError> {
        match s {
            "Idle" => Ok(Self::Idle),
            "Running" => Ok(Self::Running),
            other => Err(StatusParseError(other.to_string())),
        }
    }
}

impl fmt::Display for DaemonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service health shown to external consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    /// A cycle fetch is in progress.
    Refreshing,
    /// The published cycle is current.
    Ready,
}

impl ServiceStatus {
    /// The exact message written to the service-status file.
    pub fn message(self) -> &'static str {
        match self {
            Self::Refreshing => "Data refreshing. Sims may be slower than usual.",
            Self::Ready => "Ready",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
