// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Production fetcher: shells out to the configured fetch command.

use super::{FetchError, Fetcher};
use async_trait::async_trait;
use gefsd_core::Cycle;
use std::process::Stdio;
use tokio::process::Command;

/// Invokes the external fetch command for a cycle.
///
/// The command line is `<program> [args..] <year> <month> <day> <hour>`
/// with unpadded integers appended in that order. Success is the command's
/// exit status. stdout/stderr are inherited so the command's own output
/// lands wherever the daemon's does.
///
/// Deliberately no timeout: a fetch may block for hours while the upstream
/// source catches up, and killing it would only restart the transfer.
#[derive(Debug, Clone)]
pub struct CommandFetcher {
    program: String,
    args: Vec<String>,
}

impl CommandFetcher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Leading arguments inserted before the cycle components.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a whitespace-separated command line, e.g. `"python3 downloader.py"`.
    ///
    /// Returns `None` for a blank line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let program = words.next()?;
        Some(Self::new(program).with_args(words))
    }
}

#[async_trait]
impl Fetcher for CommandFetcher {
    async fn fetch(&self, cycle: Cycle) -> Result<(), FetchError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(cycle.year().to_string())
            .arg(cycle.month().to_string())
            .arg(cycle.day().to_string())
            .arg(cycle.hour().to_string())
            .stdin(Stdio::null());

        let status = cmd
            .status()
            .await
            .map_err(|e| FetchError::SpawnFailed(format!("{}: {}", self.program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(FetchError::CommandFailed(status.to_string()))
        }
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
