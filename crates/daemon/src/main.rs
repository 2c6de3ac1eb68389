// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GEFS Refresh Daemon (gefsd)
//!
//! Background process that keeps 6-hourly model data fresh: fetch each
//! cycle via the external fetch command, publish its identifier for
//! downstream readers, prune the superseded cycle's files.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod lifecycle;
mod refresh;

use std::sync::Arc;

use gefsd_adapters::{CommandFetcher, TracedFetcher};
use gefsd_core::{RetryPolicy, SystemClock};
use gefsd_store::{CycleStore, FsStatusStore, ServiceStatusFile};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tracing::{error, info};

use crate::config::Config;
use crate::lifecycle::LifecycleError;
use crate::refresh::RefreshLoop;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle info flags before any config/lock acquisition
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("gefsd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("gefsd {}", env!("CARGO_PKG_VERSION"));
                println!("GEFS Refresh Daemon - fetches each 6-hour model cycle and publishes it");
                println!();
                println!("USAGE:");
                println!("    gefsd");
                println!();
                println!("Runs until killed. Publishes the current cycle identifier to the");
                println!("`whichgefs` marker and a human-readable service status to");
                println!("`serverstatus` under the state directory.");
                println!();
                println!("ENVIRONMENT:");
                println!("    GEFSD_STATE_DIR        State directory (default ~/.local/state/gefsd)");
                println!("    GEFSD_FETCH_COMMAND    Fetch command (default \"{}\")", config::DEFAULT_FETCH_COMMAND);
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: gefsd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    // Load configuration
    let config = Config::load()?;

    // Validate the fetch command before taking the lock
    let Some(fetcher) = CommandFetcher::from_command_line(&config.fetch_command) else {
        eprintln!("error: invalid fetch command {:?}", config.fetch_command);
        std::process::exit(1);
    };

    // Set up logging
    let log_guard = setup_logging(&config)?;

    info!("Starting gefsd");

    // Acquire the single-instance guard
    let status = FsStatusStore::new(config.status_path.clone());
    let guard = match lifecycle::acquire(&config, &status) {
        Ok(guard) => guard,
        Err(LifecycleError::LockFailed(_)) => {
            // Another daemon holds the lock; print a human-readable message
            // instead of a raw debug error.
            let pid = std::fs::read_to_string(&config.lock_path)
                .unwrap_or_default()
                .trim()
                .to_string();
            eprintln!("gefsd is already running");
            if !pid.is_empty() {
                eprintln!("  pid: {pid}");
            }
            std::process::exit(1);
        }
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    let store = CycleStore::new(config.storage_root.clone(), config.marker_path.clone());
    if let Err(e) = store.ensure_root() {
        error!("Failed to create storage root: {}", e);
        lifecycle::release(guard, &config, &status);
        drop(log_guard);
        return Err(e.into());
    }

    let mut refresh = RefreshLoop::new(
        TracedFetcher::new(fetcher),
        SystemClock,
        ServiceStatusFile::new(config.service_status_path.clone()),
        store,
        RetryPolicy::unbounded_backoff(),
    );

    // Graceful shutdown on SIGTERM/SIGINT
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let shutdown = Arc::new(Notify::new());
    {
        let shutdown = Arc::clone(&shutdown);
        tokio::spawn(async move {
            tokio::select! {
                _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                _ = sigint.recv() => info!("Received SIGINT, shutting down..."),
            }
            shutdown.notify_one();
        });
    }

    info!(
        "Daemon ready, state dir {}",
        config.state_dir.display()
    );

    // Signal ready for parent process (e.g. systemd, tests waiting for startup)
    println!("READY");

    refresh.run(&shutdown).await;

    lifecycle::release(guard, &config, &status);
    info!("Daemon stopped");
    Ok(())
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Create log directory if needed
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Set up file appender
    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().ok_or(LifecycleError::NoStateDir)?,
        config
            .log_path
            .file_name()
            .ok_or(LifecycleError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Set up subscriber with env filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
