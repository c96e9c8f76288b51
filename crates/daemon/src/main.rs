// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coursegen Daemon (cgd)
//!
//! Background process that owns the pipeline runtime and dispatches runs.

use std::path::PathBuf;

use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use cg_daemon::lifecycle::{self, Config, LifecycleError};
use cg_daemon::server;

/// Startup marker prefix written to the log before anything else.
/// The CLI uses this to find where the current startup attempt begins.
pub const STARTUP_MARKER_PREFIX: &str = "--- cgd: starting (pid: ";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let explicit_root = args.get(1).map(PathBuf::from);

    let config = Config::resolve(explicit_root)?;

    // Write startup marker before tracing setup, so the CLI can find it
    write_startup_marker(&config)?;
    let _log_guard = setup_logging(&config)?;

    info!("starting cgd with data root: {}", config.data_root.display());

    let mut daemon = match lifecycle::startup(config.clone()).await {
        Ok(daemon) => daemon,
        Err(e) => {
            // Write the error synchronously (tracing is non-blocking and may
            // not flush before exit)
            write_startup_error(&config, &e);
            error!("failed to start daemon: {}", e);
            return Err(e.into());
        }
    };

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!(
        "daemon ready, listening on {}",
        daemon.config.socket_path.display()
    );

    // Signal ready for a parent process waiting on startup
    println!("READY");

    loop {
        tokio::select! {
            result = daemon.listener.accept() => {
                match result {
                    Ok((stream, _)) => {
                        if let Err(e) = server::handle_connection(&mut daemon, stream).await {
                            error!("error handling connection: {}", e);
                        }
                    }
                    Err(e) => {
                        error!("error accepting connection: {}", e);
                    }
                }
            }

            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down...");
                break;
            }

            _ = sigint.recv() => {
                info!("received SIGINT, shutting down...");
                break;
            }
        }

        if daemon.shutdown_requested {
            info!("shutdown requested via IPC, shutting down...");
            break;
        }
    }

    daemon.shutdown()?;
    info!("daemon stopped");
    Ok(())
}

/// Append the startup marker to the log file
fn write_startup_marker(config: &Config) -> Result<(), LifecycleError> {
    use std::io::Write;

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    writeln!(file, "{}{})", STARTUP_MARKER_PREFIX, std::process::id())?;
    Ok(())
}

/// Write a startup error synchronously so it is visible to the CLI even if
/// the process exits immediately
fn write_startup_error(config: &Config, error: &LifecycleError) {
    use std::io::Write;

    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
    else {
        return;
    };
    let _ = writeln!(file, "ERROR failed to start daemon: {}", error);
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = config.log_path.parent().ok_or(LifecycleError::NoDataDir)?;
    let name = config
        .log_path
        .file_name()
        .ok_or(LifecycleError::NoDataDir)?;
    let file_appender = tracing_appender::rolling::never(dir, name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
