// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client for CLI commands

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use cg_daemon::lifecycle::Config;
use cg_daemon::protocol::{self, ProtocolError, Request, Response};
use thiserror::Error;
use tokio::net::UnixStream;

// Timeout configuration (env vars in milliseconds)
fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for a single request/response exchange
pub fn timeout_ipc() -> Duration {
    parse_duration_ms("CG_TIMEOUT_IPC_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for waiting for the daemon to start
pub fn timeout_connect() -> Duration {
    parse_duration_ms("CG_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(5))
}

/// Polling interval for connection retries
pub fn poll_interval() -> Duration {
    parse_duration_ms("CG_POLL_INTERVAL_MS").unwrap_or(Duration::from_millis(50))
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("daemon not running")]
    DaemonNotRunning,

    #[error("failed to start daemon: {0}")]
    DaemonStartFailed(String),

    #[error("connection timeout waiting for daemon to start")]
    DaemonStartTimeout,

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("daemon error: {0}")]
    Daemon(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Daemon client
pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// Connect to the daemon, auto-starting `cgd` if it is not running
    pub async fn connect_or_start(config: &Config) -> Result<Self, ClientError> {
        match Self::connect(config) {
            Ok(client) => Ok(client),
            Err(ClientError::DaemonNotRunning) => {
                start_daemon_background(config)?;
                Self::connect_with_retry(config, timeout_connect()).await
            }
            Err(e) => Err(e),
        }
    }

    /// Connect to an existing daemon (no auto-start)
    pub fn connect(config: &Config) -> Result<Self, ClientError> {
        if !config.socket_path.exists() {
            return Err(ClientError::DaemonNotRunning);
        }
        Ok(Self {
            socket_path: config.socket_path.clone(),
        })
    }

    async fn connect_with_retry(config: &Config, timeout: Duration) -> Result<Self, ClientError> {
        let deadline = Instant::now() + timeout;
        loop {
            if config.socket_path.exists() {
                return Ok(Self {
                    socket_path: config.socket_path.clone(),
                });
            }
            if Instant::now() >= deadline {
                return Err(ClientError::DaemonStartTimeout);
            }
            tokio::time::sleep(poll_interval()).await;
        }
    }

    /// Send one request and read the response.
    ///
    /// A `Response::Error` from the daemon is surfaced as `ClientError`.
    pub async fn request(&self, request: &Request) -> Result<Response, ClientError> {
        tracing::debug!(?request, "sending request");

        let mut stream = UnixStream::connect(&self.socket_path).await?;
        let bytes = protocol::encode(request)?;

        let exchange = async {
            protocol::write_message(&mut stream, &bytes).await?;
            protocol::read_message(&mut stream).await
        };
        let raw = match tokio::time::timeout(timeout_ipc(), exchange).await {
            Ok(result) => result?,
            Err(_) => return Err(ClientError::Protocol(ProtocolError::Timeout)),
        };

        let response: Response = protocol::decode(&raw)?;
        if let Response::Error { message } = response {
            return Err(ClientError::Daemon(message));
        }
        Ok(response)
    }
}

/// Resolve the `cgd` binary: next to the current executable, else on PATH
pub fn cgd_binary() -> PathBuf {
    let sibling = std::env::current_exe()
        .ok()
        .map(|exe| exe.with_file_name("cgd"));
    match sibling {
        Some(path) if path.exists() => path,
        _ => PathBuf::from("cgd"),
    }
}

/// Spawn `cgd` detached, pointing at the same data root
fn start_daemon_background(config: &Config) -> Result<(), ClientError> {
    Command::new(cgd_binary())
        .arg(&config.data_root)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ClientError::DaemonStartFailed(e.to_string()))?;
    Ok(())
}
