// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: configuration, startup, shutdown

use cg_core::SystemClock;
use cg_engine::Runtime;
use cg_storage::{DocStore, StorageError};
use fs2::FileExt;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::net::UnixListener;
use tokio::time::Instant;

/// Optional config file read from the working directory
pub const CONFIG_FILE: &str = "cg.toml";

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("invalid config file: {0}")]
    Config(#[from] toml::de::Error),
    #[error("another daemon already holds the lock for this data root")]
    AlreadyRunning,
    #[error("could not determine a data directory")]
    NoDataDir,
}

/// File-based configuration (`cg.toml`)
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    data_root: Option<PathBuf>,
}

/// Resolved daemon paths
#[derive(Debug, Clone)]
pub struct Config {
    pub data_root: PathBuf,
    pub socket_path: PathBuf,
    pub log_path: PathBuf,
    pub lock_path: PathBuf,
}

impl Config {
    /// Resolve the data root: explicit argument, then `$CG_DATA_ROOT`, then
    /// `./cg.toml`, then the platform data directory
    pub fn resolve(explicit_root: Option<PathBuf>) -> Result<Self, LifecycleError> {
        let data_root = match explicit_root {
            Some(root) => root,
            None => match std::env::var_os("CG_DATA_ROOT") {
                Some(root) => PathBuf::from(root),
                None => match read_file_config()? {
                    Some(root) => root,
                    None => dirs::data_dir()
                        .ok_or(LifecycleError::NoDataDir)?
                        .join("coursegen"),
                },
            },
        };
        Ok(Self::for_root(data_root))
    }

    /// Configuration for a known data root
    pub fn for_root(data_root: PathBuf) -> Self {
        let socket_path = socket_path_for(&data_root);
        let daemon_dir = data_root.join("daemon");
        Self {
            socket_path,
            log_path: daemon_dir.join("cgd.log"),
            lock_path: daemon_dir.join("cgd.lock"),
            data_root,
        }
    }
}

fn read_file_config() -> Result<Option<PathBuf>, LifecycleError> {
    let path = Path::new(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&contents)?;
    Ok(config.data_root)
}

/// Socket path for a data root, under the runtime dir and keyed by a hash of
/// the root so daemons for different roots never collide
pub fn socket_path_for(data_root: &Path) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(data_root.as_os_str().as_encoded_bytes());
    let digest = hasher.finalize();
    let short: String = digest.iter().take(6).map(|b| format!("{:02x}", b)).collect();

    let runtime_dir = std::env::var_os("XDG_RUNTIME_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    runtime_dir.join(format!("cgd-{}.sock", short))
}

/// A running daemon: runtime, listener, and instance lock
pub struct Daemon {
    pub config: Config,
    pub runtime: Runtime<SystemClock>,
    pub listener: UnixListener,
    pub start_time: Instant,
    pub shutdown_requested: bool,
    // Held for the daemon's lifetime; dropping releases the flock
    _lock: File,
}

impl std::fmt::Debug for Daemon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Daemon")
            .field("config", &self.config)
            .field("start_time", &self.start_time)
            .field("shutdown_requested", &self.shutdown_requested)
            .finish_non_exhaustive()
    }
}

/// Open the store, acquire the instance lock, and bind the socket
pub async fn startup(config: Config) -> Result<Daemon, LifecycleError> {
    let store = DocStore::open(config.data_root.clone())?;
    startup_with_runtime(config, Runtime::new(store)).await
}

/// Startup with a caller-built runtime (tests inject registries and delays)
pub async fn startup_with_runtime(
    config: Config,
    runtime: Runtime<SystemClock>,
) -> Result<Daemon, LifecycleError> {
    if let Some(parent) = config.lock_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let lock = OpenOptions::new()
        .create(true)
        .write(true)
        .open(&config.lock_path)?;
    lock.try_lock_exclusive()
        .map_err(|_| LifecycleError::AlreadyRunning)?;

    // A leftover socket can only be stale: the lock proves no daemon owns it
    if config.socket_path.exists() {
        fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)?;

    Ok(Daemon {
        config,
        runtime,
        listener,
        start_time: Instant::now(),
        shutdown_requested: false,
        _lock: lock,
    })
}

impl Daemon {
    /// Remove the socket so clients stop connecting
    pub fn shutdown(&mut self) -> Result<(), LifecycleError> {
        if self.config.socket_path.exists() {
            fs::remove_file(&self.config.socket_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
