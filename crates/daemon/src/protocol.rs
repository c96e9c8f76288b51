// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol between the CLI and the daemon
//!
//! Messages are JSON documents framed with a u32 big-endian length prefix.
//! One request and one response per connection.

use cg_core::{GenerationConfig, ProjectId, ProjectMeta, State};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Protocol version exchanged in Hello
pub const PROTOCOL_VERSION: &str = "1";

/// Timeout applied to a single request read or response write
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on a single framed message
pub const MAX_MESSAGE_BYTES: u64 = 8 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("request timed out")]
    Timeout,
    #[error("connection closed")]
    ConnectionClosed,
    #[error("message too large: {0} bytes")]
    MessageTooLarge(u64),
}

/// Requests the CLI can send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Request {
    Ping,
    Hello {
        version: String,
    },
    /// Launch a generation run; accepted immediately, never blocks on stages
    Start {
        project_id: ProjectId,
        config: GenerationConfig,
    },
    /// Poll a project's run state
    JobStatus {
        project_id: ProjectId,
    },
    /// Copy a local file into the project's uploads directory
    Upload {
        project_id: ProjectId,
        source: PathBuf,
    },
    /// List all registered projects
    Projects,
    GetProject {
        project_id: ProjectId,
    },
    /// Create or update project metadata
    UpdateProject {
        project_id: ProjectId,
        name: Option<String>,
        status: Option<String>,
        description: Option<String>,
    },
    DeleteProject {
        project_id: ProjectId,
    },
    /// Daemon health and counters
    Status,
    Shutdown,
}

/// Responses the daemon returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    Pong,
    Hello { version: String },
    Ok,
    Job { state: State },
    Projects { projects: Vec<ProjectMeta> },
    Project { meta: ProjectMeta },
    Uploaded { filename: String },
    Status { uptime_secs: u64, runs_active: usize },
    ShuttingDown,
    Error { message: String },
}

/// Encode a message as raw JSON (no length prefix)
pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(message)?)
}

/// Decode a raw JSON message
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Read one length-prefixed message
pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, ProtocolError> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ProtocolError::ConnectionClosed)
        }
        Err(e) => return Err(e.into()),
    }
    let len = u32::from_be_bytes(len_buf);
    if u64::from(len) > MAX_MESSAGE_BYTES {
        return Err(ProtocolError::MessageTooLarge(u64::from(len)));
    }
    let mut buf = vec![0u8; len as usize];
    match reader.read_exact(&mut buf).await {
        Ok(_) => Ok(buf),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            Err(ProtocolError::ConnectionClosed)
        }
        Err(e) => Err(e.into()),
    }
}

/// Write one length-prefixed message
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    bytes: &[u8],
) -> Result<(), ProtocolError> {
    if bytes.len() as u64 > MAX_MESSAGE_BYTES {
        return Err(ProtocolError::MessageTooLarge(bytes.len() as u64));
    }
    writer.write_all(&(bytes.len() as u32).to_be_bytes()).await?;
    writer.write_all(bytes).await?;
    writer.flush().await?;
    Ok(())
}

/// Read a request, bounded by `timeout`
pub async fn read_request<R: AsyncRead + Unpin>(
    reader: &mut R,
    timeout: Duration,
) -> Result<Request, ProtocolError> {
    match tokio::time::timeout(timeout, read_message(reader)).await {
        Ok(bytes) => decode(&bytes?),
        Err(_) => Err(ProtocolError::Timeout),
    }
}

/// Write a response, bounded by `timeout`
pub async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &Response,
    timeout: Duration,
) -> Result<(), ProtocolError> {
    let bytes = encode(response)?;
    match tokio::time::timeout(timeout, write_message(writer, &bytes)).await {
        Ok(result) => result,
        Err(_) => Err(ProtocolError::Timeout),
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
