// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket server and request handling

use std::path::Path;

use tokio::net::UnixStream;
use tracing::{debug, error};

use crate::lifecycle::Daemon;
use crate::protocol::{self, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION};
use cg_core::{Clock, ProjectId, ProjectMeta, SystemClock};
use cg_storage::docs;

/// Errors from connection handling
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),
    #[error("request read timeout")]
    Timeout,
}

/// Handle a single client connection
pub async fn handle_connection(daemon: &mut Daemon, stream: UnixStream) -> Result<(), ServerError> {
    let (mut reader, mut writer) = stream.into_split();

    let request = match protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await {
        Ok(request) => request,
        Err(protocol::ProtocolError::Timeout) => {
            error!("request read timeout");
            return Err(ServerError::Timeout);
        }
        Err(protocol::ProtocolError::ConnectionClosed) => {
            debug!("client disconnected before sending a request");
            return Ok(());
        }
        Err(e) => {
            error!("failed to read request: {}", e);
            return Err(ServerError::Protocol(e));
        }
    };

    debug!("received request: {:?}", request);
    let response = handle_request(daemon, request).await;
    debug!("sending response: {:?}", response);

    protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT)
        .await
        .map_err(ServerError::Protocol)?;

    Ok(())
}

/// Handle a single request and return a response
pub async fn handle_request(daemon: &mut Daemon, request: Request) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version: _ } => Response::Hello {
            version: PROTOCOL_VERSION.to_string(),
        },

        Request::Start { project_id, config } => {
            match daemon.runtime.start(&project_id, config) {
                Ok(_) => Response::Ok,
                Err(e) => Response::Error {
                    message: e.to_string(),
                },
            }
        }

        Request::JobStatus { project_id } => match daemon.runtime.status(&project_id) {
            Ok(state) => Response::Job { state },
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        },

        Request::Upload { project_id, source } => handle_upload(daemon, &project_id, &source),

        Request::Projects => match daemon.runtime.store().list_projects() {
            Ok(projects) => Response::Projects { projects },
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        },

        Request::GetProject { project_id } => {
            match daemon.runtime.store().read_meta(&project_id) {
                Ok(Some(meta)) => Response::Project { meta },
                Ok(None) => Response::Error {
                    message: format!("project not found: {}", project_id),
                },
                Err(e) => Response::Error {
                    message: e.to_string(),
                },
            }
        }

        Request::UpdateProject {
            project_id,
            name,
            status,
            description,
        } => handle_update_project(daemon, &project_id, name, status, description),

        Request::DeleteProject { project_id } => {
            match daemon.runtime.store().delete_project(&project_id) {
                Ok(()) => Response::Ok,
                Err(e) => Response::Error {
                    message: e.to_string(),
                },
            }
        }

        Request::Status => Response::Status {
            uptime_secs: daemon.start_time.elapsed().as_secs(),
            runs_active: daemon.runtime.active_runs(),
        },

        Request::Shutdown => {
            daemon.shutdown_requested = true;
            Response::ShuttingDown
        }
    }
}

fn handle_upload(daemon: &Daemon, project: &ProjectId, source: &Path) -> Response {
    // Only the final file name is kept; the rest of the source path is the
    // client's business.
    let Some(filename) = source.file_name().and_then(|n| n.to_str()) else {
        return Response::Error {
            message: format!("source has no usable file name: {}", source.display()),
        };
    };
    match daemon
        .runtime
        .store()
        .copy_in(docs::upload_path(project, filename), source)
    {
        Ok(_) => Response::Uploaded {
            filename: filename.to_string(),
        },
        Err(e) => Response::Error {
            message: e.to_string(),
        },
    }
}

fn handle_update_project(
    daemon: &Daemon,
    project: &ProjectId,
    name: Option<String>,
    status: Option<String>,
    description: Option<String>,
) -> Response {
    let store = daemon.runtime.store();
    let now = SystemClock.now();

    let mut meta = match store.read_meta(project) {
        Ok(Some(meta)) => meta,
        Ok(None) => ProjectMeta::new(project.as_str(), project.as_str(), now),
        Err(e) => {
            return Response::Error {
                message: e.to_string(),
            }
        }
    };

    if let Some(name) = name {
        meta.name = name;
    }
    if let Some(status) = status {
        meta.status = status;
    }
    if let Some(description) = description {
        meta.description = description;
    }
    meta.updated_at = now;

    match store.register_project(project, &meta) {
        Ok(()) => Response::Project { meta },
        Err(e) => Response::Error {
            message: e.to_string(),
        },
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
