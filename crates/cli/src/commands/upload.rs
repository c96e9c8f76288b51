// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cg upload` - copy a source file into a project

use crate::client::DaemonClient;
use anyhow::Result;
use cg_core::ProjectId;
use cg_daemon::lifecycle::Config;
use cg_daemon::protocol::{Request, Response};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct UploadArgs {
    /// Project receiving the file
    pub project: String,

    /// File to copy into the project's uploads directory
    pub file: PathBuf,
}

pub async fn run(args: UploadArgs, config: &Config) -> Result<()> {
    let project = ProjectId::new(args.project)?;
    // The daemon may run with a different working directory
    let source = std::fs::canonicalize(&args.file)?;

    let client = DaemonClient::connect_or_start(config).await?;
    match client
        .request(&Request::Upload {
            project_id: project,
            source,
        })
        .await?
    {
        Response::Uploaded { filename } => {
            println!("Uploaded: {}", filename);
            Ok(())
        }
        _ => anyhow::bail!("unexpected response from daemon"),
    }
}
