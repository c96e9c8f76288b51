// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cg daemon` - daemon management

use crate::client::{cgd_binary, DaemonClient};
use anyhow::Result;
use cg_daemon::lifecycle::Config;
use cg_daemon::protocol::{Request, Response};
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Show daemon status
    Status,
    /// Stop the daemon
    Stop,
    /// Run the daemon in the foreground
    Run,
}

pub async fn run(args: DaemonArgs, config: &Config) -> Result<()> {
    match args.command {
        DaemonCommand::Status => {
            let client = DaemonClient::connect(config)?;
            match client.request(&Request::Status).await? {
                Response::Status {
                    uptime_secs,
                    runs_active,
                } => {
                    println!("Daemon running");
                    println!("  Uptime: {}s", uptime_secs);
                    println!("  Active runs: {}", runs_active);
                    Ok(())
                }
                _ => anyhow::bail!("unexpected response from daemon"),
            }
        }

        DaemonCommand::Stop => match DaemonClient::connect(config) {
            Ok(client) => match client.request(&Request::Shutdown).await? {
                Response::ShuttingDown => {
                    println!("Daemon stopping");
                    Ok(())
                }
                _ => anyhow::bail!("unexpected response from daemon"),
            },
            Err(_) => {
                println!("Daemon not running");
                Ok(())
            }
        },

        DaemonCommand::Run => {
            let status = std::process::Command::new(cgd_binary())
                .arg(&config.data_root)
                .status()?;
            anyhow::ensure!(status.success(), "cgd exited with {}", status);
            Ok(())
        }
    }
}
