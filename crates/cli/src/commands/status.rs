// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cg status` - poll a project's run state

use crate::client::DaemonClient;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use cg_core::{ProjectId, State};
use cg_daemon::lifecycle::Config;
use cg_daemon::protocol::{Request, Response};
use clap::Args;
use std::time::Duration;

#[derive(Args)]
pub struct StatusArgs {
    /// Project to poll
    pub project: String,

    /// Keep polling until the run reaches a terminal state
    #[arg(long)]
    pub watch: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub async fn run(args: StatusArgs, config: &Config) -> Result<()> {
    let project = ProjectId::new(args.project)?;
    let client = DaemonClient::connect_or_start(config).await?;

    loop {
        let state = fetch(&client, &project).await?;
        match args.format {
            OutputFormat::Json => output::print_json(&state)?,
            OutputFormat::Text => print_state(&state),
        }
        if !args.watch || state.is_terminal() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

async fn fetch(client: &DaemonClient, project: &ProjectId) -> Result<State> {
    match client
        .request(&Request::JobStatus {
            project_id: project.clone(),
        })
        .await?
    {
        Response::Job { state } => Ok(state),
        _ => anyhow::bail!("unexpected response from daemon"),
    }
}

fn print_state(state: &State) {
    println!("Status: {} ({}%)", state.status.name(), state.percent);
    println!("Step: {}", state.step);
    if let Some(error) = &state.last_error {
        println!("Error: {}", error);
    }
    if !state.history.is_empty() {
        println!("History:");
        for entry in &state.history {
            let mark = if entry.ok { "ok" } else { "failed" };
            match &entry.error {
                Some(error) => println!("  {:<10} {} ({})", entry.step, mark, error),
                None => println!("  {:<10} {}", entry.step, mark),
            }
        }
    }
}
