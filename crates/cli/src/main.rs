// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! cg - Coursegen CLI

mod client;
mod commands;
mod completions;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{daemon, project, start, status, upload};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cg",
    version,
    about = "Coursegen - project-scoped content generation job runner"
)]
struct Cli {
    /// Data root directory (defaults to $CG_DATA_ROOT or the platform data dir)
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch a generation run for a project
    Start(start::StartArgs),
    /// Poll a project's run state
    Status(status::StatusArgs),
    /// Upload a source file into a project
    Upload(upload::UploadArgs),
    /// Project metadata management
    Project(project::ProjectArgs),
    /// Daemon management
    Daemon(daemon::DaemonArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        completions::generate(args);
        return Ok(());
    }

    let config = cg_daemon::lifecycle::Config::resolve(cli.data_root.clone())?;

    match cli.command {
        Commands::Start(args) => start::run(args, &config).await,
        Commands::Status(args) => status::run(args, &config).await,
        Commands::Upload(args) => upload::run(args, &config).await,
        Commands::Project(args) => project::run(args, &config).await,
        Commands::Daemon(args) => daemon::run(args, &config).await,
        Commands::Completions(_) => Ok(()),
    }
}

fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
