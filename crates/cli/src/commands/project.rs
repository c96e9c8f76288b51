// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cg project` - project metadata management

use crate::client::DaemonClient;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use cg_core::{ProjectId, ProjectMeta};
use cg_daemon::lifecycle::Config;
use cg_daemon::protocol::{Request, Response};
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommand,
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// List registered projects
    List {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Show one project's metadata
    Show { id: String },
    /// Create or update project metadata
    Set {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a project and all its documents
    Delete { id: String },
}

pub async fn run(args: ProjectArgs, config: &Config) -> Result<()> {
    let client = DaemonClient::connect_or_start(config).await?;

    match args.command {
        ProjectCommand::List { format } => {
            match client.request(&Request::Projects).await? {
                Response::Projects { projects } => match format {
                    OutputFormat::Json => output::print_json(&projects)?,
                    OutputFormat::Text => print_project_list(&projects),
                },
                _ => anyhow::bail!("unexpected response from daemon"),
            }
            Ok(())
        }

        ProjectCommand::Show { id } => {
            let project_id = ProjectId::new(id)?;
            match client.request(&Request::GetProject { project_id }).await? {
                Response::Project { meta } => {
                    print_project(&meta);
                    Ok(())
                }
                _ => anyhow::bail!("unexpected response from daemon"),
            }
        }

        ProjectCommand::Set {
            id,
            name,
            status,
            description,
        } => {
            let project_id = ProjectId::new(id)?;
            match client
                .request(&Request::UpdateProject {
                    project_id,
                    name,
                    status,
                    description,
                })
                .await?
            {
                Response::Project { meta } => {
                    println!("Updated: {}", meta.id);
                    Ok(())
                }
                _ => anyhow::bail!("unexpected response from daemon"),
            }
        }

        ProjectCommand::Delete { id } => {
            let project_id = ProjectId::new(id)?;
            match client.request(&Request::DeleteProject { project_id }).await? {
                Response::Ok => {
                    println!("Deleted");
                    Ok(())
                }
                _ => anyhow::bail!("unexpected response from daemon"),
            }
        }
    }
}

fn print_project_list(projects: &[ProjectMeta]) {
    if projects.is_empty() {
        println!("No projects");
        return;
    }
    println!("{:<38} {:<24} {:<10} UPDATED", "ID", "NAME", "STATUS");
    for p in projects {
        println!(
            "{:<38} {:<24} {:<10} {}",
            p.id,
            p.name,
            p.status,
            p.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
}

fn print_project(meta: &ProjectMeta) {
    println!("Project: {}", meta.id);
    println!("  Name: {}", meta.name);
    println!("  Status: {}", meta.status);
    println!("  Created: {}", meta.created_at.format("%Y-%m-%d %H:%M"));
    println!("  Updated: {}", meta.updated_at.format("%Y-%m-%d %H:%M"));
    if !meta.description.is_empty() {
        println!("  Description: {}", meta.description);
    }
    if !meta.tags.is_empty() {
        println!("  Tags: {}", meta.tags.join(", "));
    }
}
