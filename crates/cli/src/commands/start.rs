// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cg start` - launch a generation run

use crate::client::DaemonClient;
use anyhow::Result;
use cg_core::{GenerationConfig, ImageStyle, Language, ProjectId, SummaryLevel};
use cg_daemon::lifecycle::Config;
use cg_daemon::protocol::{Request, Response};
use clap::{Args, ValueEnum};

#[derive(Args)]
pub struct StartArgs {
    /// Project to run (a fresh id is generated when omitted)
    pub project: Option<String>,

    /// Enable web search enrichment
    #[arg(long)]
    pub web_search: bool,

    /// Generate a slide deck
    #[arg(long)]
    pub ppt: bool,

    /// Generate images automatically
    #[arg(long)]
    pub images: bool,

    /// Style for generated images
    #[arg(long, value_enum, default_value = "flat")]
    pub image_style: ImageStyleArg,

    /// Output language
    #[arg(long, value_enum, default_value = "zh")]
    pub language: LanguageArg,

    /// Summary granularity
    #[arg(long, value_enum, default_value = "global")]
    pub summary_level: SummaryLevelArg,

    /// Number of quiz questions to generate
    #[arg(long, default_value_t = 10)]
    pub quiz_count: u32,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ImageStyleArg {
    Academic,
    Flat,
    Realistic,
    Wireframe,
}

impl From<ImageStyleArg> for ImageStyle {
    fn from(arg: ImageStyleArg) -> Self {
        match arg {
            ImageStyleArg::Academic => ImageStyle::Academic,
            ImageStyleArg::Flat => ImageStyle::Flat,
            ImageStyleArg::Realistic => ImageStyle::Realistic,
            ImageStyleArg::Wireframe => ImageStyle::Wireframe,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LanguageArg {
    Zh,
    En,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Zh => Language::Zh,
            LanguageArg::En => Language::En,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SummaryLevelArg {
    Chapter,
    Global,
    Both,
}

impl From<SummaryLevelArg> for SummaryLevel {
    fn from(arg: SummaryLevelArg) -> Self {
        match arg {
            SummaryLevelArg::Chapter => SummaryLevel::Chapter,
            SummaryLevelArg::Global => SummaryLevel::Global,
            SummaryLevelArg::Both => SummaryLevel::Both,
        }
    }
}

pub async fn run(args: StartArgs, config: &Config) -> Result<()> {
    let project = match args.project {
        Some(raw) => ProjectId::new(raw)?,
        None => ProjectId::new(uuid::Uuid::new_v4().to_string())?,
    };

    let generation = GenerationConfig {
        web_search_enabled: args.web_search,
        generate_ppt: args.ppt,
        auto_images: args.images,
        image_style: args.image_style.into(),
        language: args.language.into(),
        summary_level: args.summary_level.into(),
        quiz_count: args.quiz_count,
    };

    let client = DaemonClient::connect_or_start(config).await?;
    match client
        .request(&Request::Start {
            project_id: project.clone(),
            config: generation,
        })
        .await?
    {
        Response::Ok => {
            println!("Started: {}", project);
            Ok(())
        }
        _ => anyhow::bail!("unexpected response from daemon"),
    }
}
