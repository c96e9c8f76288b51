// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generation run configuration
//!
//! A config is written once at launch and read-only afterward; changing a
//! project's config never alters an in-progress run.

use serde::{Deserialize, Serialize};

/// Style applied to generated images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStyle {
    Academic,
    Flat,
    Realistic,
    Wireframe,
}

/// Output language for generated content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Zh,
    En,
}

/// Granularity of the generated summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLevel {
    Chapter,
    Global,
    Both,
}

/// Configuration for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    pub web_search_enabled: bool,
    #[serde(rename = "generatePPT")]
    pub generate_ppt: bool,
    pub auto_images: bool,
    pub image_style: ImageStyle,
    pub language: Language,
    pub summary_level: SummaryLevel,
    pub quiz_count: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            web_search_enabled: false,
            generate_ppt: false,
            auto_images: false,
            image_style: ImageStyle::Flat,
            language: Language::Zh,
            summary_level: SummaryLevel::Global,
            quiz_count: 10,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
