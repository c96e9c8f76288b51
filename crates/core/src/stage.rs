// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage registry: the ordered catalog of pipeline stages
//!
//! The stage set is closed. Adding a stage means adding a variant here and
//! registering a handler in the engine, not branching on strings.

use crate::config::GenerationConfig;
use serde::{Deserialize, Serialize};

/// One named unit of pipeline work, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Parsing,
    Indexing,
    Summary,
    Quiz,
    Images,
    Ppt,
    Publish,
}

impl Stage {
    /// Canonical execution order of all stages
    pub const CANONICAL: [Stage; 7] = [
        Stage::Parsing,
        Stage::Indexing,
        Stage::Summary,
        Stage::Quiz,
        Stage::Images,
        Stage::Ppt,
        Stage::Publish,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Parsing => "parsing",
            Stage::Indexing => "indexing",
            Stage::Summary => "summary",
            Stage::Quiz => "quiz",
            Stage::Images => "images",
            Stage::Ppt => "ppt",
            Stage::Publish => "publish",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Compute the effective stage list for one run.
///
/// Canonical order restricted to the configured set: `images` requires
/// `autoImages`, `ppt` requires `generatePPT`, everything else always runs.
/// Computed once at launch and immutable for the run's duration.
pub fn effective_stages(config: &GenerationConfig) -> Vec<Stage> {
    Stage::CANONICAL
        .iter()
        .copied()
        .filter(|stage| match stage {
            Stage::Images => config.auto_images,
            Stage::Ppt => config.generate_ppt,
            _ => true,
        })
        .collect()
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
