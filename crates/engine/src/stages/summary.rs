// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Summary placeholder stage

use super::{StageError, StageHandler};
use async_trait::async_trait;
use cg_core::{GenerationConfig, Language, ProjectId};
use cg_storage::{docs, DocStore};
use serde_json::json;

/// Writes the summary document at the configured level
pub struct SummaryStage;

#[async_trait]
impl StageHandler for SummaryStage {
    async fn execute(
        &self,
        store: &DocStore,
        project: &ProjectId,
        config: &GenerationConfig,
    ) -> Result<(), StageError> {
        let text = match config.language {
            Language::Zh => "摘要占位",
            Language::En => "Summary placeholder",
        };
        store.write(
            docs::output_path(project, docs::SUMMARY_DOC),
            &json!({ "text": text, "level": config.summary_level }),
        )?;
        Ok(())
    }
}
