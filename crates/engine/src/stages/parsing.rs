// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsed-content placeholder stage

use super::{StageError, StageHandler};
use async_trait::async_trait;
use cg_core::{GenerationConfig, Language, ProjectId};
use cg_storage::{docs, DocStore};
use serde_json::json;

/// Writes the parsed-text document derived from the project's uploads
pub struct ParsingStage;

#[async_trait]
impl StageHandler for ParsingStage {
    async fn execute(
        &self,
        store: &DocStore,
        project: &ProjectId,
        config: &GenerationConfig,
    ) -> Result<(), StageError> {
        let text = match config.language {
            Language::Zh => "解析结果占位",
            Language::En => "Parsed content placeholder",
        };
        store.write(
            docs::output_path(project, docs::PARSED_DOC),
            &json!({ "text": text }),
        )?;
        Ok(())
    }
}
