// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publish manifest placeholder stage

use super::{StageError, StageHandler};
use async_trait::async_trait;
use cg_core::{GenerationConfig, Language, ProjectId};
use cg_storage::{docs, DocStore};
use serde_json::json;

/// Writes the xiaohongshu publish manifest
pub struct PublishStage;

#[async_trait]
impl StageHandler for PublishStage {
    async fn execute(
        &self,
        store: &DocStore,
        project: &ProjectId,
        config: &GenerationConfig,
    ) -> Result<(), StageError> {
        let (title, content) = match config.language {
            Language::Zh => ("示例标题", "示例文案 #话题"),
            Language::En => ("Sample title", "Sample copy #topic"),
        };
        store.write(
            docs::output_path(project, docs::PUBLISH_MANIFEST_DOC),
            &json!({ "title": title, "content": content, "images": [] }),
        )?;
        Ok(())
    }
}
