// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Quiz placeholder stage

use super::{StageError, StageHandler};
use async_trait::async_trait;
use cg_core::{GenerationConfig, ProjectId};
use cg_storage::{docs, DocStore};
use serde_json::json;

/// Writes the quiz document; the configured count is recorded for the
/// eventual generator
pub struct QuizStage;

#[async_trait]
impl StageHandler for QuizStage {
    async fn execute(
        &self,
        store: &DocStore,
        project: &ProjectId,
        config: &GenerationConfig,
    ) -> Result<(), StageError> {
        store.write(
            docs::output_path(project, docs::QUIZ_DOC),
            &json!({ "questions": [], "count": config.quiz_count }),
        )?;
        Ok(())
    }
}
