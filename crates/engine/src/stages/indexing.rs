// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content index placeholder stage

use super::{StageError, StageHandler};
use async_trait::async_trait;
use cg_core::{GenerationConfig, ProjectId};
use cg_storage::{docs, DocStore};
use serde_json::json;

/// Writes the content index document
pub struct IndexingStage;

#[async_trait]
impl StageHandler for IndexingStage {
    async fn execute(
        &self,
        store: &DocStore,
        project: &ProjectId,
        _config: &GenerationConfig,
    ) -> Result<(), StageError> {
        store.write(
            docs::output_path(project, docs::INDEX_DOC),
            &json!({ "ok": true }),
        )?;
        Ok(())
    }
}
