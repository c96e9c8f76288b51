// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Image manifest placeholder stage

use super::{StageError, StageHandler};
use async_trait::async_trait;
use cg_core::{GenerationConfig, ProjectId};
use cg_storage::{docs, DocStore};
use serde_json::json;

/// Writes the image manifest in the configured style
pub struct ImagesStage;

#[async_trait]
impl StageHandler for ImagesStage {
    async fn execute(
        &self,
        store: &DocStore,
        project: &ProjectId,
        config: &GenerationConfig,
    ) -> Result<(), StageError> {
        store.write(
            docs::output_path(project, docs::IMAGES_DOC),
            &json!({ "items": [], "style": config.image_style }),
        )?;
        Ok(())
    }
}
