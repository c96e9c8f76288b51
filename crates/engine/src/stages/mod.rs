// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage handlers and the closed stage registry
//!
//! Handlers are opaque to the executor: each writes its stage-specific
//! output document and reports ok or a failure message. The registry maps
//! the closed stage set to handler implementations; tests swap in failing
//! handlers to exercise halt-on-error behavior.

mod images;
mod indexing;
mod parsing;
mod ppt;
mod publish;
mod quiz;
mod summary;

pub use images::ImagesStage;
pub use indexing::IndexingStage;
pub use parsing::ParsingStage;
pub use ppt::PptStage;
pub use publish::PublishStage;
pub use quiz::QuizStage;
pub use summary::SummaryStage;

use async_trait::async_trait;
use cg_core::{GenerationConfig, ProjectId, Stage};
use cg_storage::{DocStore, StorageError};
use std::collections::HashMap;
use thiserror::Error;

/// Failure signaled by a stage handler
#[derive(Debug, Error)]
pub enum StageError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Failed(String),
}

/// One unit of pipeline work, side-effecting via the document store
#[async_trait]
pub trait StageHandler: Send + Sync {
    async fn execute(
        &self,
        store: &DocStore,
        project: &ProjectId,
        config: &GenerationConfig,
    ) -> Result<(), StageError>;
}

/// Closed mapping from stage to handler
pub struct StageRegistry {
    handlers: HashMap<Stage, Box<dyn StageHandler>>,
}

impl StageRegistry {
    /// Registry with no handlers; tests build from here
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registry with the builtin handler for every canonical stage
    pub fn builtin() -> Self {
        Self::empty()
            .with(Stage::Parsing, ParsingStage)
            .with(Stage::Indexing, IndexingStage)
            .with(Stage::Summary, SummaryStage)
            .with(Stage::Quiz, QuizStage)
            .with(Stage::Images, ImagesStage)
            .with(Stage::Ppt, PptStage)
            .with(Stage::Publish, PublishStage)
    }

    /// Register or replace the handler for a stage
    pub fn with(mut self, stage: Stage, handler: impl StageHandler + 'static) -> Self {
        self.handlers.insert(stage, Box::new(handler));
        self
    }

    pub fn get(&self, stage: Stage) -> Option<&dyn StageHandler> {
        self.handlers.get(&stage).map(|h| h.as_ref())
    }
}

/// Handler that always fails with a fixed message
#[cfg(any(test, feature = "test-support"))]
pub struct FailingStage(pub &'static str);

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl StageHandler for FailingStage {
    async fn execute(
        &self,
        _store: &DocStore,
        _project: &ProjectId,
        _config: &GenerationConfig,
    ) -> Result<(), StageError> {
        Err(StageError::Failed(self.0.to_string()))
    }
}

#[cfg(test)]
#[path = "stages_tests.rs"]
mod tests;
