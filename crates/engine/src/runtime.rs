// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launch/status boundary for pipeline runs
//!
//! `start` is fire-and-forget: the fresh state and config become durable
//! before it returns, then the executor proceeds on a detached task. The
//! durable state document is the only channel back to callers, who poll it
//! through `status`.

use crate::executor::{Executor, STAGE_WORK_DELAY};
use crate::runs::RunTracker;
use crate::stages::StageRegistry;
use crate::EngineError;
use cg_core::{effective_stages, Clock, GenerationConfig, ProjectId, Stage, State, SystemClock};
use cg_storage::DocStore;
use std::sync::Arc;
use std::time::Duration;

/// Coordinates run launches and status reads for one document store
pub struct Runtime<C: Clock + 'static> {
    store: DocStore,
    runs: Arc<RunTracker>,
    executor: Arc<Executor<C>>,
}

impl Runtime<SystemClock> {
    /// Runtime with the builtin stage handlers and the system clock
    pub fn new(store: DocStore) -> Self {
        Self::with_parts(store, StageRegistry::builtin(), SystemClock, STAGE_WORK_DELAY)
    }
}

impl<C: Clock + 'static> Runtime<C> {
    /// Runtime with an explicit registry, clock, and stage delay
    pub fn with_parts(
        store: DocStore,
        registry: StageRegistry,
        clock: C,
        stage_delay: Duration,
    ) -> Self {
        let runs = Arc::new(RunTracker::new());
        let executor = Arc::new(
            Executor::new(store.clone(), registry, Arc::clone(&runs), clock)
                .with_stage_delay(stage_delay),
        );
        Self {
            store,
            runs,
            executor,
        }
    }

    /// Launch a run for a project and return its token.
    ///
    /// The state and config documents are durably visible before this
    /// returns; no stage has executed yet. Overlapping launches are
    /// accepted, and the newest run wins. Must be called from within a
    /// tokio runtime.
    pub fn start(
        &self,
        project: &ProjectId,
        config: GenerationConfig,
    ) -> Result<u64, EngineError> {
        let run = self.runs.begin(project);
        let stages = effective_stages(&config);
        let first = stages.first().copied().unwrap_or(Stage::Parsing);

        let written = self
            .runs
            .write_if_current(project, run, || {
                self.store.write_state(project, &State::started(first, run))?;
                self.store.write_config(project, &config)?;
                Ok::<(), EngineError>(())
            })
            .transpose()?
            .is_some();
        if !written {
            // An even newer launch got in between; it owns the documents now.
            return Ok(run);
        }

        tracing::info!(project = %project, run, stages = stages.len(), "run launched");

        let executor = Arc::clone(&self.executor);
        let project = project.clone();
        tokio::spawn(async move {
            executor.run(&project, &config, run).await;
        });

        Ok(run)
    }

    /// Current state snapshot; a never-started project reads as idle
    pub fn status(&self, project: &ProjectId) -> Result<State, EngineError> {
        Ok(self.store.read_state(project)?.unwrap_or_else(State::idle))
    }

    /// Number of projects with an in-flight run
    pub fn active_runs(&self) -> usize {
        self.runs.active_count()
    }

    pub fn store(&self) -> &DocStore {
        &self.store
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
