// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline executor
//!
//! Runs one project's effective stage list sequentially, making every state
//! transition durable before and after each stage. Handler failures are
//! captured into state and halt the run; nothing propagates out of a run to
//! the host process.

use crate::error::EngineError;
use crate::runs::RunTracker;
use crate::stages::{StageError, StageRegistry};
use cg_core::{effective_stages, Clock, GenerationConfig, ProjectId, Stage, State};
use cg_storage::DocStore;
use std::sync::Arc;
use std::time::Duration;

/// Fixed delay standing in for real stage work in the placeholder handlers
pub const STAGE_WORK_DELAY: Duration = Duration::from_secs(1);

/// Terminal disposition of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// All stages succeeded
    Complete,
    /// A stage failed; state records the error
    Failed,
    /// A newer run for the project took over; no further writes were made
    Superseded,
    /// A storage error ended the run early
    Aborted,
}

/// Executes runs against a project's durable state
pub struct Executor<C: Clock> {
    store: DocStore,
    registry: StageRegistry,
    runs: Arc<RunTracker>,
    clock: C,
    stage_delay: Duration,
}

impl<C: Clock> Executor<C> {
    pub fn new(store: DocStore, registry: StageRegistry, runs: Arc<RunTracker>, clock: C) -> Self {
        Self {
            store,
            registry,
            runs,
            clock,
            stage_delay: STAGE_WORK_DELAY,
        }
    }

    /// Override the simulated per-stage delay (tests use zero)
    pub fn with_stage_delay(mut self, delay: Duration) -> Self {
        self.stage_delay = delay;
        self
    }

    pub fn store(&self) -> &DocStore {
        &self.store
    }

    /// Run the effective stage list for a project.
    ///
    /// Never returns an error: stage failures are recorded into durable
    /// state, and storage problems abort the run with a logged error.
    pub async fn run(&self, project: &ProjectId, config: &GenerationConfig, run: u64) -> RunOutcome {
        let outcome = match self.run_inner(project, config, run).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(project = %project, run, error = %e, "run aborted on storage error");
                RunOutcome::Aborted
            }
        };
        self.runs.finish(project, run);
        tracing::info!(project = %project, run, outcome = ?outcome, "run finished");
        outcome
    }

    async fn run_inner(
        &self,
        project: &ProjectId,
        config: &GenerationConfig,
        run: u64,
    ) -> Result<RunOutcome, EngineError> {
        let stages = effective_stages(config);
        let total = stages.len();

        for (idx, stage) in stages.iter().copied().enumerate() {
            // Durable before the stage executes: pollers see the in-progress
            // stage, not just completed ones.
            if !self.write_state(project, run, |state| state.begin_stage(stage))? {
                return Ok(RunOutcome::Superseded);
            }

            tracing::info!(project = %project, run, stage = %stage, "stage starting");
            let result = self.invoke(stage, project, config).await;
            let at = self.clock.now();

            match result {
                Ok(()) => {
                    let index = idx + 1;
                    if !self.write_state(project, run, |state| {
                        state.record_success(stage, index, total, at)
                    })? {
                        return Ok(RunOutcome::Superseded);
                    }
                    tracing::info!(
                        project = %project,
                        run,
                        stage = %stage,
                        percent = index * 100 / total,
                        "stage complete"
                    );
                }
                Err(e) => {
                    let message = e.to_string();
                    tracing::error!(
                        project = %project,
                        run,
                        stage = %stage,
                        error = %message,
                        "stage failed, halting run"
                    );
                    if !self.write_state(project, run, |state| {
                        state.record_failure(stage, &message, at)
                    })? {
                        return Ok(RunOutcome::Superseded);
                    }
                    return Ok(RunOutcome::Failed);
                }
            }
        }

        if !self.write_state(project, run, |state| state.finish())? {
            return Ok(RunOutcome::Superseded);
        }
        Ok(RunOutcome::Complete)
    }

    /// One durable read-modify-write cycle against the state document.
    ///
    /// Returns false without writing when the run token has been superseded.
    fn write_state(
        &self,
        project: &ProjectId,
        run: u64,
        apply: impl FnOnce(&mut State),
    ) -> Result<bool, EngineError> {
        let result = self.runs.write_if_current(project, run, || {
            let mut state = self.store.read_state(project)?.unwrap_or_default();
            apply(&mut state);
            state.run = run;
            self.store.write_state(project, &state)?;
            Ok::<(), EngineError>(())
        });
        match result {
            Some(write) => write.map(|()| true),
            None => {
                tracing::info!(project = %project, run, "run superseded, abandoning");
                Ok(false)
            }
        }
    }

    async fn invoke(
        &self,
        stage: Stage,
        project: &ProjectId,
        config: &GenerationConfig,
    ) -> Result<(), StageError> {
        if !self.stage_delay.is_zero() {
            tokio::time::sleep(self.stage_delay).await;
        }
        match self.registry.get(stage) {
            Some(handler) => handler.execute(&self.store, project, config).await,
            None => Err(StageError::Failed(format!(
                "no handler registered for stage: {}",
                stage
            ))),
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
