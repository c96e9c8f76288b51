// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable state document for a pipeline run
//!
//! Pure state machine: transitions are methods with no I/O. The engine wires
//! them to storage with read-modify-write cycles, so pollers only ever see
//! the durable snapshots produced here.

use crate::stage::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Value recorded in `step` once every stage has finished
pub const STEP_COMPLETE: &str = "complete";

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Idle,
    Running,
    Complete,
    Error,
}

impl RunStatus {
    pub fn name(&self) -> &'static str {
        match self {
            RunStatus::Idle => "idle",
            RunStatus::Running => "running",
            RunStatus::Complete => "complete",
            RunStatus::Error => "error",
        }
    }
}

/// Outcome of one attempted stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub step: String,
    pub ok: bool,
    pub at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HistoryEntry {
    pub fn success(stage: Stage, at: DateTime<Utc>) -> Self {
        Self {
            step: stage.name().to_string(),
            ok: true,
            at,
            error: None,
        }
    }

    pub fn failure(stage: Stage, at: DateTime<Utc>, error: impl Into<String>) -> Self {
        Self {
            step: stage.name().to_string(),
            ok: false,
            at,
            error: Some(error.into()),
        }
    }
}

/// The pollable progress record for one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub step: String,
    pub percent: u8,
    pub status: RunStatus,
    #[serde(rename = "lastError", default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Monotonic run token; a stale writer abandons once a newer run exists
    #[serde(default)]
    pub run: u64,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl State {
    /// Synthesized snapshot for a project that was never started
    pub fn idle() -> Self {
        Self {
            step: Stage::Parsing.name().to_string(),
            percent: 0,
            status: RunStatus::Idle,
            last_error: None,
            run: 0,
            history: Vec::new(),
        }
    }

    /// Fresh state written at launch, before the first stage executes
    pub fn started(first: Stage, run: u64) -> Self {
        Self {
            step: first.name().to_string(),
            percent: 0,
            status: RunStatus::Running,
            last_error: None,
            run,
            history: Vec::new(),
        }
    }

    /// Mark a stage as the one currently executing
    pub fn begin_stage(&mut self, stage: Stage) {
        self.step = stage.name().to_string();
        self.status = RunStatus::Running;
    }

    /// Record a successful stage. `index` is 1-based within `total` stages.
    pub fn record_success(&mut self, stage: Stage, index: usize, total: usize, at: DateTime<Utc>) {
        self.history.push(HistoryEntry::success(stage, at));
        self.percent = (index * 100 / total) as u8;
    }

    /// Record a failed stage; the run halts here and the message is kept
    /// verbatim in both the history entry and `lastError`.
    pub fn record_failure(&mut self, stage: Stage, error: &str, at: DateTime<Utc>) {
        self.history.push(HistoryEntry::failure(stage, at, error));
        self.status = RunStatus::Error;
        self.last_error = Some(error.to_string());
    }

    /// Mark the run complete after all stages succeeded
    pub fn finish(&mut self) {
        self.step = STEP_COMPLETE.to_string();
        self.percent = 100;
        self.status = RunStatus::Complete;
    }

    /// Whether this run has reached a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, RunStatus::Complete | RunStatus::Error)
    }
}

impl Default for State {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
