// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-project run tokens
//!
//! Overlapping launches for one project are accepted; the newest token wins.
//! The executor performs every durable state write through
//! [`RunTracker::write_if_current`], which holds the tracker lock across the
//! token check and the write. A superseded run can therefore never interleave
//! a stale write with the newer run's read-modify-write cycle.

use cg_core::ProjectId;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct RunSlot {
    latest: u64,
    active: Option<u64>,
}

/// Tracks the latest run token per project
#[derive(Debug, Default)]
pub struct RunTracker {
    slots: Mutex<HashMap<String, RunSlot>>,
}

impl RunTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next run token for a project and mark it active
    pub fn begin(&self, project: &ProjectId) -> u64 {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        let slot = slots.entry(project.as_str().to_string()).or_default();
        slot.latest += 1;
        slot.active = Some(slot.latest);
        slot.latest
    }

    /// Whether `run` is still the latest token for the project
    pub fn is_current(&self, project: &ProjectId, run: u64) -> bool {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots
            .get(project.as_str())
            .map(|slot| slot.latest == run)
            .unwrap_or(false)
    }

    /// Run `write` only if `run` is still current, holding the tracker lock
    /// for the duration so no newer run's write can interleave
    pub fn write_if_current<T>(
        &self,
        project: &ProjectId,
        run: u64,
        write: impl FnOnce() -> T,
    ) -> Option<T> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        let current = slots
            .get(project.as_str())
            .map(|slot| slot.latest == run)
            .unwrap_or(false);
        if !current {
            return None;
        }
        Some(write())
    }

    /// Retire a finished run; stale tokens are ignored
    pub fn finish(&self, project: &ProjectId, run: u64) {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(slot) = slots.get_mut(project.as_str()) {
            if slot.active == Some(run) {
                slot.active = None;
            }
        }
    }

    /// Number of projects with a run still executing
    pub fn active_count(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.values().filter(|slot| slot.active.is_some()).count()
    }
}

#[cfg(test)]
#[path = "runs_tests.rs"]
mod tests;
