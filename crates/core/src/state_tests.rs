// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::clock::{Clock, FakeClock};
use crate::config::GenerationConfig;
use crate::stage::effective_stages;

#[test]
fn idle_state_matches_synthesized_default() {
    let state = State::idle();

    assert_eq!(state.status, RunStatus::Idle);
    assert_eq!(state.step, "parsing");
    assert_eq!(state.percent, 0);
    assert!(state.history.is_empty());
    assert!(state.last_error.is_none());
    assert!(!state.is_terminal());
}

#[test]
fn started_state_is_running_with_empty_history() {
    let state = State::started(Stage::Parsing, 3);

    assert_eq!(state.status, RunStatus::Running);
    assert_eq!(state.step, "parsing");
    assert_eq!(state.percent, 0);
    assert_eq!(state.run, 3);
    assert!(state.history.is_empty());
}

#[test]
fn begin_stage_updates_step_before_any_outcome() {
    let mut state = State::started(Stage::Parsing, 1);

    state.begin_stage(Stage::Indexing);

    assert_eq!(state.step, "indexing");
    assert_eq!(state.status, RunStatus::Running);
    assert!(state.history.is_empty());
}

#[test]
fn success_percent_is_floor_of_stage_fraction() {
    let clock = FakeClock::new();
    let stages = effective_stages(&GenerationConfig {
        generate_ppt: true,
        auto_images: true,
        ..Default::default()
    });
    let total = stages.len();
    let mut state = State::started(stages[0], 1);

    let mut percents = Vec::new();
    for (i, stage) in stages.iter().enumerate() {
        state.begin_stage(*stage);
        state.record_success(*stage, i + 1, total, clock.now());
        percents.push(state.percent);
    }

    assert_eq!(percents, vec![14, 28, 42, 57, 71, 85, 100]);
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn failure_sets_error_invariants() {
    let clock = FakeClock::new();
    let mut state = State::started(Stage::Parsing, 1);
    state.begin_stage(Stage::Parsing);
    state.record_success(Stage::Parsing, 1, 5, clock.now());
    state.begin_stage(Stage::Indexing);

    state.record_failure(Stage::Indexing, "index backend offline", clock.now());

    assert_eq!(state.status, RunStatus::Error);
    assert_eq!(state.last_error.as_deref(), Some("index backend offline"));
    assert!(state.is_terminal());

    let last = state.history.last().unwrap();
    assert!(!last.ok);
    assert_eq!(last.step, "indexing");
    assert_eq!(last.error.as_deref(), Some("index backend offline"));
}

#[test]
fn finish_sets_complete_invariants() {
    let clock = FakeClock::new();
    let mut state = State::started(Stage::Parsing, 1);
    state.record_success(Stage::Parsing, 1, 1, clock.now());

    state.finish();

    assert_eq!(state.status, RunStatus::Complete);
    assert_eq!(state.percent, 100);
    assert_eq!(state.step, STEP_COMPLETE);
    assert!(state.is_terminal());
}

#[test]
fn serializes_with_wire_field_names() {
    let clock = FakeClock::new();
    let mut state = State::started(Stage::Parsing, 2);
    state.record_success(Stage::Parsing, 1, 5, clock.now());
    let value = serde_json::to_value(&state).unwrap();

    assert_eq!(value["step"], "parsing");
    assert_eq!(value["percent"], 20);
    assert_eq!(value["status"], "running");
    assert_eq!(value["run"], 2);
    // lastError is omitted until a failure happens
    assert!(value.get("lastError").is_none());
    assert_eq!(value["history"][0]["ok"], true);
    assert!(value["history"][0].get("error").is_none());

    state.record_failure(Stage::Indexing, "boom", clock.now());
    let value = serde_json::to_value(&state).unwrap();
    assert_eq!(value["lastError"], "boom");
    assert_eq!(value["history"][1]["error"], "boom");
}

#[test]
fn reads_legacy_documents_without_run_field() {
    let json = r#"{"step":"complete","percent":100,"status":"complete"}"#;
    let state: State = serde_json::from_str(json).unwrap();

    assert_eq!(state.run, 0);
    assert!(state.history.is_empty());
    assert_eq!(state.status, RunStatus::Complete);
}
