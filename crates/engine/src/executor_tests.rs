// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::stages::FailingStage;
use cg_core::{FakeClock, RunStatus};
use cg_storage::docs;

fn setup(registry: StageRegistry) -> (Executor<FakeClock>, Arc<RunTracker>, DocStore) {
    let store = DocStore::open_temp().unwrap();
    let runs = Arc::new(RunTracker::new());
    let executor = Executor::new(store.clone(), registry, Arc::clone(&runs), FakeClock::new())
        .with_stage_delay(Duration::ZERO);
    (executor, runs, store)
}

fn full_config() -> GenerationConfig {
    GenerationConfig {
        generate_ppt: true,
        auto_images: true,
        ..Default::default()
    }
}

#[tokio::test]
async fn run_completes_all_stages_in_order() {
    let (executor, runs, store) = setup(StageRegistry::builtin());
    let project = ProjectId::new("demo").unwrap();
    let run = runs.begin(&project);

    let outcome = executor.run(&project, &full_config(), run).await;
    assert_eq!(outcome, RunOutcome::Complete);

    let state = store.read_state(&project).unwrap().unwrap();
    assert_eq!(state.status, RunStatus::Complete);
    assert_eq!(state.percent, 100);
    assert_eq!(state.step, "complete");
    assert_eq!(state.run, run);
    assert_eq!(state.history.len(), 7);
    assert!(state.history.iter().all(|h| h.ok));

    let steps: Vec<&str> = state.history.iter().map(|h| h.step.as_str()).collect();
    assert_eq!(
        steps,
        vec!["parsing", "indexing", "summary", "quiz", "images", "ppt", "publish"]
    );
}

#[tokio::test]
async fn run_writes_an_output_document_per_stage() {
    let (executor, runs, store) = setup(StageRegistry::builtin());
    let project = ProjectId::new("demo").unwrap();
    let run = runs.begin(&project);

    executor.run(&project, &full_config(), run).await;

    for doc in [
        docs::PARSED_DOC,
        docs::INDEX_DOC,
        docs::SUMMARY_DOC,
        docs::QUIZ_DOC,
        docs::IMAGES_DOC,
        docs::SLIDES_DOC,
        docs::PUBLISH_MANIFEST_DOC,
    ] {
        assert!(
            store.exists(docs::output_path(&project, doc)).unwrap(),
            "missing output: {}",
            doc
        );
    }
}

#[tokio::test]
async fn run_skips_unconfigured_stages() {
    let (executor, runs, store) = setup(StageRegistry::builtin());
    let project = ProjectId::new("demo").unwrap();
    let run = runs.begin(&project);

    let outcome = executor
        .run(&project, &GenerationConfig::default(), run)
        .await;
    assert_eq!(outcome, RunOutcome::Complete);

    let state = store.read_state(&project).unwrap().unwrap();
    assert_eq!(state.history.len(), 5);
    assert!(!store
        .exists(docs::output_path(&project, docs::IMAGES_DOC))
        .unwrap());
    assert!(!store
        .exists(docs::output_path(&project, docs::SLIDES_DOC))
        .unwrap());
}

#[tokio::test]
async fn failure_halts_the_run_and_records_the_error() {
    let registry =
        StageRegistry::builtin().with(Stage::Quiz, FailingStage("quiz generator unavailable"));
    let (executor, runs, store) = setup(registry);
    let project = ProjectId::new("demo").unwrap();
    let run = runs.begin(&project);

    let outcome = executor
        .run(&project, &GenerationConfig::default(), run)
        .await;
    assert_eq!(outcome, RunOutcome::Failed);

    let state = store.read_state(&project).unwrap().unwrap();
    assert_eq!(state.status, RunStatus::Error);
    assert_eq!(state.last_error.as_deref(), Some("quiz generator unavailable"));

    // parsing, indexing, summary succeeded; quiz is the last entry
    assert_eq!(state.history.len(), 4);
    let last = state.history.last().unwrap();
    assert_eq!(last.step, "quiz");
    assert!(!last.ok);
    assert_eq!(last.error.as_deref(), Some("quiz generator unavailable"));

    // percent reflects the last successful stage: 3 of 5
    assert_eq!(state.percent, 60);

    // no stage after the failure executed
    assert!(!store
        .exists(docs::output_path(&project, docs::PUBLISH_MANIFEST_DOC))
        .unwrap());
}

#[tokio::test]
async fn superseded_run_abandons_without_writing() {
    let (executor, runs, store) = setup(StageRegistry::builtin());
    let project = ProjectId::new("demo").unwrap();

    let stale = runs.begin(&project);
    let latest = runs.begin(&project);

    let outcome = executor
        .run(&project, &GenerationConfig::default(), stale)
        .await;

    assert_eq!(outcome, RunOutcome::Superseded);
    assert!(store.read_state(&project).unwrap().is_none());
    assert!(runs.is_current(&project, latest));
}

#[tokio::test]
async fn missing_handler_is_recorded_as_a_stage_failure() {
    let (executor, runs, store) = setup(StageRegistry::empty());
    let project = ProjectId::new("demo").unwrap();
    let run = runs.begin(&project);

    let outcome = executor
        .run(&project, &GenerationConfig::default(), run)
        .await;
    assert_eq!(outcome, RunOutcome::Failed);

    let state = store.read_state(&project).unwrap().unwrap();
    assert_eq!(state.history.len(), 1);
    assert!(state
        .last_error
        .as_deref()
        .unwrap()
        .contains("no handler registered"));
}

#[tokio::test]
async fn run_retires_its_active_slot() {
    let (executor, runs, _store) = setup(StageRegistry::builtin());
    let project = ProjectId::new("demo").unwrap();
    let run = runs.begin(&project);
    assert_eq!(runs.active_count(), 1);

    executor
        .run(&project, &GenerationConfig::default(), run)
        .await;

    assert_eq!(runs.active_count(), 0);
}
