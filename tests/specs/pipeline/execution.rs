//! Pipeline execution specs: full runs, halt-on-failure, supersession

use cg_core::{FakeClock, GenerationConfig, ProjectId, RunStatus, Stage, State};
use cg_engine::stages::FailingStage;
use cg_engine::{Runtime, StageRegistry};
use cg_storage::{docs, DocStore};
use similar_asserts::assert_eq;
use std::time::Duration;

fn runtime_with(registry: StageRegistry) -> Runtime<FakeClock> {
    let store = DocStore::open_temp().unwrap();
    Runtime::with_parts(store, registry, FakeClock::new(), Duration::ZERO)
}

async fn wait_terminal(runtime: &Runtime<FakeClock>, project: &ProjectId) -> State {
    for _ in 0..500 {
        let state = runtime.status(project).unwrap();
        if state.is_terminal() {
            return state;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("run did not reach a terminal state");
}

#[tokio::test]
async fn full_run_records_every_stage_and_output() {
    let runtime = runtime_with(StageRegistry::builtin());
    let project = ProjectId::new("course-101").unwrap();
    let config = GenerationConfig {
        generate_ppt: true,
        auto_images: true,
        ..Default::default()
    };

    runtime.start(&project, config).unwrap();
    let state = wait_terminal(&runtime, &project).await;

    assert_eq!(state.status, RunStatus::Complete);
    assert_eq!(state.percent, 100);
    assert_eq!(state.step, "complete");
    assert!(state.last_error.is_none());

    let steps: Vec<&str> = state.history.iter().map(|h| h.step.as_str()).collect();
    let expected: Vec<&str> = Stage::CANONICAL.iter().map(|s| s.name()).collect();
    assert_eq!(steps, expected);
    assert!(state.history.iter().all(|h| h.ok && h.error.is_none()));

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
            runtime
                .store()
                .exists(docs::output_path(&project, doc))
                .unwrap(),
            "missing output document: {}",
            doc
        );
    }
}

#[tokio::test]
async fn failure_halts_and_later_stages_never_execute() {
    let registry =
        StageRegistry::builtin().with(Stage::Images, FailingStage("image backend offline"));
    let runtime = runtime_with(registry);
    let project = ProjectId::new("course-101").unwrap();
    let config = GenerationConfig {
        generate_ppt: true,
        auto_images: true,
        ..Default::default()
    };

    runtime.start(&project, config).unwrap();
    let state = wait_terminal(&runtime, &project).await;

    assert_eq!(state.status, RunStatus::Error);
    assert_eq!(state.last_error.as_deref(), Some("image backend offline"));

    // parsing..images attempted, nothing after
    assert_eq!(state.history.len(), 5);
    let last = state.history.last().unwrap();
    assert_eq!(last.step, "images");
    assert!(!last.ok);
    assert_eq!(last.error.as_deref(), Some("image backend offline"));

    let store = runtime.store();
    assert!(!store
        .exists(docs::output_path(&project, docs::SLIDES_DOC))
        .unwrap());
    assert!(!store
        .exists(docs::output_path(&project, docs::PUBLISH_MANIFEST_DOC))
        .unwrap());
}

#[tokio::test]
async fn percent_never_decreases_across_a_run() {
    let runtime = runtime_with(StageRegistry::builtin());
    let project = ProjectId::new("course-101").unwrap();

    runtime
        .start(&project, GenerationConfig::default())
        .unwrap();

    let mut observed = Vec::new();
    loop {
        let state = runtime.status(&project).unwrap();
        observed.push(state.percent);
        if state.is_terminal() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    assert!(observed.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*observed.last().unwrap(), 100);
}

#[tokio::test]
async fn overlapping_runs_resolve_to_the_latest() {
    let runtime = runtime_with(StageRegistry::builtin());
    let project = ProjectId::new("course-101").unwrap();

    let first = runtime
        .start(&project, GenerationConfig::default())
        .unwrap();
    let second = runtime
        .start(&project, GenerationConfig::default())
        .unwrap();
    assert!(second > first);

    let state = wait_terminal(&runtime, &project).await;
    assert_eq!(state.run, second);
    assert_eq!(state.status, RunStatus::Complete);
    assert!(state.history.len() <= 5);
}
