//! Status polling specs

use cg_core::{FakeClock, GenerationConfig, ProjectId, RunStatus};
use cg_engine::{Runtime, StageRegistry};
use cg_storage::DocStore;
use std::time::Duration;

fn runtime() -> Runtime<FakeClock> {
    let store = DocStore::open_temp().unwrap();
    Runtime::with_parts(
        store,
        StageRegistry::builtin(),
        FakeClock::new(),
        Duration::ZERO,
    )
}

#[tokio::test]
async fn never_started_project_reads_as_idle() {
    let runtime = runtime();
    let project = ProjectId::new("never-started").unwrap();

    let state = runtime.status(&project).unwrap();

    assert_eq!(state.status, RunStatus::Idle);
    assert_eq!(state.step, "parsing");
    assert_eq!(state.percent, 0);
    assert!(state.history.is_empty());
}

#[tokio::test]
async fn status_reads_are_stable_after_completion() {
    let runtime = runtime();
    let project = ProjectId::new("demo").unwrap();

    runtime
        .start(&project, GenerationConfig::default())
        .unwrap();

    let mut terminal = None;
    for _ in 0..500 {
        let state = runtime.status(&project).unwrap();
        if state.is_terminal() {
            terminal = Some(state);
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let terminal = terminal.expect("run did not finish");

    // polling after the run is over returns the same snapshot
    let again = runtime.status(&project).unwrap();
    assert_eq!(again, terminal);
}

#[tokio::test]
async fn config_document_is_readable_while_running() {
    let runtime = runtime();
    let project = ProjectId::new("demo").unwrap();
    let config = GenerationConfig {
        auto_images: true,
        quiz_count: 2,
        ..Default::default()
    };

    runtime.start(&project, config.clone()).unwrap();

    // the config was durable before start returned
    let stored = runtime.store().read_config(&project).unwrap().unwrap();
    assert_eq!(stored, config);
}
