//! Daemon protocol specs: a real socket roundtrip plus request handling

use cg_core::{GenerationConfig, ProjectId, RunStatus, SystemClock};
use cg_daemon::lifecycle::{startup_with_runtime, Config, Daemon};
use cg_daemon::protocol::{decode, encode, read_message, write_message, Request, Response};
use cg_daemon::server;
use cg_engine::{Runtime, StageRegistry};
use cg_storage::DocStore;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::UnixStream;

async fn spawn_daemon() -> (std::path::PathBuf, tokio::task::JoinHandle<()>, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = Config::for_root(dir.path().join("data"));
    let store = DocStore::open(config.data_root.clone()).unwrap();
    let runtime = Runtime::with_parts(
        store,
        StageRegistry::builtin(),
        SystemClock,
        Duration::ZERO,
    );
    let mut daemon: Daemon = startup_with_runtime(config, runtime).await.unwrap();
    let socket_path = daemon.config.socket_path.clone();

    let handle = tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = daemon.listener.accept().await else {
                break;
            };
            let _ = server::handle_connection(&mut daemon, stream).await;
            if daemon.shutdown_requested {
                let _ = daemon.shutdown();
                break;
            }
        }
    });

    (socket_path, handle, dir)
}

/// One request/response exchange over a fresh connection
async fn exchange(socket_path: &std::path::Path, request: &Request) -> Response {
    let mut stream = UnixStream::connect(socket_path).await.unwrap();
    write_message(&mut stream, &encode(request).unwrap())
        .await
        .unwrap();
    let raw = read_message(&mut stream).await.unwrap();
    decode(&raw).unwrap()
}

#[tokio::test]
async fn start_and_poll_over_the_wire() {
    let (socket_path, handle, _dir) = spawn_daemon().await;
    let project = ProjectId::new("demo").unwrap();

    assert_eq!(exchange(&socket_path, &Request::Ping).await, Response::Pong);

    let response = exchange(
        &socket_path,
        &Request::Start {
            project_id: project.clone(),
            config: GenerationConfig::default(),
        },
    )
    .await;
    assert_eq!(response, Response::Ok);

    let mut terminal = None;
    for _ in 0..500 {
        let response = exchange(
            &socket_path,
            &Request::JobStatus {
                project_id: project.clone(),
            },
        )
        .await;
        let Response::Job { state } = response else {
            panic!("expected Job response");
        };
        if state.is_terminal() {
            terminal = Some(state);
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let state = terminal.expect("run did not finish");
    assert_eq!(state.status, RunStatus::Complete);
    assert_eq!(state.percent, 100);
    assert_eq!(state.history.len(), 5);

    assert_eq!(
        exchange(&socket_path, &Request::Shutdown).await,
        Response::ShuttingDown
    );
    handle.await.unwrap();
}

#[tokio::test]
async fn project_lifecycle_over_the_wire() {
    let (socket_path, handle, _dir) = spawn_daemon().await;
    let project = ProjectId::new("course-101").unwrap();

    let response = exchange(
        &socket_path,
        &Request::UpdateProject {
            project_id: project.clone(),
            name: Some("Intro course".to_string()),
            status: None,
            description: Some("lecture notes".to_string()),
        },
    )
    .await;
    let Response::Project { meta } = response else {
        panic!("expected Project response");
    };
    assert_eq!(meta.name, "Intro course");
    assert_eq!(meta.description, "lecture notes");

    let Response::Projects { projects } = exchange(&socket_path, &Request::Projects).await else {
        panic!("expected Projects response");
    };
    assert_eq!(projects.len(), 1);

    assert_eq!(
        exchange(
            &socket_path,
            &Request::DeleteProject {
                project_id: project
            }
        )
        .await,
        Response::Ok
    );

    let Response::Projects { projects } = exchange(&socket_path, &Request::Projects).await else {
        panic!("expected Projects response");
    };
    assert!(projects.is_empty());

    assert_eq!(
        exchange(&socket_path, &Request::Shutdown).await,
        Response::ShuttingDown
    );
    handle.await.unwrap();
}
