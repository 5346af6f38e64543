// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{DispatchError, Dispatcher, Operation, OperationResult};
use crate::config::Config;
use crate::git::backend::GitCli;
use crate::hosted::HostedClient;
use crate::orchestrator::Orchestrator;
use crate::orchestrator::outcome::OutcomeKind;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn dispatcher(home: &Path) -> Dispatcher {
    let global = home.join("gitconfig");
    fs::write(
        &global,
        "[init]\n\tdefaultBranch = main\n[user]\n\tname = Test\n\temail = test@example.com\n",
    )
    .unwrap();
    let git = GitCli::default()
        .env("GIT_CONFIG_GLOBAL", global)
        .env("GIT_CONFIG_NOSYSTEM", "1");
    let orchestrator = Orchestrator::new(
        git,
        HostedClient::new("http://127.0.0.1:9", Duration::from_secs(1)),
        &Config::default(),
    );
    Dispatcher::new(orchestrator).expect("inside a runtime")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_submit_returns_result() {
    let home = temp_dir();
    let work = temp_dir();
    let dispatcher = dispatcher(home.path());

    let rx = dispatcher
        .submit(work.path(), Operation::Initialize)
        .unwrap();
    let result = rx.recv_async().await.unwrap();
    assert!(result.succeeded());
    assert!(matches!(
        result,
        OperationResult::Step(ref outcome) if outcome.kind == OutcomeKind::Initialized
    ));
    assert!(work.path().join(".git").exists());

    dispatcher.shutdown().await;
    assert!(!dispatcher.is_busy(work.path()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_second_operation_on_same_path_is_refused() {
    let home = temp_dir();
    let work = temp_dir();
    let dispatcher = dispatcher(home.path());

    let guard = dispatcher.claim(work.path()).unwrap();
    assert!(dispatcher.is_busy(work.path()));
    let refused = dispatcher.submit(work.path(), Operation::Status);
    assert!(matches!(refused, Err(DispatchError::Busy { .. })));

    drop(guard);
    assert!(!dispatcher.is_busy(work.path()));
    let rx = dispatcher.submit(work.path(), Operation::Status).unwrap();
    match rx.recv_async().await.unwrap() {
        OperationResult::Status(report) => assert!(!report.state.initialized),
        other => panic!("expected status, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_relative_and_absolute_forms_share_a_slot() {
    let home = temp_dir();
    let dispatcher = dispatcher(home.path());
    let absolute = std::env::current_dir().unwrap().join("site-in-flight");

    let guard = dispatcher.claim(&absolute).unwrap();
    assert!(dispatcher.is_busy(Path::new("site-in-flight")));
    let refused = dispatcher.submit("site-in-flight", Operation::Status);
    assert!(matches!(refused, Err(DispatchError::Busy { .. })));
    let dotted = dispatcher.submit("./site-in-flight", Operation::Status);
    assert!(matches!(dotted, Err(DispatchError::Busy { .. })));

    drop(guard);
    assert!(!dispatcher.is_busy(Path::new("site-in-flight")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_distinct_paths_run_side_by_side() {
    let home = temp_dir();
    let first = temp_dir();
    let second = temp_dir();
    let dispatcher = dispatcher(home.path());

    let a = dispatcher.submit(first.path(), Operation::Initialize).unwrap();
    let b = dispatcher.submit(second.path(), Operation::Initialize).unwrap();
    assert!(a.recv_async().await.unwrap().succeeded());
    assert!(b.recv_async().await.unwrap().succeeded());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_query_is_reported() {
    let home = temp_dir();
    let work = temp_dir();
    let dispatcher = dispatcher(home.path());

    let init = dispatcher.submit(work.path(), Operation::Initialize).unwrap();
    init.recv_async().await.unwrap();

    let rx = dispatcher.submit(work.path(), Operation::WebUrl).unwrap();
    let result = rx.recv_async().await.unwrap();
    assert!(!result.succeeded());
    assert!(matches!(result, OperationResult::Failed(_)));
}

#[test]
fn test_new_outside_runtime_fails() {
    let orchestrator = Orchestrator::new(
        GitCli::default(),
        HostedClient::new("http://127.0.0.1:9", Duration::from_secs(1)),
        &Config::default(),
    );
    assert!(matches!(
        Dispatcher::new(orchestrator),
        Err(DispatchError::NoRuntime(_))
    ));
}
