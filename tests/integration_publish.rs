// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end publish tests.
//!
//! The hosted API is a wiremock server; the "hosted" clone URL points at a
//! local bare repository so pushes really happen.
//!
//! Covers:
//! - New repository: init, commit, create, attach, push
//! - Existing repository without confirmation (nothing changes)
//! - Confirmed force push replacing remote history
//! - Confirmation bound to a different repository
//! - Name taken between lookup and create
//! - Skip-push
//! - `--force-existing` re-run and the menu's overwrite prompt
//! - Token handling

use repo_setup::cmd::menu::Menu;
use repo_setup::cmd::publish::publish_or_overwrite;
use repo_setup::config::Config;
use repo_setup::git::backend::{GitCli, LocalVcs};
use repo_setup::hosted::HostedClient;
use repo_setup::orchestrator::Orchestrator;
use repo_setup::orchestrator::outcome::{OutcomeKind, PublishReport};
use repo_setup::orchestrator::target::{
    Credentials, PublishOptions, RepositoryTarget, Visibility,
};
use repo_setup::worker::{Dispatcher, Operation, OperationResult};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "ghp_test";

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn write_gitconfig(home: &Path) -> std::path::PathBuf {
    let global = home.join("gitconfig");
    fs::write(
        &global,
        "[init]\n\tdefaultBranch = main\n[user]\n\tname = Test\n\temail = test@example.com\n",
    )
    .expect("failed to write gitconfig");
    global
}

fn isolated_git(home: &Path) -> GitCli {
    GitCli::default()
        .env("GIT_CONFIG_GLOBAL", write_gitconfig(home))
        .env("GIT_CONFIG_NOSYSTEM", "1")
}

/// Run raw git for setup and inspection.
fn git(home: &Path, cwd: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_CONFIG_GLOBAL", write_gitconfig(home))
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn bare_repo(home: &Path) -> TempDir {
    let bare = temp_dir();
    git(home, bare.path(), &["init", "--bare", "--quiet"]);
    bare
}

fn orchestrator(home: &Path, server: &MockServer) -> Orchestrator {
    Orchestrator::new(
        isolated_git(home),
        HostedClient::new(&server.uri(), Duration::from_secs(5)),
        &Config::default(),
    )
}

fn target(folder: &Path, name: &str, visibility: Visibility) -> RepositoryTarget {
    RepositoryTarget::builder()
        .local_path(folder)
        .repo_name(name)
        .visibility(visibility)
        .build()
        .expect("valid target")
}

fn repo_json(name: &str, clone_url: &Path) -> serde_json::Value {
    json!({
        "name": name,
        "full_name": format!("octo/{name}"),
        "clone_url": clone_url.display().to_string(),
        "ssh_url": format!("git@github.com:octo/{name}.git"),
        "html_url": format!("https://github.com/octo/{name}"),
        "private": false,
        "description": null,
        "default_branch": "main"
    })
}

async fn mount_user(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("Authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "octo",
            "name": null
        })))
        .mount(server)
        .await;
}

async fn mount_existing(server: &MockServer, name: &str, clone_url: &Path) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/octo/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_json(name, clone_url)))
        .mount(server)
        .await;
}

async fn forbid_create(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

/// Push unrelated history to `bare` and return its head.
fn seed_history(home: &Path, bare: &Path) -> String {
    let seed = temp_dir();
    let bare_path = bare.display().to_string();
    git(home, seed.path(), &["init", "--quiet"]);
    fs::write(seed.path().join("old.txt"), "old").unwrap();
    git(home, seed.path(), &["add", "--all"]);
    git(home, seed.path(), &["commit", "--quiet", "-m", "Old history"]);
    git(home, seed.path(), &["push", "--quiet", &bare_path, "HEAD:refs/heads/main"]);
    git(home, bare, &["rev-parse", "refs/heads/main"])
}

fn kinds(report: &PublishReport) -> Vec<OutcomeKind> {
    report.steps.iter().map(|s| s.kind).collect()
}

// =============================================================================
// New repository
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_publish_new_repository_through_dispatcher() {
    let home = temp_dir();
    let work = temp_dir();
    let bare = bare_repo(home.path());
    fs::write(work.path().join("README.md"), "# demo\n").unwrap();

    let server = MockServer::start().await;
    mount_user(&server).await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .and(body_partial_json(json!({
            "name": "demo",
            "private": true,
            "description": "Demo site",
            "auto_init": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(repo_json("demo", bare.path())))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = Dispatcher::new(orchestrator(home.path(), &server)).unwrap();
    let target = RepositoryTarget::builder()
        .local_path(work.path())
        .repo_name("demo")
        .visibility(Visibility::Private)
        .description("Demo site")
        .build()
        .unwrap();
    let op = Operation::Publish {
        target,
        options: PublishOptions::default(),
        credentials: Credentials::with_token(TOKEN),
    };
    let result = dispatcher
        .submit(work.path(), op)
        .unwrap()
        .recv_async()
        .await
        .unwrap();

    let OperationResult::Published(report) = result else {
        panic!("expected a publish report, got {result:?}");
    };
    assert!(report.succeeded(), "{report:?}");
    assert_eq!(
        kinds(&report),
        [
            OutcomeKind::Initialized,
            OutcomeKind::Committed,
            OutcomeKind::RemoteCreated,
            OutcomeKind::Pushed
        ]
    );
    assert_eq!(report.web_url.as_deref(), Some("https://github.com/octo/demo"));
    assert!(report.existing_remote.is_none());

    let local_head = git(home.path(), work.path(), &["rev-parse", "HEAD"]);
    let remote_head = git(home.path(), bare.path(), &["rev-parse", "refs/heads/main"]);
    assert_eq!(local_head, remote_head);
    assert_eq!(
        git(home.path(), work.path(), &["rev-parse", "--abbrev-ref", "@{upstream}"]),
        "origin/main"
    );

    dispatcher.shutdown().await;
}

#[tokio::test]
async fn test_publish_empty_folder() {
    let home = temp_dir();
    let work = temp_dir();
    let bare = bare_repo(home.path());

    let server = MockServer::start().await;
    mount_user(&server).await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/empty"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(repo_json("empty", bare.path())))
        .expect(1)
        .mount(&server)
        .await;

    let report = orchestrator(home.path(), &server)
        .publish(
            &target(work.path(), "empty", Visibility::Public),
            &PublishOptions::default(),
            &Credentials::with_token(TOKEN),
        )
        .await;

    assert!(report.succeeded(), "{report:?}");
    assert_eq!(
        kinds(&report),
        [
            OutcomeKind::Initialized,
            OutcomeKind::NoOpNoChanges,
            OutcomeKind::RemoteCreated,
            OutcomeKind::Pushed
        ]
    );
    assert_eq!(
        report.steps.last().unwrap().message,
        "nothing to send: no commits yet"
    );
    assert_eq!(report.web_url.as_deref(), Some("https://github.com/octo/empty"));
}

#[tokio::test]
async fn test_publish_skip_push_attaches_remote_only() {
    let home = temp_dir();
    let work = temp_dir();
    let bare = bare_repo(home.path());
    fs::write(work.path().join("main.rs"), "fn main() {}\n").unwrap();

    let server = MockServer::start().await;
    mount_user(&server).await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(repo_json("demo", bare.path())))
        .mount(&server)
        .await;

    let orchestrator = orchestrator(home.path(), &server);
    let options = PublishOptions {
        push: false,
        ..PublishOptions::default()
    };
    let report = orchestrator
        .publish(
            &target(work.path(), "demo", Visibility::Public),
            &options,
            &Credentials::with_token(TOKEN),
        )
        .await;

    assert!(report.succeeded(), "{report:?}");
    assert_eq!(
        kinds(&report),
        [
            OutcomeKind::Initialized,
            OutcomeKind::Committed,
            OutcomeKind::RemoteCreated
        ]
    );
    let remote = orchestrator.vcs().remote_url(work.path(), "origin").unwrap();
    assert_eq!(remote.as_deref(), bare.path().to_str());
    assert_eq!(git(home.path(), bare.path(), &["for-each-ref"]), "");
}

// =============================================================================
// Existing repository
// =============================================================================

#[tokio::test]
async fn test_existing_repository_without_confirmation_changes_nothing() {
    let home = temp_dir();
    let work = temp_dir();
    let bare = bare_repo(home.path());
    fs::write(work.path().join("a.txt"), "a").unwrap();

    let server = MockServer::start().await;
    mount_user(&server).await;
    mount_existing(&server, "demo", bare.path()).await;
    forbid_create(&server).await;

    let orchestrator = orchestrator(home.path(), &server);
    let report = orchestrator
        .publish(
            &target(work.path(), "demo", Visibility::Public),
            &PublishOptions::default(),
            &Credentials::with_token(TOKEN),
        )
        .await;

    assert!(!report.succeeded());
    assert!(report.is_conflict());
    assert_eq!(
        kinds(&report),
        [
            OutcomeKind::Initialized,
            OutcomeKind::Committed,
            OutcomeKind::Conflict
        ]
    );
    let conflict = report.steps.last().unwrap();
    insta::assert_snapshot!(conflict.to_string(), @"[!!] conflict: octo/demo already exists; confirm to overwrite its history with a force push");

    assert_eq!(
        report.existing_remote.as_ref().map(|r| r.full_name.as_str()),
        Some("octo/demo")
    );
    assert!(report.web_url.is_none());
    assert_eq!(orchestrator.vcs().remote_url(work.path(), "origin").unwrap(), None);
    assert_eq!(git(home.path(), bare.path(), &["for-each-ref"]), "");
}

#[tokio::test]
async fn test_confirmed_force_push_replaces_remote_history() {
    let home = temp_dir();
    let work = temp_dir();
    let bare = bare_repo(home.path());
    let old_head = seed_history(home.path(), bare.path());

    fs::write(work.path().join("new.txt"), "new").unwrap();

    let server = MockServer::start().await;
    mount_user(&server).await;
    mount_existing(&server, "demo", bare.path()).await;
    forbid_create(&server).await;

    let orchestrator = orchestrator(home.path(), &server);
    let target = target(work.path(), "demo", Visibility::Public);
    let credentials = Credentials::with_token(TOKEN);

    let first = orchestrator
        .publish(&target, &PublishOptions::default(), &credentials)
        .await;
    let confirmation = first
        .confirm_force_push()
        .expect("a conflict yields a confirmation");
    assert_eq!(confirmation.full_name(), "octo/demo");

    let options = PublishOptions {
        confirmation: Some(confirmation),
        ..PublishOptions::default()
    };
    let second = orchestrator.publish(&target, &options, &credentials).await;

    assert!(second.succeeded(), "{second:?}");
    let pushed = second.steps.last().unwrap();
    assert_eq!(pushed.kind, OutcomeKind::Pushed);
    assert_eq!(pushed.message, "force-pushed local history to origin");
    assert_eq!(second.web_url.as_deref(), Some("https://github.com/octo/demo"));
    assert!(second.confirm_force_push().is_none());

    let new_head = git(home.path(), bare.path(), &["rev-parse", "refs/heads/main"]);
    assert_ne!(new_head, old_head);
    assert_eq!(new_head, git(home.path(), work.path(), &["rev-parse", "HEAD"]));
}

#[tokio::test]
async fn test_confirmation_for_another_repository_is_refused() {
    let home = temp_dir();
    let work = temp_dir();
    let other = temp_dir();
    let bare = bare_repo(home.path());
    fs::write(work.path().join("a.txt"), "a").unwrap();
    fs::write(other.path().join("b.txt"), "b").unwrap();

    let server = MockServer::start().await;
    mount_user(&server).await;
    mount_existing(&server, "demo", bare.path()).await;
    mount_existing(&server, "other", bare.path()).await;
    forbid_create(&server).await;

    let orchestrator = orchestrator(home.path(), &server);
    let credentials = Credentials::with_token(TOKEN);

    let other_report = orchestrator
        .publish(
            &target(other.path(), "other", Visibility::Public),
            &PublishOptions::default(),
            &credentials,
        )
        .await;
    let wrong = other_report.confirm_force_push().unwrap();

    let options = PublishOptions {
        confirmation: Some(wrong),
        ..PublishOptions::default()
    };
    let report = orchestrator
        .publish(&target(work.path(), "demo", Visibility::Public), &options, &credentials)
        .await;

    assert!(report.is_conflict());
    assert_eq!(
        report.steps.last().unwrap().message,
        "octo/demo already exists; the confirmation given is for octo/other"
    );
    assert_eq!(git(home.path(), bare.path(), &["for-each-ref"]), "");
}

#[tokio::test]
async fn test_name_taken_at_create_time_is_a_resolvable_conflict() {
    let home = temp_dir();
    let work = temp_dir();
    let bare = bare_repo(home.path());
    let old_head = seed_history(home.path(), bare.path());
    fs::write(work.path().join("a.txt"), "a").unwrap();

    let server = MockServer::start().await;
    mount_user(&server).await;
    // absent at lookup, created by someone else before our create
    Mock::given(method("GET"))
        .and(path("/repos/octo/demo"))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_existing(&server, "demo", bare.path()).await;
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Repository creation failed.",
            "errors": [{"resource": "Repository", "field": "name",
                        "message": "name already exists on this account"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let orchestrator = orchestrator(home.path(), &server);
    let target = target(work.path(), "demo", Visibility::Public);
    let credentials = Credentials::with_token(TOKEN);
    let first = orchestrator
        .publish(&target, &PublishOptions::default(), &credentials)
        .await;

    assert!(first.is_conflict());
    assert_eq!(
        kinds(&first),
        [
            OutcomeKind::Initialized,
            OutcomeKind::Committed,
            OutcomeKind::Conflict
        ]
    );
    assert_eq!(
        first.existing_remote.as_ref().map(|r| r.full_name.as_str()),
        Some("octo/demo")
    );
    assert_eq!(orchestrator.vcs().remote_url(work.path(), "origin").unwrap(), None);
    assert_eq!(git(home.path(), bare.path(), &["rev-parse", "refs/heads/main"]), old_head);

    let confirmation = first
        .confirm_force_push()
        .expect("the conflict names the repository");
    let options = PublishOptions {
        confirmation: Some(confirmation),
        ..PublishOptions::default()
    };
    let second = orchestrator.publish(&target, &options, &credentials).await;
    assert!(second.succeeded(), "{second:?}");
    assert_eq!(
        git(home.path(), bare.path(), &["rev-parse", "refs/heads/main"]),
        git(home.path(), work.path(), &["rev-parse", "HEAD"])
    );
}

// =============================================================================
// Front ends
// =============================================================================

/// Server where `octo/demo` exists and points at `bare`.
async fn existing_demo(bare: &Path) -> MockServer {
    let server = MockServer::start().await;
    mount_user(&server).await;
    mount_existing(&server, "demo", bare).await;
    forbid_create(&server).await;
    server
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_force_existing_publishes_again_with_confirmation() {
    let home = temp_dir();
    let work = temp_dir();
    let bare = bare_repo(home.path());
    let old_head = seed_history(home.path(), bare.path());
    fs::write(work.path().join("new.txt"), "new").unwrap();

    let server = existing_demo(bare.path()).await;
    let dispatcher = Dispatcher::new(orchestrator(home.path(), &server)).unwrap();
    let mut out = Vec::new();
    let report = publish_or_overwrite(
        &dispatcher,
        &target(work.path(), "demo", Visibility::Public),
        PublishOptions::default(),
        &Credentials::with_token(TOKEN),
        true,
        &mut out,
    )
    .await
    .unwrap();

    assert!(report.succeeded(), "{report:?}");
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("[!!] conflict: octo/demo already exists"), "{text}");
    assert!(text.contains("force-pushed local history to origin"), "{text}");

    let new_head = git(home.path(), bare.path(), &["rev-parse", "refs/heads/main"]);
    assert_ne!(new_head, old_head);
    assert_eq!(new_head, git(home.path(), work.path(), &["rev-parse", "HEAD"]));
    dispatcher.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_existing_repository_needs_force_existing() {
    let home = temp_dir();
    let work = temp_dir();
    let bare = bare_repo(home.path());
    let old_head = seed_history(home.path(), bare.path());
    fs::write(work.path().join("new.txt"), "new").unwrap();

    let server = existing_demo(bare.path()).await;
    let dispatcher = Dispatcher::new(orchestrator(home.path(), &server)).unwrap();
    let mut out = Vec::new();
    let err = publish_or_overwrite(
        &dispatcher,
        &target(work.path(), "demo", Visibility::Public),
        PublishOptions::default(),
        &Credentials::with_token(TOKEN),
        false,
        &mut out,
    )
    .await
    .unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"octo/demo already exists; rerun with --force-existing to overwrite its history");
    assert!(String::from_utf8(out).unwrap().contains("[!!] conflict:"));
    assert_eq!(git(home.path(), bare.path(), &["rev-parse", "refs/heads/main"]), old_head);
    dispatcher.shutdown().await;
}

/// Run a scripted menu session publishing `work` as `octo/demo`, answering
/// the overwrite prompt with `answer`.
async fn menu_publish(home: &Path, work: &Path, server: &MockServer, answer: &str) -> String {
    let dispatcher = Dispatcher::new(orchestrator(home, server)).unwrap();
    // name, private (default), description (none), overwrite answer
    let script = format!("4\ndemo\n\n\n{answer}\nq\n");
    let mut menu = Menu::new(&dispatcher, script.as_bytes(), Vec::new(), work.to_path_buf())
        .with_credentials(Credentials::with_token(TOKEN));
    menu.run().await.unwrap();
    let out = String::from_utf8(menu.into_output()).unwrap();
    dispatcher.shutdown().await;
    out
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_menu_wrong_name_cancels_overwrite() {
    let home = temp_dir();
    let work = temp_dir();
    let bare = bare_repo(home.path());
    let old_head = seed_history(home.path(), bare.path());
    fs::write(work.path().join("new.txt"), "new").unwrap();

    let server = existing_demo(bare.path()).await;
    let out = menu_publish(home.path(), work.path(), &server, "octo/other").await;

    assert!(
        out.contains("Type octo/demo to overwrite its history, anything else cancels: "),
        "{out}"
    );
    assert!(out.contains("Cancelled; nothing was changed"), "{out}");
    assert!(!out.contains("force-pushed"), "{out}");
    assert_eq!(git(home.path(), bare.path(), &["rev-parse", "refs/heads/main"]), old_head);
    assert_eq!(
        isolated_git(home.path()).remote_url(work.path(), "origin").unwrap(),
        None
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_menu_typed_name_overwrites_history() {
    let home = temp_dir();
    let work = temp_dir();
    let bare = bare_repo(home.path());
    let old_head = seed_history(home.path(), bare.path());
    fs::write(work.path().join("new.txt"), "new").unwrap();

    let server = existing_demo(bare.path()).await;
    let out = menu_publish(home.path(), work.path(), &server, "octo/demo").await;

    assert!(!out.contains("Cancelled"), "{out}");
    assert!(out.contains("force-pushed local history to origin"), "{out}");
    assert!(out.contains("Repository:  https://github.com/octo/demo"), "{out}");
    let new_head = git(home.path(), bare.path(), &["rev-parse", "refs/heads/main"]);
    assert_ne!(new_head, old_head);
    assert_eq!(new_head, git(home.path(), work.path(), &["rev-parse", "HEAD"]));
}

// =============================================================================
// Tokens
// =============================================================================

#[tokio::test]
async fn test_publish_without_token_stops_before_the_api() {
    let home = temp_dir();
    let work = temp_dir();
    fs::write(work.path().join("a.txt"), "a").unwrap();

    let server = MockServer::start().await;
    let orchestrator = orchestrator(home.path(), &server);
    let report = orchestrator
        .publish(
            &target(work.path(), "demo", Visibility::Public),
            &PublishOptions::default(),
            &Credentials::default(),
        )
        .await;

    assert_eq!(
        kinds(&report),
        [
            OutcomeKind::Initialized,
            OutcomeKind::Committed,
            OutcomeKind::AuthFailure
        ]
    );
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_rejected_token_leaves_credentials_untouched() {
    let home = temp_dir();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
        .mount(&server)
        .await;

    let orchestrator = orchestrator(home.path(), &server);
    let mut credentials = Credentials::with_token("old-token");
    let outcome = orchestrator
        .configure_hosted_token(&mut credentials, "bad-token")
        .await;

    assert!(!outcome.succeeded);
    assert_eq!(outcome.kind, OutcomeKind::AuthFailure);
    assert_eq!(outcome.raw_detail.as_deref(), Some("Bad credentials"));
    assert_eq!(credentials.token(), Some("old-token"));
}

#[tokio::test]
async fn test_accepted_token_is_stored() {
    let home = temp_dir();
    let server = MockServer::start().await;
    mount_user(&server).await;

    let orchestrator = orchestrator(home.path(), &server);
    let mut credentials = Credentials::default();
    let outcome = orchestrator
        .configure_hosted_token(&mut credentials, TOKEN)
        .await;

    assert!(outcome.succeeded, "{outcome:?}");
    assert_eq!(outcome.message, "authenticated as octo");
    assert_eq!(credentials.token(), Some(TOKEN));
}
