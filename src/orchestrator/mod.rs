// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository setup orchestration.
//!
//! ```text
//! publish(target, options, credentials)
//!   |
//!   +-- ensure_initialized ------ abort on failure
//!   +-- stage_and_commit -------- NoOpNoChanges is fine
//!   +-- GET /user, GET /repos/{login}/{name}
//!         |
//!         +-- absent:  create --> attach remote --> push -u
//!         |            (422 "already exists": re-read, handle as present)
//!         |
//!         +-- present: no confirmation --> Conflict (nothing touched)
//!                      confirmation    --> attach remote --> push --force
//! ```
//!
//! Every operation returns a structured outcome; nothing is retried.

pub mod outcome;
pub mod target;


use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::{GitError, HostedError, SetupError, SetupResult};
use crate::git::backend::{GitCli, LocalVcs, PushMode};
use crate::git::remote::locate_on_host;
use crate::git::status::{StatusEntry, VcsState};
use crate::hosted::HostedClient;
use crate::hosted::types::{NewRepository, RecentActivity, RemoteRepository};

use outcome::{OperationOutcome, OutcomeKind, PublishReport};
use target::{Credentials, HostedToken, PublishOptions, RepositoryTarget, VcsIdentity};

/// State snapshot plus the itemized changes behind `is_dirty`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub state: VcsState,
    pub upstream: Option<String>,
    pub entries: Vec<StatusEntry>,
}

/// Result of [`Orchestrator::ensure_initialized`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitReport {
    pub outcome: OperationOutcome,
    pub state: Option<VcsState>,
}

/// Settings the orchestrator reads from [`Config`].
#[derive(Debug, Clone)]
struct Settings {
    remote_name: String,
    web_host: String,
    initial_message: String,
    update_message: String,
}

/// Drives the local and hosted gateways.
pub struct Orchestrator<V: LocalVcs = GitCli> {
    vcs: V,
    hosted: HostedClient,
    settings: Settings,
}

impl<V: LocalVcs> Orchestrator<V> {
    #[must_use]
    pub fn new(vcs: V, hosted: HostedClient, config: &Config) -> Self {
        Self {
            vcs,
            hosted,
            settings: Settings {
                remote_name: config.publish.remote_name.clone(),
                web_host: config.hosted.web_host.clone(),
                initial_message: config.publish.initial_commit_message.clone(),
                update_message: config.publish.update_commit_message.clone(),
            },
        }
    }

    #[must_use]
    pub const fn vcs(&self) -> &V {
        &self.vcs
    }

    #[must_use]
    pub fn remote_name(&self) -> &str {
        &self.settings.remote_name
    }

    // --- Local operations ---

    /// Make `path` a repository if it is not one already. Idempotent.
    ///
    /// The report carries the state read after the step, `None` on failure.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn ensure_initialized(&self, path: &Path) -> InitReport {
        let result = require_dir(path).and_then(|()| {
            let message = if self.vcs.is_work_tree(path) {
                debug!("already a repository");
                format!("{} is already a repository", path.display())
            } else {
                self.vcs.init(path)?;
                info!("initialized repository");
                format!("initialized empty repository in {}", path.display())
            };
            let state = self.query_status(path)?.state;
            Ok(InitReport {
                outcome: OperationOutcome::success(OutcomeKind::Initialized, message),
                state: Some(state),
            })
        });
        result.unwrap_or_else(|e| InitReport {
            outcome: failed(&e),
            state: None,
        })
    }

    /// Stage everything and commit. `NoOpNoChanges` when nothing is staged.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn stage_and_commit(&self, path: &Path, message: Option<&str>) -> OperationOutcome {
        let result = require_dir(path).and_then(|()| {
            self.vcs.add_all(path)?;
            let status = self.vcs.status(path)?;
            if !status.is_dirty() {
                debug!("nothing to commit");
                return Ok(OperationOutcome::success(
                    OutcomeKind::NoOpNoChanges,
                    "nothing to commit, working tree clean",
                ));
            }

            let message = message
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(if status.branch.unborn {
                    self.settings.initial_message.as_str()
                } else {
                    self.settings.update_message.as_str()
                });
            let id = self.vcs.commit(path, message)?;
            info!(commit = %id, files = status.entries.len(), "committed");
            Ok(OperationOutcome::success(
                OutcomeKind::Committed,
                format!("{id} {message}"),
            ))
        });
        result.unwrap_or_else(|e| failed(&e))
    }

    /// Push the current branch, setting upstream on the first push.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn sync_push(&self, path: &Path) -> OperationOutcome {
        let result = require_dir(path).and_then(|()| {
            self.require_remote(path)?;
            let status = self.vcs.status(path)?;
            self.push_step(path, status.branch.unborn, status.branch.upstream.is_none(), false)
        });
        result.unwrap_or_else(|e| failed(&e))
    }

    /// Merge the remote counterpart of the current branch.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn sync_pull(&self, path: &Path) -> OperationOutcome {
        let result = require_dir(path).and_then(|()| {
            self.require_remote(path)?;
            let branch = self.vcs.current_branch(path)?.ok_or_else(|| {
                crate::error::bail_out("HEAD is detached; check out a branch before pulling")
            })?;
            let output = self.vcs.pull(path, &self.settings.remote_name, &branch)?;
            info!(%branch, "pulled");
            Ok(OperationOutcome::success(
                OutcomeKind::Pulled,
                format!("pulled {}/{branch}", self.settings.remote_name),
            )
            .with_detail(output.combined()))
        });
        result.unwrap_or_else(|e| failed(&e))
    }

    /// Read-only snapshot. A folder that is not a repository is reported as
    /// uninitialized, not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not a directory or git fails.
    pub fn query_status(&self, path: &Path) -> SetupResult<StatusReport> {
        require_dir(path)?;
        if !self.vcs.is_work_tree(path) {
            return Ok(StatusReport {
                state: VcsState::uninitialized(),
                ..StatusReport::default()
            });
        }

        let porcelain = self.vcs.status(path)?;
        let remote_url = self.vcs.remote_url(path, &self.settings.remote_name)?;
        let state = VcsState {
            initialized: true,
            current_branch: self.vcs.current_branch(path)?,
            has_remote: remote_url.is_some(),
            remote_url,
            is_dirty: porcelain.is_dirty(),
            ahead_count: porcelain.branch.ahead,
            behind_count: porcelain.branch.behind,
            last_commit: self.vcs.last_commit(path)?,
        };
        Ok(StatusReport {
            state,
            upstream: porcelain.branch.upstream,
            entries: porcelain.entries,
        })
    }

    /// Browser URL for the configured remote.
    ///
    /// # Errors
    ///
    /// Returns `GitError::NoRemote` if no remote is configured and
    /// `GitError::UnrecognizedHost` if it points elsewhere.
    pub fn resolve_remote_web_url(&self, path: &Path) -> SetupResult<String> {
        require_dir(path)?;
        let url = self.require_remote(path)?;
        Ok(locate_on_host(&url, &self.settings.web_host)?.web_url())
    }

    /// Write `user.name` / `user.email` to git's global config and record the
    /// identity in `credentials`.
    #[instrument(skip_all, fields(%username))]
    pub fn configure_vcs_identity(
        &self,
        credentials: &mut Credentials,
        username: &str,
        email: &str,
    ) -> OperationOutcome {
        let (username, email) = (username.trim(), email.trim());
        if username.is_empty() || email.is_empty() {
            return OperationOutcome::failure(
                OutcomeKind::ExternalToolError(outcome::ToolFailure::Failed),
                "username and email must not be empty",
            );
        }

        let result = self
            .vcs
            .set_global_config("user.name", username)
            .and_then(|()| self.vcs.set_global_config("user.email", email));
        match result {
            Ok(()) => {
                credentials.vcs_identity = Some(VcsIdentity {
                    username: username.to_string(),
                    email: email.to_string(),
                });
                info!("git identity configured");
                OperationOutcome::success(
                    OutcomeKind::Configured,
                    format!("git identity set to {username} <{email}>"),
                )
            }
            Err(e) => failed(&e),
        }
    }

    // --- Hosted operations ---

    /// Validate `token` against the identity endpoint and store it on success.
    /// On failure `credentials` is left as it was.
    #[instrument(skip_all)]
    pub async fn configure_hosted_token(
        &self,
        credentials: &mut Credentials,
        token: &str,
    ) -> OperationOutcome {
        let token = token.trim();
        if token.is_empty() {
            return failed(&HostedError::MissingToken.into());
        }
        match self.hosted.authenticated_user(token).await {
            Ok(account) => {
                credentials.hosted_token = Some(HostedToken::new(token));
                info!(login = %account.login, "token accepted");
                OperationOutcome::success(
                    OutcomeKind::Configured,
                    format!("authenticated as {}", account.login),
                )
            }
            Err(e) => {
                warn!(error = %e, "token rejected");
                failed(&e)
            }
        }
    }

    /// Publish a folder as a hosted repository. See the module docs for the
    /// sequence.
    #[instrument(skip_all, fields(path = %target.local_path().display(), repo = target.repo_name()))]
    pub async fn publish(
        &self,
        target: &RepositoryTarget,
        options: &PublishOptions,
        credentials: &Credentials,
    ) -> PublishReport {
        let path = target.local_path();
        let mut report = PublishReport::default();

        if !report.push(self.ensure_initialized(path).outcome) {
            return report;
        }
        if !report.push(self.stage_and_commit(path, options.message.as_deref())) {
            return report;
        }

        let Some(token) = credentials.token() else {
            report.push(failed(&HostedError::MissingToken.into()));
            return report;
        };
        let account = match self.hosted.authenticated_user(token).await {
            Ok(account) => account,
            Err(e) => {
                report.push(failed(&e));
                return report;
            }
        };

        let existing = match self
            .hosted
            .repository(token, &account.login, target.repo_name())
            .await
        {
            Ok(existing) => existing,
            Err(e) => {
                report.push(failed(&e));
                return report;
            }
        };

        match existing {
            None => {
                self.publish_new(target, options, token, &account.login, &mut report)
                    .await;
            }
            Some(repo) => self.publish_existing(path, options, repo, &mut report),
        }
        report
    }

    async fn publish_new(
        &self,
        target: &RepositoryTarget,
        options: &PublishOptions,
        token: &str,
        login: &str,
        report: &mut PublishReport,
    ) {
        let new = NewRepository {
            name: target.repo_name(),
            private: target.visibility().is_private(),
            description: target.description(),
            auto_init: false,
        };
        let repo = match self.hosted.create_repository(token, &new).await {
            Ok(repo) => repo,
            Err(e) if is_already_exists(&e) => {
                // created elsewhere since the lookup
                warn!(repo = target.repo_name(), "name taken at create time");
                match self.hosted.repository(token, login, target.repo_name()).await {
                    Ok(Some(repo)) => {
                        self.publish_existing(target.local_path(), options, repo, report);
                    }
                    Ok(None) => {
                        report.push(failed(&e));
                    }
                    Err(lookup) => {
                        report.push(failed(&lookup));
                    }
                }
                return;
            }
            Err(e) => {
                report.push(failed(&e));
                return;
            }
        };
        info!(repo = %repo.full_name, "created hosted repository");
        report.push(OperationOutcome::success(
            OutcomeKind::RemoteCreated,
            format!("created {} ({})", repo.full_name, repo.html_url),
        ));

        let path = target.local_path();
        let pushed = self.attach_and_push(path, &repo, options.push, false, report);
        if pushed {
            report.web_url = Some(repo.html_url);
        }
    }

    fn publish_existing(
        &self,
        path: &Path,
        options: &PublishOptions,
        repo: RemoteRepository,
        report: &mut PublishReport,
    ) {
        let confirmed = options
            .confirmation
            .as_ref()
            .is_some_and(|c| c.authorizes(&repo));

        if !confirmed {
            let message = match &options.confirmation {
                Some(other) => format!(
                    "{} already exists; the confirmation given is for {}",
                    repo.full_name,
                    other.full_name()
                ),
                None => format!(
                    "{} already exists; confirm to overwrite its history with a force push",
                    repo.full_name
                ),
            };
            warn!(repo = %repo.full_name, "hosted repository already exists");
            report.push(OperationOutcome::failure(OutcomeKind::Conflict, message));
            report.existing_remote = Some(repo);
            return;
        }

        warn!(repo = %repo.full_name, "overwriting existing hosted repository");
        if self.attach_and_push(path, &repo, options.push, true, report) {
            report.web_url = Some(repo.html_url.clone());
        }
        report.existing_remote = Some(repo);
    }

    /// Point the remote at `repo` and push unless skipped. Returns whether all
    /// recorded steps succeeded.
    fn attach_and_push(
        &self,
        path: &Path,
        repo: &RemoteRepository,
        push: bool,
        force: bool,
        report: &mut PublishReport,
    ) -> bool {
        if let Err(e) = self.attach_remote(path, &repo.clone_url) {
            return report.push(failed(&e));
        }
        if !push {
            debug!("push skipped");
            return true;
        }
        let step = self
            .vcs
            .last_commit(path)
            .and_then(|head| self.push_step(path, head.is_none(), true, force))
            .unwrap_or_else(|e| failed(&e));
        report.push(step)
    }

    fn attach_remote(&self, path: &Path, url: &str) -> SetupResult<()> {
        let name = &self.settings.remote_name;
        match self.vcs.remote_url(path, name)? {
            Some(current) if current == url => Ok(()),
            Some(_) => self.vcs.set_remote_url(path, name, url),
            None => self.vcs.add_remote(path, name, url),
        }
    }

    fn push_step(
        &self,
        path: &Path,
        unborn: bool,
        set_upstream: bool,
        force: bool,
    ) -> SetupResult<OperationOutcome> {
        let remote = &self.settings.remote_name;
        if unborn {
            return Ok(OperationOutcome::success(
                OutcomeKind::Pushed,
                "nothing to send: no commits yet",
            ));
        }
        let output = self
            .vcs
            .push(path, remote, PushMode { set_upstream, force })?;
        info!(%remote, force, "pushed");
        let message = if force {
            format!("force-pushed local history to {remote}")
        } else {
            format!("pushed to {remote}")
        };
        Ok(OperationOutcome::success(OutcomeKind::Pushed, message).with_detail(output.combined()))
    }

    fn require_remote(&self, path: &Path) -> SetupResult<String> {
        self.vcs
            .remote_url(path, &self.settings.remote_name)?
            .ok_or_else(|| {
                GitError::NoRemote {
                    path: path.display().to_string(),
                    remote: self.settings.remote_name.clone(),
                }
                .into()
            })
    }

    /// Recent commits, open pull requests and open issues of the repository
    /// behind the configured remote.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no token or remote, the remote is on
    /// another host, or any listing fails.
    pub async fn recent_activity(
        &self,
        path: &Path,
        credentials: &Credentials,
        limit: u8,
    ) -> SetupResult<RecentActivity> {
        require_dir(path)?;
        let token = credentials.token().ok_or(HostedError::MissingToken)?;
        let url = self.require_remote(path)?;
        let location = locate_on_host(&url, &self.settings.web_host)?;
        debug!(repo = %location.full_name(), limit, "fetching recent activity");
        self.hosted.recent_activity(token, &location, limit).await
    }
}

fn require_dir(path: &Path) -> SetupResult<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(GitError::NotADirectory {
            path: path.display().to_string(),
        }
        .into())
    }
}

fn is_already_exists(err: &SetupError) -> bool {
    matches!(err, SetupError::Hosted(hosted) if matches!(**hosted, HostedError::AlreadyExists { .. }))
}

fn failed(err: &SetupError) -> OperationOutcome {
    debug!(error = %err, "step failed");
    OperationOutcome::from_error(err)
}
