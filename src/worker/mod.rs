// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Off-thread operation dispatch.
//!
//! ```text
//! front end                      Dispatcher                      runtime
//!    |  submit(path, op)             |                               |
//!    |------------------------------>| path in flight? --> Busy      |
//!    |  <-- flume::Receiver ---------| spawn_blocking_on ----------->| block_on(op)
//!    |                               |                               |   git (blocking)
//!    |  recv / recv_async  <---------+------- OperationResult -------|   http (async)
//! ```
//!
//! Git calls block, so every operation runs on the blocking pool and drives
//! its async parts with `Handle::block_on`. At most one operation per local
//! path is outstanding at a time.

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

use crate::git::backend::{GitCli, LocalVcs};
use crate::hosted::types::RecentActivity;
use crate::orchestrator::outcome::{OperationOutcome, PublishReport};
use crate::orchestrator::target::{Credentials, PublishOptions, RepositoryTarget};
use crate::orchestrator::{Orchestrator, StatusReport};

/// Work a front end can hand to the dispatcher.
#[derive(Debug, Clone)]
pub enum Operation {
    Initialize,
    Commit {
        message: Option<String>,
    },
    Publish {
        target: RepositoryTarget,
        options: PublishOptions,
        credentials: Credentials,
    },
    Push,
    Pull,
    Status,
    WebUrl,
    Activity {
        credentials: Credentials,
        limit: u8,
    },
}

impl Operation {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Commit { .. } => "commit",
            Self::Publish { .. } => "publish",
            Self::Push => "push",
            Self::Pull => "pull",
            Self::Status => "status",
            Self::WebUrl => "web url",
            Self::Activity { .. } => "activity",
        }
    }
}

/// What came back from an [`Operation`].
#[derive(Debug, Clone)]
pub enum OperationResult {
    Step(OperationOutcome),
    Published(PublishReport),
    Status(StatusReport),
    WebUrl(String),
    Activity(RecentActivity),
    /// A query that could not produce its value.
    Failed(OperationOutcome),
}

impl OperationResult {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        match self {
            Self::Step(outcome) => outcome.succeeded,
            Self::Published(report) => report.succeeded(),
            Self::Status(_) | Self::WebUrl(_) | Self::Activity(_) => true,
            Self::Failed(_) => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    /// Another operation on the same folder has not finished.
    #[error("an operation is already running for {path}")]
    Busy { path: String },

    #[error("no async runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// Removes its path from the in-flight set when the operation ends.
struct InFlight {
    paths: Arc<Mutex<HashSet<PathBuf>>>,
    path: PathBuf,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.path);
    }
}

/// Runs orchestrator calls away from the interaction thread.
pub struct Dispatcher<V: LocalVcs + 'static = GitCli> {
    handle: Handle,
    orchestrator: Arc<Orchestrator<V>>,
    in_flight: Arc<Mutex<HashSet<PathBuf>>>,
    tracker: TaskTracker,
}

impl<V: LocalVcs + 'static> Dispatcher<V> {
    /// Bind to the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::NoRuntime` outside a runtime context.
    pub fn new(orchestrator: Orchestrator<V>) -> Result<Self, DispatchError> {
        Ok(Self::with_handle(orchestrator, Handle::try_current()?))
    }

    #[must_use]
    pub fn with_handle(orchestrator: Orchestrator<V>, handle: Handle) -> Self {
        Self {
            handle,
            orchestrator: Arc::new(orchestrator),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            tracker: TaskTracker::new(),
        }
    }

    #[must_use]
    pub fn orchestrator(&self) -> &Orchestrator<V> {
        &self.orchestrator
    }

    #[must_use]
    pub fn is_busy(&self, path: &Path) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&slot_key(path))
    }

    /// Start `op` against `path`. The receiver yields exactly one result.
    ///
    /// Paths are compared after resolving them, so `./site` and its absolute
    /// form share one slot.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Busy` if `path` already has an operation running.
    pub fn submit(
        &self,
        path: impl Into<PathBuf>,
        op: Operation,
    ) -> Result<flume::Receiver<OperationResult>, DispatchError> {
        let path = path.into();
        let guard = self.claim(&path)?;
        let (tx, rx) = flume::bounded(1);
        let orchestrator = Arc::clone(&self.orchestrator);
        let handle = self.handle.clone();

        debug!(path = %path.display(), op = op.name(), "dispatching");
        self.tracker.spawn_blocking_on(
            move || {
                let result = handle.block_on(execute(&orchestrator, &path, op));
                // release the path before the caller can observe the result
                drop(guard);
                if tx.send(result).is_err() {
                    warn!(path = %path.display(), "result dropped: receiver gone");
                }
            },
            &self.handle,
        );
        Ok(rx)
    }

    /// Wait for every submitted operation to finish. No new work is accepted
    /// by the tracker afterwards.
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }

    fn claim(&self, path: &Path) -> Result<InFlight, DispatchError> {
        let key = slot_key(path);
        let mut paths = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !paths.insert(key.clone()) {
            return Err(DispatchError::Busy {
                path: path.display().to_string(),
            });
        }
        Ok(InFlight {
            paths: Arc::clone(&self.in_flight),
            path: key,
        })
    }
}

/// Canonical form of `path`, or its absolute form when it does not exist.
fn slot_key(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

async fn execute<V: LocalVcs>(
    orchestrator: &Orchestrator<V>,
    path: &Path,
    op: Operation,
) -> OperationResult {
    let failed = |e: crate::error::SetupError| OperationResult::Failed(OperationOutcome::from_error(&e));
    match op {
        Operation::Initialize => {
            OperationResult::Step(orchestrator.ensure_initialized(path).outcome)
        }
        Operation::Commit { message } => {
            OperationResult::Step(orchestrator.stage_and_commit(path, message.as_deref()))
        }
        Operation::Publish {
            target,
            options,
            credentials,
        } => OperationResult::Published(orchestrator.publish(&target, &options, &credentials).await),
        Operation::Push => OperationResult::Step(orchestrator.sync_push(path)),
        Operation::Pull => OperationResult::Step(orchestrator.sync_pull(path)),
        Operation::Status => orchestrator
            .query_status(path)
            .map_or_else(failed, OperationResult::Status),
        Operation::WebUrl => orchestrator
            .resolve_remote_web_url(path)
            .map_or_else(failed, OperationResult::WebUrl),
        Operation::Activity { credentials, limit } => orchestrator
            .recent_activity(path, &credentials, limit)
            .await
            .map_or_else(failed, OperationResult::Activity),
    }
}
