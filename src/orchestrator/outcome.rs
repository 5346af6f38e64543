// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Structured operation results.
//!
//! ```text
//! SetupError --from_error()--> OperationOutcome { succeeded, kind, message, raw_detail }
//!
//!   GitError::ToolNotFound       ExternalToolError(NotFound)
//!   GitError::PermissionDenied   ExternalToolError(PermissionDenied)
//!   GitError::NoRemote           ExternalToolError(NoRemoteConfigured)
//!   GitError::UnrecognizedHost   ExternalToolError(UnrecognizedHost)
//!   HostedError::Unauthorized    AuthFailure
//!   HostedError::MissingToken    AuthFailure
//!   HostedError::AlreadyExists   Conflict
//!   everything else              ExternalToolError(Failed)
//! ```

use serde::Serialize;
use std::fmt;

use crate::error::{GitError, HostedError, SetupError};
use crate::hosted::types::RemoteRepository;

use super::target::ForcePushConfirmation;

/// Why an external tool call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolFailure {
    /// The tool executable could not be found.
    NotFound,
    PermissionDenied,
    NoRemoteConfigured,
    /// The remote lives on a host other than the supported provider.
    UnrecognizedHost,
    Failed,
}

/// What an operation did, or why it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Initialized,
    Committed,
    RemoteCreated,
    Pushed,
    Pulled,
    /// Identity or token accepted.
    Configured,
    /// Nothing to commit. Not an error.
    NoOpNoChanges,
    /// A hosted repository with the requested name already exists.
    Conflict,
    AuthFailure,
    ExternalToolError(ToolFailure),
}

impl OutcomeKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::Committed => "committed",
            Self::RemoteCreated => "remote created",
            Self::Pushed => "pushed",
            Self::Pulled => "pulled",
            Self::Configured => "configured",
            Self::NoOpNoChanges => "no changes",
            Self::Conflict => "conflict",
            Self::AuthFailure => "auth failure",
            Self::ExternalToolError(ToolFailure::NotFound) => "tool not found",
            Self::ExternalToolError(ToolFailure::PermissionDenied) => "permission denied",
            Self::ExternalToolError(ToolFailure::NoRemoteConfigured) => "no remote",
            Self::ExternalToolError(ToolFailure::UnrecognizedHost) => "unrecognized host",
            Self::ExternalToolError(ToolFailure::Failed) => "failed",
        }
    }
}

/// Result of one orchestration step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationOutcome {
    pub succeeded: bool,
    pub kind: OutcomeKind,
    pub message: String,
    /// Output of the underlying tool, kept verbatim.
    pub raw_detail: Option<String>,
}

impl OperationOutcome {
    #[must_use]
    pub fn success(kind: OutcomeKind, message: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            kind,
            message: message.into(),
            raw_detail: None,
        }
    }

    #[must_use]
    pub fn failure(kind: OutcomeKind, message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            kind,
            message: message.into(),
            raw_detail: None,
        }
    }

    /// Attach tool output; blank output is dropped.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        if !detail.trim().is_empty() {
            self.raw_detail = Some(detail);
        }
        self
    }

    /// Map a gateway error to a failed outcome.
    #[must_use]
    pub fn from_error(err: &SetupError) -> Self {
        let (kind, detail) = match err {
            SetupError::Git(git) => match &**git {
                GitError::ToolNotFound { message } => {
                    (OutcomeKind::ExternalToolError(ToolFailure::NotFound), Some(message))
                }
                GitError::PermissionDenied { message, .. } => (
                    OutcomeKind::ExternalToolError(ToolFailure::PermissionDenied),
                    Some(message),
                ),
                GitError::NoRemote { .. } => (
                    OutcomeKind::ExternalToolError(ToolFailure::NoRemoteConfigured),
                    None,
                ),
                GitError::UnrecognizedHost { .. } => (
                    OutcomeKind::ExternalToolError(ToolFailure::UnrecognizedHost),
                    None,
                ),
                GitError::CommandFailed { message, .. } => {
                    (OutcomeKind::ExternalToolError(ToolFailure::Failed), Some(message))
                }
                GitError::NotADirectory { .. } | GitError::Gix(_) => {
                    (OutcomeKind::ExternalToolError(ToolFailure::Failed), None)
                }
            },
            SetupError::Hosted(hosted) => match &**hosted {
                HostedError::MissingToken => (OutcomeKind::AuthFailure, None),
                HostedError::Unauthorized { body, .. } => (OutcomeKind::AuthFailure, Some(body)),
                HostedError::AlreadyExists { .. } => (OutcomeKind::Conflict, None),
                HostedError::HttpError { body, .. } => {
                    (OutcomeKind::ExternalToolError(ToolFailure::Failed), Some(body))
                }
                HostedError::Reqwest(_) => {
                    (OutcomeKind::ExternalToolError(ToolFailure::Failed), None)
                }
            },
            SetupError::Io(io) if io.kind() == std::io::ErrorKind::PermissionDenied => (
                OutcomeKind::ExternalToolError(ToolFailure::PermissionDenied),
                None,
            ),
            SetupError::Config(_) | SetupError::Io(_) | SetupError::Bailed(_) => {
                (OutcomeKind::ExternalToolError(ToolFailure::Failed), None)
            }
        };

        let outcome = Self::failure(kind, err.to_string());
        match detail {
            Some(detail) => outcome.with_detail(detail.clone()),
            None => outcome,
        }
    }
}

impl fmt::Display for OperationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.succeeded { "ok" } else { "!!" };
        write!(f, "[{mark}] {}: {}", self.kind.label(), self.message)
    }
}

/// Every step a publish run took, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    pub steps: Vec<OperationOutcome>,
    /// Browser URL of the hosted repository, set on success.
    pub web_url: Option<String>,
    /// The repository that blocked or was overwritten by this run.
    pub existing_remote: Option<RemoteRepository>,
}

impl PublishReport {
    /// True iff every step succeeded.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.steps.iter().all(|step| step.succeeded)
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.steps
            .last()
            .is_some_and(|step| step.kind == OutcomeKind::Conflict)
    }

    /// Confirmation to overwrite the repository this run collided with.
    ///
    /// Only a conflicted report can produce one, and it authorizes exactly the
    /// repository that caused the conflict.
    #[must_use]
    pub fn confirm_force_push(&self) -> Option<ForcePushConfirmation> {
        if !self.is_conflict() {
            return None;
        }
        self.existing_remote
            .as_ref()
            .map(ForcePushConfirmation::for_repository)
    }

    pub(crate) fn push(&mut self, step: OperationOutcome) -> bool {
        let ok = step.succeeded;
        self.steps.push(step);
        ok
    }
}
