// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Inputs to orchestration: target folder, credentials, publish options.

use bon::bon;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{GitError, SetupResult, bail_out};
use crate::hosted::types::RemoteRepository;

/// Visibility of a hosted repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    #[must_use]
    pub const fn from_private(private: bool) -> Self {
        if private { Self::Private } else { Self::Public }
    }

    #[must_use]
    pub const fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }
}

/// A local folder and the hosted repository it should become.
///
/// Built fresh for every user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryTarget {
    local_path: PathBuf,
    repo_name: String,
    visibility: Visibility,
    description: Option<String>,
}

#[bon]
impl RepositoryTarget {
    /// Validate the folder and derive the repository name.
    ///
    /// ```no_run
    /// use repo_setup::orchestrator::target::{RepositoryTarget, Visibility};
    ///
    /// let target = RepositoryTarget::builder()
    ///     .local_path("./my-project")
    ///     .visibility(Visibility::Private)
    ///     .build()?;
    /// assert_eq!(target.repo_name(), "my-project");
    /// # Ok::<(), repo_setup::error::SetupError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `GitError::NotADirectory` if `local_path` is not an existing
    /// directory, or a bailed error if no valid name can be derived.
    #[builder]
    pub fn new(
        #[builder(into)] local_path: PathBuf,
        #[builder(into)] repo_name: Option<String>,
        #[builder(default)] visibility: Visibility,
        #[builder(into)] description: Option<String>,
    ) -> SetupResult<Self> {
        let local_path = std::path::absolute(&local_path)?;
        if !local_path.is_dir() {
            return Err(GitError::NotADirectory {
                path: local_path.display().to_string(),
            }
            .into());
        }

        let raw_name = match repo_name {
            Some(name) => name,
            None => folder_name(&local_path),
        };
        let repo_name = sanitize_name(&raw_name);
        if repo_name.is_empty() {
            return Err(bail_out(format!(
                "cannot derive a repository name from '{raw_name}'"
            )));
        }

        Ok(Self {
            local_path,
            repo_name,
            visibility,
            description: description.filter(|d| !d.trim().is_empty()),
        })
    }

    #[must_use]
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    #[must_use]
    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Hosted names allow ASCII letters, digits, `-`, `_` and `.`; anything else
/// becomes `-`.
pub(crate) fn sanitize_name(name: &str) -> String {
    let replaced: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let trimmed = replaced.trim_matches('-');
    if trimmed.chars().all(|c| c == '.') {
        return String::new();
    }
    trimmed.to_string()
}

/// Git author identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VcsIdentity {
    pub username: String,
    pub email: String,
}

/// Hosted API token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct HostedToken(String);

impl HostedToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HostedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HostedToken([hidden])")
    }
}

/// Per-session credentials, owned by the caller and passed into each call.
///
/// The orchestrator never persists them; the git identity lives in git's own
/// global configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub vcs_identity: Option<VcsIdentity>,
    pub hosted_token: Option<HostedToken>,
}

impl Credentials {
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            vcs_identity: None,
            hosted_token: Some(HostedToken::new(token)),
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.hosted_token.as_ref().map(HostedToken::expose)
    }
}

/// Permission to overwrite the history of one specific hosted repository.
///
/// Obtained from [`PublishReport::confirm_force_push`](super::outcome::PublishReport::confirm_force_push)
/// after a conflict; there is no other way to build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcePushConfirmation {
    full_name: String,
}

impl ForcePushConfirmation {
    pub(crate) fn for_repository(repo: &RemoteRepository) -> Self {
        Self {
            full_name: repo.full_name.clone(),
        }
    }

    /// `owner/name` of the repository this confirmation authorizes.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub fn authorizes(&self, repo: &RemoteRepository) -> bool {
        self.full_name.eq_ignore_ascii_case(&repo.full_name)
    }
}

/// Options for [`Orchestrator::publish`](super::Orchestrator::publish).
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Push after attaching the remote. False means skip-push.
    pub push: bool,
    /// Required to overwrite an existing hosted repository.
    pub confirmation: Option<ForcePushConfirmation>,
    /// Commit message; the configured default when None.
    pub message: Option<String>,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            push: true,
            confirmation: None,
            message: None,
        }
    }
}
