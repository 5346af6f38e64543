// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! LocalVcs (trait) --> GitCli
//!                        | read:  gix::open (no subprocess)
//!                        | write: git CLI, prompts disabled
//! ```

use crate::error::{GitError, GixError, SetupError, SetupResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, trace};

use super::status::{LastCommit, PorcelainStatus};

/// Captured output of a finished git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Both streams joined for display, empty streams skipped.
    #[must_use]
    pub fn combined(&self) -> String {
        [self.stdout.trim(), self.stderr.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Options for [`LocalVcs::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PushMode {
    /// Record the pushed branch as upstream (`-u`).
    pub set_upstream: bool,
    /// Overwrite remote history (`--force`).
    pub force: bool,
}

/// Operations the orchestrator needs from the local version-control tool.
///
/// Every method runs to completion before returning; there is no
/// cancellation once a command has been launched.
pub trait LocalVcs: Send + Sync {
    /// Whether `path` itself is the root of a working tree. Parent
    /// directories are not searched.
    fn is_work_tree(&self, path: &Path) -> bool;

    /// Create an empty repository in `path`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `git init` fails.
    fn init(&self, path: &Path) -> SetupResult<()>;

    /// Stage every tracked and untracked change (`git add --all`).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if staging fails.
    fn add_all(&self, path: &Path) -> SetupResult<()>;

    /// Commit the index and return the short id of the new commit.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the commit fails (including "nothing to commit").
    fn commit(&self, path: &Path, message: &str) -> SetupResult<String>;

    /// Branch, tracking and per-path state.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `git status` fails.
    fn status(&self, path: &Path) -> SetupResult<PorcelainStatus>;

    /// Current branch (None when HEAD is detached).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository or HEAD cannot be read.
    fn current_branch(&self, path: &Path) -> SetupResult<Option<String>>;

    /// Timestamp and subject of HEAD, None before the first commit.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git cannot be run or its output is malformed.
    fn last_commit(&self, path: &Path) -> SetupResult<Option<LastCommit>>;

    /// URL of the named remote, None if no such remote exists.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git cannot be run.
    fn remote_url(&self, path: &Path, remote: &str) -> SetupResult<Option<String>>;

    /// Add a new remote.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the remote already exists or cannot be added.
    fn add_remote(&self, path: &Path, remote: &str, url: &str) -> SetupResult<()>;

    /// Point an existing remote at a new URL.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the remote does not exist.
    fn set_remote_url(&self, path: &Path, remote: &str, url: &str) -> SetupResult<()>;

    /// Push the current branch to `remote` under the same name.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the push is rejected or fails.
    fn push(&self, path: &Path, remote: &str, mode: PushMode) -> SetupResult<CommandOutput>;

    /// Merge `remote/branch` into the current branch.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if fetching or merging fails.
    fn pull(&self, path: &Path, remote: &str, branch: &str) -> SetupResult<CommandOutput>;

    /// Write a key to the user's global git configuration.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the config file cannot be written.
    fn set_global_config(&self, key: &str, value: &str) -> SetupResult<()>;

    /// Read a key from the user's global git configuration.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git cannot be run.
    fn global_config(&self, key: &str) -> SetupResult<Option<String>>;
}

// --- GitCli Implementation ---

/// Git backend driving the `git` executable, with gix for cheap reads.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
    envs: Vec<(OsString, OsString)>,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCli {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            envs: Vec::new(),
        }
    }

    /// Resolve `program` through `PATH` so a missing git is reported up front.
    ///
    /// # Errors
    ///
    /// Returns `GitError::ToolNotFound` if the executable cannot be found.
    pub fn locate(program: impl AsRef<std::ffi::OsStr>) -> SetupResult<Self> {
        let program = program.as_ref();
        let resolved = which::which(program).map_err(|e| GitError::ToolNotFound {
            message: format!("{}: {e}", program.to_string_lossy()),
        })?;
        debug!(git = %resolved.display(), "located git");
        Ok(Self::new(resolved))
    }

    /// Add an environment variable to every git invocation.
    #[must_use]
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run git with prompts disabled (`GCM_INTERACTIVE=never`,
    /// `GIT_TERMINAL_PROMPT=0`) and capture both streams.
    pub(crate) fn run(&self, args: &[&str], cwd: &Path) -> SetupResult<CommandOutput> {
        let command = format!("git {}", args.join(" "));
        trace!(cwd = %cwd.display(), %command, "exec");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .envs(self.envs.iter().map(|(k, v)| (k, v)))
            .output()
            .map_err(|e| spawn_error(&command, &self.program, &e))?;

        let captured = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            return Err(exit_error(command, &captured).into());
        }
        Ok(captured)
    }
}

fn spawn_error(command: &str, program: &Path, err: &std::io::Error) -> SetupError {
    match err.kind() {
        std::io::ErrorKind::NotFound => GitError::ToolNotFound {
            message: format!("{}: {err}", program.display()),
        },
        std::io::ErrorKind::PermissionDenied => GitError::PermissionDenied {
            command: command.to_string(),
            message: err.to_string(),
        },
        _ => GitError::CommandFailed {
            command: command.to_string(),
            message: format!("failed to execute git: {err}"),
        },
    }
    .into()
}

fn exit_error(command: String, captured: &CommandOutput) -> GitError {
    let message = captured.combined();
    if message.contains("Permission denied") {
        GitError::PermissionDenied { command, message }
    } else {
        GitError::CommandFailed { command, message }
    }
}

fn is_command_failure(err: &SetupError) -> bool {
    matches!(err, SetupError::Git(boxed) if matches!(**boxed, GitError::CommandFailed { .. }))
}

impl LocalVcs for GitCli {
    fn is_work_tree(&self, path: &Path) -> bool {
        gix::open(path).is_ok_and(|repo| repo.workdir().is_some())
    }

    fn init(&self, path: &Path) -> SetupResult<()> {
        self.run(&["init", "--quiet"], path)?;
        Ok(())
    }

    fn add_all(&self, path: &Path) -> SetupResult<()> {
        self.run(&["add", "--all"], path)?;
        Ok(())
    }

    fn commit(&self, path: &Path, message: &str) -> SetupResult<String> {
        self.run(&["commit", "--quiet", "-m", message], path)?;
        let id = self.run(&["rev-parse", "--short", "HEAD"], path)?;
        Ok(id.stdout.trim().to_string())
    }

    fn status(&self, path: &Path) -> SetupResult<PorcelainStatus> {
        let output = self.run(
            &[
                "status",
                "--porcelain=v1",
                "--branch",
                "--untracked-files=all",
            ],
            path,
        )?;
        Ok(PorcelainStatus::parse(&output.stdout))
    }

    fn current_branch(&self, path: &Path) -> SetupResult<Option<String>> {
        let repo = gix::open(path).map_err(|e| GitError::Gix(GixError::Open(Box::new(e))))?;
        let head = repo
            .head_name()
            .map_err(|e| GitError::Gix(GixError::Head(e)))?;
        Ok(head.map(|name| name.shorten().to_string()))
    }

    fn last_commit(&self, path: &Path) -> SetupResult<Option<LastCommit>> {
        match self.run(&["rev-parse", "--verify", "--quiet", "HEAD"], path) {
            Ok(_) => {}
            Err(e) if is_command_failure(&e) => return Ok(None),
            Err(e) => return Err(e),
        }
        let output = self.run(&["log", "-1", "--format=%ct%x1f%s"], path)?;
        LastCommit::parse_log_line(output.stdout.trim())
            .map(Some)
            .ok_or_else(|| {
                GitError::CommandFailed {
                    command: "git log -1".to_string(),
                    message: format!("unexpected log output: {}", output.stdout.trim()),
                }
                .into()
            })
    }

    fn remote_url(&self, path: &Path, remote: &str) -> SetupResult<Option<String>> {
        match self.run(&["remote", "get-url", remote], path) {
            Ok(output) => Ok(Some(output.stdout.trim().to_string())),
            Err(e) if is_command_failure(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn add_remote(&self, path: &Path, remote: &str, url: &str) -> SetupResult<()> {
        self.run(&["remote", "add", remote, url], path)?;
        Ok(())
    }

    fn set_remote_url(&self, path: &Path, remote: &str, url: &str) -> SetupResult<()> {
        self.run(&["remote", "set-url", remote, url], path)?;
        Ok(())
    }

    fn push(&self, path: &Path, remote: &str, mode: PushMode) -> SetupResult<CommandOutput> {
        let mut args = vec!["push", "--porcelain"];
        if mode.set_upstream {
            args.push("--set-upstream");
        }
        if mode.force {
            args.push("--force");
        }
        args.extend([remote, "HEAD"]);
        self.run(&args, path)
    }

    fn pull(&self, path: &Path, remote: &str, branch: &str) -> SetupResult<CommandOutput> {
        self.run(&["pull", "--no-rebase", "--no-edit", remote, branch], path)
    }

    fn set_global_config(&self, key: &str, value: &str) -> SetupResult<()> {
        self.run(&["config", "--global", key, value], Path::new("."))?;
        Ok(())
    }

    fn global_config(&self, key: &str) -> SetupResult<Option<String>> {
        match self.run(&["config", "--global", "--get", key], Path::new(".")) {
            Ok(output) => Ok(Some(output.stdout.trim().to_string())),
            Err(e) if is_command_failure(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
