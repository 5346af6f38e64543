// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Single-step repository commands: init, status, commit, push, pull, open,
//! activity.

use std::path::Path;

use anyhow::bail;

use super::render::{now_secs, result_lines};
use super::{credentials, dispatcher, print_lines, run_operation};
use crate::cli::repo::{ActivityArgs, CommitArgs, FolderArgs};
use crate::config::Config;
use crate::error::Result;
use crate::worker::{Operation, OperationResult};

/// Which single-step command to run against a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderCommand {
    Init,
    Status,
    Push,
    Pull,
    Open,
}

impl FolderCommand {
    const fn operation(self) -> Operation {
        match self {
            Self::Init => Operation::Initialize,
            Self::Status => Operation::Status,
            Self::Push => Operation::Push,
            Self::Pull => Operation::Pull,
            Self::Open => Operation::WebUrl,
        }
    }
}

/// Run one of the folder commands.
///
/// # Errors
///
/// Returns an error if the operation fails or the folder is busy.
pub async fn run_folder_command(
    command: FolderCommand,
    args: &FolderArgs,
    config: &Config,
) -> Result<()> {
    let dispatcher = dispatcher(config)?;
    let op = command.operation();
    let name = op.name();
    let result = run_operation(&dispatcher, &args.folder, op).await?;
    report(&args.folder, name, &result)
}

/// Run the commit command.
///
/// # Errors
///
/// Returns an error if staging or committing fails.
pub async fn run_commit_command(args: &CommitArgs, config: &Config) -> Result<()> {
    let dispatcher = dispatcher(config)?;
    let op = Operation::Commit {
        message: args.message.clone(),
    };
    let result = run_operation(&dispatcher, &args.folder, op).await?;
    report(&args.folder, "commit", &result)
}

/// Run the activity command.
///
/// # Errors
///
/// Returns an error if no token is configured, the remote is not hosted, or
/// any listing fails.
pub async fn run_activity_command(args: &ActivityArgs, config: &Config) -> Result<()> {
    let dispatcher = dispatcher(config)?;
    let op = Operation::Activity {
        credentials: credentials(config),
        limit: args.limit,
    };
    let result = run_operation(&dispatcher, &args.folder, op).await?;
    report(&args.folder, "activity", &result)
}

/// Print a result and turn failures into an error for the exit code.
pub(crate) fn report(path: &Path, name: &str, result: &OperationResult) -> Result<()> {
    print_lines(&result_lines(path, result, now_secs()));
    if result.succeeded() {
        Ok(())
    } else {
        bail!("{name} did not complete")
    }
}
