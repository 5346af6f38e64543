// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Publish command.
//!
//! ```text
//! publish --> report
//!               | conflict && --force-existing
//!               v
//!           confirm_force_push --> publish again (force push)
//! ```

use std::io::Write;

use anyhow::{Context, bail};
use tracing::warn;

use super::render::publish_lines;
use super::{credentials, dispatcher, run_operation};
use crate::cli::repo::PublishArgs;
use crate::config::Config;
use crate::error::Result;
use crate::git::backend::LocalVcs;
use crate::orchestrator::outcome::PublishReport;
use crate::orchestrator::target::{Credentials, PublishOptions, RepositoryTarget, Visibility};
use crate::worker::{Dispatcher, Operation, OperationResult};

/// `--private` and `--public` win over `publish.private`.
#[must_use]
pub fn visibility(args: &PublishArgs, config: &Config) -> Visibility {
    if args.private {
        Visibility::Private
    } else if args.public {
        Visibility::Public
    } else {
        Visibility::from_private(config.publish.private)
    }
}

/// Run the publish command.
///
/// # Errors
///
/// Returns an error if the folder is invalid, any publish step fails, or the
/// repository already exists and `--force-existing` was not given.
pub async fn run_publish_command(args: &PublishArgs, config: &Config) -> Result<()> {
    let target = RepositoryTarget::builder()
        .local_path(args.folder.clone())
        .maybe_repo_name(args.name.clone())
        .visibility(visibility(args, config))
        .maybe_description(args.description.clone())
        .build()
        .context("invalid publish target")?;
    let options = PublishOptions {
        push: !args.no_push,
        confirmation: None,
        message: args.message.clone(),
    };

    let dispatcher = dispatcher(config)?;
    let credentials = credentials(config);
    let report = publish_or_overwrite(
        &dispatcher,
        &target,
        options,
        &credentials,
        args.force_existing,
        &mut std::io::stdout(),
    )
    .await?;
    finish(&report)
}

/// Publish `target`, and when the run stops at an existing repository and
/// `force_existing` is set, publish again with the confirmation that run
/// produced. Each report is written to `out`.
///
/// # Errors
///
/// Returns an error if dispatch fails, output cannot be written, or the
/// repository already exists and `force_existing` is false.
pub async fn publish_or_overwrite<V: LocalVcs + 'static, W: Write>(
    dispatcher: &Dispatcher<V>,
    target: &RepositoryTarget,
    options: PublishOptions,
    credentials: &Credentials,
    force_existing: bool,
    out: &mut W,
) -> Result<PublishReport> {
    let report = publish_once(dispatcher, target, options.clone(), credentials).await?;
    write_report(out, &report)?;

    let Some(confirmation) = report.confirm_force_push() else {
        return Ok(report);
    };
    if !force_existing {
        bail!(
            "{} already exists; rerun with --force-existing to overwrite its history",
            confirmation.full_name()
        );
    }
    warn!(repo = confirmation.full_name(), "overwriting existing repository");
    let options = PublishOptions {
        confirmation: Some(confirmation),
        ..options
    };
    let report = publish_once(dispatcher, target, options, credentials).await?;
    write_report(out, &report)?;
    Ok(report)
}

/// Submit one publish run and unwrap its report.
///
/// # Errors
///
/// Returns an error if the folder is busy or the worker produced something
/// other than a report.
pub async fn publish_once<V: LocalVcs + 'static>(
    dispatcher: &Dispatcher<V>,
    target: &RepositoryTarget,
    options: PublishOptions,
    credentials: &Credentials,
) -> Result<PublishReport> {
    let op = Operation::Publish {
        target: target.clone(),
        options,
        credentials: credentials.clone(),
    };
    match run_operation(dispatcher, target.local_path(), op).await? {
        OperationResult::Published(report) => Ok(report),
        other => bail!("unexpected publish result: {other:?}"),
    }
}

fn write_report<W: Write>(out: &mut W, report: &PublishReport) -> Result<()> {
    for line in publish_lines(report) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn finish(report: &PublishReport) -> Result<()> {
    if report.succeeded() {
        Ok(())
    } else {
        bail!("publish did not complete")
    }
}
