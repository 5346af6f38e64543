// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers --> Dispatcher --> Orchestrator
//!   config, credentials, menu, publish, repo
//! ```

pub mod config;
pub mod credentials;
pub mod menu;
pub mod publish;
pub mod render;
pub mod repo;


use std::path::Path;

use anyhow::Context;

use crate::config::Config;
use crate::error::Result;
use crate::git::backend::{GitCli, LocalVcs};
use crate::hosted::HostedClient;
use crate::orchestrator::Orchestrator;
use crate::orchestrator::target::Credentials;
use crate::worker::{Dispatcher, Operation, OperationResult};

/// Build an orchestrator from `config`, locating the git binary first.
///
/// # Errors
///
/// Returns an error if `git.program` cannot be found.
pub fn orchestrator(config: &Config) -> Result<Orchestrator> {
    let git = GitCli::locate(&config.git.program)
        .with_context(|| format!("git is required ({})", config.git.program.display()))?;
    Ok(Orchestrator::new(
        git,
        HostedClient::from_config(&config.hosted),
        config,
    ))
}

/// Build a dispatcher bound to the current runtime.
///
/// # Errors
///
/// Returns an error if git cannot be found or no runtime is running.
pub fn dispatcher(config: &Config) -> Result<Dispatcher> {
    Ok(Dispatcher::new(orchestrator(config)?)?)
}

/// Session credentials seeded from the configured token.
#[must_use]
pub fn credentials(config: &Config) -> Credentials {
    config
        .hosted
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Credentials::with_token)
        .unwrap_or_default()
}

/// Submit `op` and wait for its result behind a spinner.
///
/// # Errors
///
/// Returns an error if the folder is busy or the worker vanished.
pub async fn run_operation<V: LocalVcs + 'static>(
    dispatcher: &Dispatcher<V>,
    path: &Path,
    op: Operation,
) -> Result<OperationResult> {
    let bar = render::spinner(format!("{} {}", op.name(), path.display()));
    let rx = dispatcher.submit(path, op);
    let result = match rx {
        Ok(rx) => rx
            .recv_async()
            .await
            .context("operation ended without a result"),
        Err(e) => Err(e.into()),
    };
    bar.finish_and_clear();
    result
}

/// Print every line to stdout.
pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
