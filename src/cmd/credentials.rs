// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Identity and token commands.

use anyhow::bail;

use super::{credentials, orchestrator};
use crate::cli::repo::IdentityArgs;
use crate::config::Config;
use crate::error::Result;
use crate::orchestrator::outcome::OperationOutcome;
use crate::orchestrator::target::Credentials;

/// Set the global git identity.
///
/// # Errors
///
/// Returns an error if either value is empty or git rejects the change.
pub fn run_identity_command(args: &IdentityArgs, config: &Config) -> Result<()> {
    let orchestrator = orchestrator(config)?;
    let mut session = Credentials::default();
    let outcome = orchestrator.configure_vcs_identity(&mut session, &args.username, &args.email);
    finish(&outcome)
}

/// Check the configured token against the hosted API.
///
/// # Errors
///
/// Returns an error if no token is configured or the API rejects it.
pub async fn run_token_command(config: &Config) -> Result<()> {
    let orchestrator = orchestrator(config)?;
    let token = credentials(config)
        .token()
        .map(str::to_string)
        .unwrap_or_default();
    let mut session = Credentials::default();
    let outcome = orchestrator.configure_hosted_token(&mut session, &token).await;
    finish(&outcome)
}

fn finish(outcome: &OperationOutcome) -> Result<()> {
    println!("{outcome}");
    if outcome.succeeded {
        return Ok(());
    }
    if let Some(detail) = &outcome.raw_detail {
        eprintln!("{detail}");
    }
    bail!("{} failed", outcome.kind.label())
}
