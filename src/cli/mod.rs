// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for repo-setup using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! repo-setup [global options] <command>
//! publish FOLDER [options]
//! init | status | commit | push | pull | open | activity  FOLDER
//! identity -u USER -e EMAIL
//! token
//! menu [FOLDER]
//! options | version
//! ```

pub mod global;
pub mod repo;


use crate::cli::global::GlobalOptions;
use crate::cli::repo::{
    ActivityArgs, CommitArgs, FolderArgs, IdentityArgs, MenuArgs, PublishArgs,
};
use clap::{Parser, Subcommand};

/// Publish local folders as hosted Git repositories.
#[derive(Debug, Parser)]
#[command(
    name = "repo-setup",
    author,
    version,
    about = "Publish local folders as hosted Git repositories",
    long_about = "repo-setup Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Turns a local folder into a Git repository, commits its\n\
                  contents, creates a matching GitHub repository and pushes.\n\
                  `repo-setup publish some/folder` does all of it. See\n\
                  `repo-setup <command> --help` for more information about a command.",
    after_help = "CONFIGURATION:\n\n\
                  repo-setup reads `repo-setup.toml` from the current directory if\n\
                  present, then every file given with --config, then REPO_SETUP_*\n\
                  environment variables (REPO_SETUP_HOSTED__API_URL sets\n\
                  hosted.api_url). Command-line flags win over all of them.\n\
                  The API token is taken from --github-token or GITHUB_TOKEN."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Initializes, commits, creates the hosted repository and pushes.
    Publish(PublishArgs),

    /// Initializes a repository if the folder is not one already.
    Init(FolderArgs),

    /// Shows branch, remote, pending changes and the last commit.
    Status(FolderArgs),

    /// Stages everything and commits.
    Commit(CommitArgs),

    /// Pushes the current branch.
    Push(FolderArgs),

    /// Pulls the current branch.
    Pull(FolderArgs),

    /// Prints the web URL of the hosted repository.
    Open(FolderArgs),

    /// Shows recent commits, open pull requests and open issues.
    Activity(ActivityArgs),

    /// Sets the global git user name and email.
    Identity(IdentityArgs),

    /// Validates the configured API token.
    Token,

    /// Interactive terminal menu.
    Menu(MenuArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
