// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository command arguments.
//!
//! ```text
//! publish FOLDER [--name N] [--private] [-d TEXT] [--no-push]
//!                [--force-existing] [-m MSG]
//! init | status | push | pull | open  FOLDER
//! commit FOLDER [-m MSG]
//! activity FOLDER [-n LIMIT]
//! identity -u USER -e EMAIL
//! menu [FOLDER]
//! ```

use clap::Args;
use std::path::PathBuf;

/// A folder to operate on.
#[derive(Debug, Clone, Args)]
pub struct FolderArgs {
    /// Local folder.
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,
}

/// Arguments for the `publish` command.
#[derive(Debug, Clone, Args)]
pub struct PublishArgs {
    /// Folder to publish.
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Repository name (defaults to the folder name).
    #[arg(long)]
    pub name: Option<String>,

    /// Creates a private repository.
    #[arg(long, conflicts_with = "public")]
    pub private: bool,

    /// Creates a public repository, overriding `publish.private`.
    #[arg(long)]
    pub public: bool,

    /// Repository description.
    #[arg(short = 'd', long)]
    pub description: Option<String>,

    /// Creates the repository and attaches the remote without pushing.
    #[arg(long = "no-push")]
    pub no_push: bool,

    /// Overwrites the history of an existing repository with the same name.
    #[arg(long = "force-existing")]
    pub force_existing: bool,

    /// Commit message for pending changes.
    #[arg(short = 'm', long)]
    pub message: Option<String>,
}

/// Arguments for the `commit` command.
#[derive(Debug, Clone, Args)]
pub struct CommitArgs {
    /// Local folder.
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Commit message (defaults to the configured message).
    #[arg(short = 'm', long)]
    pub message: Option<String>,
}

/// Arguments for the `activity` command.
#[derive(Debug, Clone, Args)]
pub struct ActivityArgs {
    /// Local folder with a hosted remote.
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Entries per listing.
    #[arg(short = 'n', long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub limit: u8,
}

/// Arguments for the `identity` command.
#[derive(Debug, Clone, Args)]
pub struct IdentityArgs {
    /// Git user name.
    #[arg(short = 'u', long, required = true)]
    pub username: String,

    /// Git email.
    #[arg(short = 'e', long, required = true)]
    pub email: String,
}

/// Arguments for the `menu` command.
#[derive(Debug, Clone, Args)]
pub struct MenuArgs {
    /// Folder to start with (defaults to the current directory).
    #[arg(value_name = "FOLDER")]
    pub folder: Option<PathBuf>,
}
