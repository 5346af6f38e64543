// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            SetupError (~24 bytes)
//!                   |
//!   +-------+-------+-------+------+
//!   v       v       v       v      v
//!  Git   Hosted   Config   Io   Bailed
//!  Box    Box      Box     Box  Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Git     CommandFailed, ToolNotFound, PermissionDenied,
//!           NotADirectory, NoRemote, UnrecognizedHost, Gix
//!   Hosted  MissingToken, Unauthorized, AlreadyExists, HttpError,
//!           Reqwest
//!   Config  MissingKey, InvalidValue
//! ```
//!
//! Gateways return [`SetupResult`]; command handlers work in
//! [`Result`] (`anyhow`) and attach context on the way up.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`SetupError`].
pub type SetupResult<T> = std::result::Result<T, SetupError>;

/// Top-level error type for the gateways and the orchestrator.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Fatal error that should terminate the current command.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Local version-control operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Hosted repository API call failed.
    #[error("hosted api error: {0}")]
    Hosted(#[from] Box<HostedError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

/// Create a fatal [`SetupError::Bailed`].
pub fn bail_out(message: impl Into<String>) -> SetupError {
    SetupError::Bailed(message.into().into_boxed_str())
}

macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for SetupError {
                fn from(err: $error) -> Self {
                    SetupError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    HostedError => Hosted,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to open repository.
    #[error("failed to open repository: {0}")]
    Open(#[from] Box<gix::open::Error>),

    /// Failed to get HEAD reference.
    #[error("failed to get head reference: {0}")]
    Head(#[from] gix::reference::find::existing::Error),
}

// --- Git Errors ---

/// Local version-control errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git executable could not be located or launched.
    #[error("git executable not found: {message}")]
    ToolNotFound { message: String },

    /// The operating system refused access to the working directory.
    #[error("permission denied running {command}: {message}")]
    PermissionDenied { command: String, message: String },

    /// Git command exited with a failure status.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Target directory does not exist or is not a directory.
    #[error("not a directory: {path}")]
    NotADirectory { path: String },

    /// Repository has no remote with the configured name.
    #[error("no remote '{remote}' configured in {path}")]
    NoRemote { path: String, remote: String },

    /// Remote points somewhere other than the supported hosting provider.
    #[error("remote url '{url}' is not hosted on {expected_host}")]
    UnrecognizedHost { url: String, expected_host: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),
}

// --- Hosted API Errors ---

/// Hosted repository API errors.
#[derive(Debug, Error)]
pub enum HostedError {
    /// No token is available for an authenticated call.
    #[error("no hosted api token configured")]
    MissingToken,

    /// Token was rejected (401/403).
    #[error("authentication failed ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// Repository creation refused because the name is taken.
    #[error("repository '{name}' already exists on this account")]
    AlreadyExists { name: String },

    /// Non-success HTTP response.
    #[error("http error {status}: {url}")]
    HttpError {
        status: u16,
        url: String,
        body: String,
    },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}
