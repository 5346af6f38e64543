// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration section types.
//!
//! ```text
//! [global]   log_level, file_log_level, log_file
//! [hosted]   api_url, web_host, token, timeout_secs
//! [publish]  remote_name, private, initial/update commit messages
//! [git]      program
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Global options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Console verbosity.
    pub log_level: LogLevel,
    /// Log file verbosity.
    pub file_log_level: LogLevel,
    /// Optional log file; no file logging when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::INFO,
            file_log_level: LogLevel::DEBUG,
            log_file: None,
        }
    }
}

/// Hosted repository provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostedConfig {
    /// REST API base URL.
    pub api_url: String,
    /// Host name used in clone and web URLs.
    pub web_host: String,
    /// Personal access token. Prefer `GITHUB_TOKEN` over storing it here.
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HostedConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            web_host: "github.com".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

impl HostedConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("https://") || self.api_url.starts_with("http://")) {
            return Err(ConfigError::InvalidValue {
                section: "hosted".to_string(),
                key: "api_url".to_string(),
                message: format!("expected an http(s) url, got '{}'", self.api_url),
            });
        }
        if self.web_host.is_empty() || self.web_host.contains('/') {
            return Err(ConfigError::InvalidValue {
                section: "hosted".to_string(),
                key: "web_host".to_string(),
                message: format!("expected a bare host name, got '{}'", self.web_host),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                section: "hosted".to_string(),
                key: "timeout_secs".to_string(),
                message: "timeout must be at least one second".to_string(),
            });
        }
        Ok(())
    }
}

/// Defaults for the publish workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    /// Name of the remote that points at the hosted repository.
    pub remote_name: String,
    /// Create repositories as private unless overridden on the command line.
    pub private: bool,
    /// Commit message used when the repository has no commits yet.
    pub initial_commit_message: String,
    /// Commit message used for later snapshots.
    pub update_commit_message: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            remote_name: "origin".to_string(),
            private: false,
            initial_commit_message: "Initial commit".to_string(),
            update_commit_message: "Update repository".to_string(),
        }
    }
}

impl PublishConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.remote_name.trim().is_empty() || self.remote_name.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidValue {
                section: "publish".to_string(),
                key: "remote_name".to_string(),
                message: format!("invalid remote name '{}'", self.remote_name),
            });
        }
        for (key, value) in [
            ("initial_commit_message", &self.initial_commit_message),
            ("update_commit_message", &self.update_commit_message),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingKey {
                    section: "publish".to_string(),
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Local git client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Program name or path of the git executable.
    pub program: PathBuf,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }
}
