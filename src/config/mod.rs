// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low -> high)
//! 1. defaults
//! 2. repo-setup.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. REPO_SETUP_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Example
//!
//! ```toml
//! [hosted]
//! api_url = "https://github.example.com/api/v3"
//! web_host = "github.example.com"
//!
//! [publish]
//! private = true
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{GitConfig, GlobalConfig, HostedConfig, PublishConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub global: GlobalConfig,
    pub hosted: HostedConfig,
    pub publish: PublishConfig,
    pub git: GitConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// ```no_run
    /// use repo_setup::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("repo-setup.toml")
    ///     .with_env_prefix("REPO_SETUP")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or fails validation.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.hosted.validate()?;
        self.publish.validate()?;
        if self.git.program.as_os_str().is_empty() {
            return Err(ConfigError::MissingKey {
                section: "git".to_string(),
                key: "program".to_string(),
            });
        }
        Ok(())
    }

    /// Format configuration options for display, sorted by key.
    ///
    /// The hosted token is never printed; a set token shows as `[hidden]`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();

        options.insert(
            "global.log_level".to_string(),
            self.global.log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".to_string(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".to_string(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );

        options.insert("hosted.api_url".to_string(), self.hosted.api_url.clone());
        options.insert("hosted.web_host".to_string(), self.hosted.web_host.clone());
        options.insert(
            "hosted.timeout_secs".to_string(),
            self.hosted.timeout_secs.to_string(),
        );
        if self.hosted.token.is_some() {
            options.insert("hosted.token".to_string(), "[hidden]".to_string());
        }

        options.insert(
            "publish.remote_name".to_string(),
            self.publish.remote_name.clone(),
        );
        options.insert(
            "publish.private".to_string(),
            self.publish.private.to_string(),
        );
        options.insert(
            "publish.initial_commit_message".to_string(),
            self.publish.initial_commit_message.clone(),
        );
        options.insert(
            "publish.update_commit_message".to_string(),
            self.publish.update_commit_message.clone(),
        );

        options.insert(
            "git.program".to_string(),
            self.git.program.display().to_string(),
        );

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}
