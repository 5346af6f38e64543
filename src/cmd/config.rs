// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config-related commands for repo-setup.

use crate::cli::global::GlobalOptions;
use crate::config::Config;
use crate::config::loader::ConfigLoader;
use crate::error::Result;

/// Default configuration file, read from the current directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "repo-setup.toml";

/// Environment prefix for configuration overrides.
pub const ENV_PREFIX: &str = "REPO_SETUP";

/// Assemble the loader in precedence order: default file, `--config` files,
/// environment, then command-line overrides.
///
/// # Errors
///
/// Returns an error if an override key or value is rejected.
pub fn build_config_loader(global: &GlobalOptions) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);
    for (key, value) in global.to_config_overrides() {
        loader = loader.set(key, value)?;
    }
    Ok(loader)
}

/// Load and validate the configuration.
///
/// # Errors
///
/// Returns an error if a file is missing or invalid, or validation fails.
pub fn load_config(global: &GlobalOptions) -> Result<Config> {
    build_config_loader(global)?.build().map_err(|e| {
        eprintln!("Failed to load config: {e}");
        e
    })
}

/// Display loaded configuration files followed by the current options.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub fn run_options_command(global: &GlobalOptions) -> Result<()> {
    let loader = build_config_loader(global)?;
    let files = loader.format_loaded_files();
    let config = loader.build()?;

    if files.is_empty() {
        println!("No configuration files loaded");
    } else {
        for line in files {
            println!("{line}");
        }
    }
    println!();
    for line in config.format_options() {
        println!("{line}");
    }
    Ok(())
}
