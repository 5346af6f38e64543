// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Config --> Command Dispatch
//!   Publish | Init | Status | Commit | Push | Pull | Open | Activity
//!   Identity | Token | Menu | Options | Version
//! ```

use std::process::ExitCode;

use repo_setup::cli::global::GlobalOptions;
use repo_setup::cli::{self, Command};
use repo_setup::cmd::config::{load_config, run_options_command};
use repo_setup::cmd::credentials::{run_identity_command, run_token_command};
use repo_setup::cmd::menu::run_menu_command;
use repo_setup::cmd::publish::run_publish_command;
use repo_setup::cmd::repo::{
    FolderCommand, run_activity_command, run_commit_command, run_folder_command,
};
use repo_setup::logging::init_logging;
use repo_setup::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let log_config = build_log_config(&cli.global);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli).await
}

fn build_log_config(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(console_level);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => run_options_command(&cli.global),
        Some(command) => match load_config(&cli.global) {
            Ok(config) => match command {
                Command::Publish(args) => run_publish_command(args, &config).await,
                Command::Init(args) => run_folder_command(FolderCommand::Init, args, &config).await,
                Command::Status(args) => {
                    run_folder_command(FolderCommand::Status, args, &config).await
                }
                Command::Commit(args) => run_commit_command(args, &config).await,
                Command::Push(args) => run_folder_command(FolderCommand::Push, args, &config).await,
                Command::Pull(args) => run_folder_command(FolderCommand::Pull, args, &config).await,
                Command::Open(args) => run_folder_command(FolderCommand::Open, args, &config).await,
                Command::Activity(args) => run_activity_command(args, &config).await,
                Command::Identity(args) => run_identity_command(args, &config),
                Command::Token => run_token_command(&config).await,
                Command::Menu(args) => run_menu_command(args, &config).await,
                Command::Version | Command::Options => Ok(()),
            },
            Err(e) => Err(e),
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}
