// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Line-based interactive menu.
//!
//! ```text
//! prompt --> choice --> Dispatcher::submit --> spinner --> result lines
//!    ^                                                          |
//!    '----------------------------------------------------------'
//! ```
//!
//! Session credentials live only in the menu; nothing is written to disk
//! except the git identity, which git stores itself.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::debug;

use super::publish::publish_once;
use super::render::{now_secs, outcome_lines, publish_lines, result_lines};
use super::{credentials, dispatcher, run_operation};
use crate::cli::repo::MenuArgs;
use crate::config::Config;
use crate::error::Result;
use crate::git::backend::LocalVcs;
use crate::orchestrator::target::{Credentials, PublishOptions, RepositoryTarget, Visibility};
use crate::worker::{Dispatcher, Operation};

const ENTRIES: &[(&str, &str)] = &[
    ("1", "Status"),
    ("2", "Initialize repository"),
    ("3", "Commit all changes"),
    ("4", "Publish to hosted repository"),
    ("5", "Push"),
    ("6", "Pull"),
    ("7", "Show web URL"),
    ("8", "Recent activity"),
    ("9", "Set git identity"),
    ("t", "Set API token"),
    ("f", "Change folder"),
    ("q", "Quit"),
];

/// Run the interactive menu on stdin/stdout.
///
/// # Errors
///
/// Returns an error if git is missing or the terminal cannot be read.
pub async fn run_menu_command(args: &MenuArgs, config: &Config) -> Result<()> {
    let folder = match &args.folder {
        Some(folder) => folder.clone(),
        None => std::env::current_dir().context("cannot read the current directory")?,
    };
    let dispatcher = dispatcher(config)?;
    let mut menu = Menu::new(
        &dispatcher,
        BufReader::new(tokio::io::stdin()),
        std::io::stdout(),
        folder,
    )
    .with_credentials(credentials(config))
    .with_default_visibility(Visibility::from_private(config.publish.private));
    menu.run().await?;
    dispatcher.shutdown().await;
    Ok(())
}

/// Interactive session over any line source and sink.
pub struct Menu<'a, V: LocalVcs + 'static, R, W> {
    dispatcher: &'a Dispatcher<V>,
    input: Lines<R>,
    out: W,
    folder: PathBuf,
    credentials: Credentials,
    visibility: Visibility,
}

impl<'a, V, R, W> Menu<'a, V, R, W>
where
    V: LocalVcs + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(dispatcher: &'a Dispatcher<V>, input: R, out: W, folder: PathBuf) -> Self {
        Self {
            dispatcher,
            input: input.lines(),
            out,
            folder,
            credentials: Credentials::default(),
            visibility: Visibility::default(),
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    #[must_use]
    pub const fn with_default_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Consume the menu and hand back the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Loop until `q` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error only if input or output fails; failed operations are
    /// printed and the loop continues.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.show()?;
            let Some(choice) = self.read_line("Choice").await? else {
                break;
            };
            if choice == "q" {
                break;
            }
            if let Err(e) = self.dispatch(&choice).await {
                writeln!(self.out, "Error: {e:#}")?;
            }
        }
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Folder: {}", self.folder.display())?;
        for (key, label) in ENTRIES {
            writeln!(self.out, "  {key}) {label}")?;
        }
        Ok(())
    }

    async fn dispatch(&mut self, choice: &str) -> Result<()> {
        debug!(choice, "menu choice");
        match choice {
            "1" => self.simple(Operation::Status).await,
            "2" => self.simple(Operation::Initialize).await,
            "3" => {
                let message = self.ask("Commit message (blank for default)").await?;
                self.simple(Operation::Commit { message }).await
            }
            "4" => self.publish().await,
            "5" => self.simple(Operation::Push).await,
            "6" => self.simple(Operation::Pull).await,
            "7" => self.simple(Operation::WebUrl).await,
            "8" => {
                let op = Operation::Activity {
                    credentials: self.credentials.clone(),
                    limit: 5,
                };
                self.simple(op).await
            }
            "9" => self.identity().await,
            "t" => self.token().await,
            "f" => {
                if let Some(folder) = self.ask("New folder").await? {
                    self.folder = PathBuf::from(folder);
                }
                Ok(())
            }
            "" => Ok(()),
            other => {
                writeln!(self.out, "Unknown choice '{other}'")?;
                Ok(())
            }
        }
    }

    async fn simple(&mut self, op: Operation) -> Result<()> {
        let result = run_operation(self.dispatcher, &self.folder, op).await?;
        self.write_lines(&result_lines(&self.folder, &result, now_secs()))
    }

    async fn publish(&mut self) -> Result<()> {
        let name = self.ask("Repository name (blank for folder name)").await?;
        let default_private = self.visibility.is_private();
        let private = self
            .ask(if default_private {
                "Private? [Y/n]"
            } else {
                "Private? [y/N]"
            })
            .await?
            .map_or(default_private, |answer| is_yes(&answer));
        let description = self.ask("Description (optional)").await?;

        let target = RepositoryTarget::builder()
            .local_path(self.folder.clone())
            .maybe_repo_name(name)
            .visibility(Visibility::from_private(private))
            .maybe_description(description)
            .build()?;

        let options = PublishOptions::default();
        let report = publish_once(self.dispatcher, &target, options.clone(), &self.credentials)
            .await?;
        self.write_lines(&publish_lines(&report))?;

        let Some(confirmation) = report.confirm_force_push() else {
            return Ok(());
        };
        let answer = self
            .ask(&format!(
                "Type {} to overwrite its history, anything else cancels",
                confirmation.full_name()
            ))
            .await?;
        if !answer.is_some_and(|a| a.eq_ignore_ascii_case(confirmation.full_name())) {
            writeln!(self.out, "Cancelled; nothing was changed")?;
            return Ok(());
        }
        let options = PublishOptions {
            confirmation: Some(confirmation),
            ..options
        };
        let report = publish_once(self.dispatcher, &target, options, &self.credentials).await?;
        self.write_lines(&publish_lines(&report))
    }

    async fn identity(&mut self) -> Result<()> {
        let username = self.ask("Git user name").await?.unwrap_or_default();
        let email = self.ask("Git email").await?.unwrap_or_default();
        let outcome = self.dispatcher.orchestrator().configure_vcs_identity(
            &mut self.credentials,
            &username,
            &email,
        );
        self.write_lines(&outcome_lines(&outcome))
    }

    async fn token(&mut self) -> Result<()> {
        let token = self.ask("API token").await?.unwrap_or_default();
        let outcome = self
            .dispatcher
            .orchestrator()
            .configure_hosted_token(&mut self.credentials, &token)
            .await;
        self.write_lines(&outcome_lines(&outcome))
    }

    /// Prompt and read one trimmed line; `None` for blank input or end of input.
    async fn ask(&mut self, label: &str) -> Result<Option<String>> {
        Ok(self.read_line(label).await?.filter(|line| !line.is_empty()))
    }

    /// Prompt and read one trimmed line; `None` only at end of input.
    async fn read_line(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.out, "{label}: ")?;
        self.out.flush()?;
        let line = self.input.next_line().await?;
        Ok(line.map(|line| line.trim().to_string()))
    }

    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")
}
