// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Plain-text rendering of orchestrator results.

use std::path::Path;
use std::sync::OnceLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use indicatif::{ProgressBar, ProgressStyle};

use crate::git::status::ChangeKind;
use crate::hosted::types::{IssueSummary, RecentActivity};
use crate::orchestrator::StatusReport;
use crate::orchestrator::outcome::{OperationOutcome, PublishReport};
use crate::worker::OperationResult;

/// Pre-validated spinner style for running operations.
fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template("{spinner:.green} [{elapsed}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        })
        .clone()
}

/// Spinner on stderr; hidden automatically when stderr is not a terminal.
#[must_use]
pub fn spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_style(spinner_style());
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Seconds since the Unix epoch.
#[must_use]
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

/// Coarse human age: "just now", "5 minutes ago", "3 days ago".
#[must_use]
pub fn relative_age(then: i64, now: i64) -> String {
    let secs = now.saturating_sub(then).max(0);
    let (n, unit) = match secs {
        0..60 => return "just now".to_string(),
        60..3_600 => (secs / 60, "minute"),
        3_600..86_400 => (secs / 3_600, "hour"),
        86_400..2_592_000 => (secs / 86_400, "day"),
        2_592_000..31_536_000 => (secs / 2_592_000, "month"),
        _ => (secs / 31_536_000, "year"),
    };
    let plural = if n == 1 { "" } else { "s" };
    format!("{n} {unit}{plural} ago")
}

#[must_use]
pub fn status_lines(path: &Path, report: &StatusReport, now: i64) -> Vec<String> {
    let state = &report.state;
    let mut lines = vec![format!("Folder:      {}", path.display())];
    if !state.initialized {
        lines.push("Repository:  not initialized".to_string());
        return lines;
    }

    lines.push(format!(
        "Branch:      {}",
        state.current_branch.as_deref().unwrap_or("(detached)")
    ));
    lines.push(format!(
        "Remote:      {}",
        state.remote_url.as_deref().unwrap_or("(none)")
    ));
    if let Some(upstream) = &report.upstream {
        lines.push(format!(
            "Upstream:    {upstream} (ahead {}, behind {})",
            state.ahead_count, state.behind_count
        ));
    }

    if state.is_dirty {
        let count = |kind: ChangeKind| report.entries.iter().filter(|e| e.kind == kind).count();
        let staged = count(ChangeKind::Staged) + count(ChangeKind::StagedAndModified);
        let modified = count(ChangeKind::Modified) + count(ChangeKind::StagedAndModified);
        lines.push(format!(
            "Changes:     {staged} staged, {modified} modified, {} untracked, {} conflicted",
            count(ChangeKind::Untracked),
            count(ChangeKind::Conflicted)
        ));
        for entry in &report.entries {
            lines.push(format!("  {:<16} {}", entry.kind.label(), entry.path));
        }
    } else {
        lines.push("Changes:     clean".to_string());
    }

    match &state.last_commit {
        Some(commit) => lines.push(format!(
            "Last commit: {} ({})",
            commit.message,
            relative_age(commit.timestamp, now)
        )),
        None => lines.push("Last commit: (none)".to_string()),
    }
    lines
}

/// Outcome line followed by the tool output, indented.
#[must_use]
pub fn outcome_lines(outcome: &OperationOutcome) -> Vec<String> {
    let mut lines = vec![outcome.to_string()];
    if let Some(detail) = &outcome.raw_detail {
        lines.extend(detail.lines().map(|l| format!("     {l}")));
    }
    lines
}

#[must_use]
pub fn publish_lines(report: &PublishReport) -> Vec<String> {
    let mut lines: Vec<String> = report.steps.iter().flat_map(outcome_lines).collect();
    if let Some(url) = &report.web_url {
        lines.push(format!("Repository:  {url}"));
    }
    lines
}

fn issue_line(issue: &IssueSummary) -> String {
    let author = issue.user.as_ref().map_or("?", |u| u.login.as_str());
    format!("  #{:<5} {} ({author})", issue.number, issue.title)
}

#[must_use]
pub fn activity_lines(activity: &RecentActivity) -> Vec<String> {
    let mut lines = vec![format!("Recent commits ({}):", activity.commits.len())];
    lines.extend(
        activity
            .commits
            .iter()
            .map(|c| format!("  {} {}", c.short_sha(), c.subject())),
    );
    lines.push(format!("Open pull requests ({}):", activity.pulls.len()));
    lines.extend(activity.pulls.iter().map(issue_line));
    lines.push(format!("Open issues ({}):", activity.issues.len()));
    lines.extend(activity.issues.iter().map(issue_line));
    lines
}

/// Lines for any dispatcher result.
#[must_use]
pub fn result_lines(path: &Path, result: &OperationResult, now: i64) -> Vec<String> {
    match result {
        OperationResult::Step(outcome) | OperationResult::Failed(outcome) => outcome_lines(outcome),
        OperationResult::Published(report) => publish_lines(report),
        OperationResult::Status(report) => status_lines(path, report, now),
        OperationResult::WebUrl(url) => vec![url.clone()],
        OperationResult::Activity(activity) => activity_lines(activity),
    }
}
