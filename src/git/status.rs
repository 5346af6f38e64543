// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Working-tree state as reported by `git status --porcelain=v1 --branch`.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

fn branch_line() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^## (?:(?P<unborn>No commits yet on |Initial commit on ))?(?P<branch>.+?)(?:\.\.\.(?P<upstream>\S+))?(?: \[(?P<track>[^\]]+)\])?$",
        )
        .ok()
    })
    .as_ref()
}

fn track_item() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?P<dir>ahead|behind) (?P<n>[0-9]+)$").ok())
        .as_ref()
}

/// Snapshot of a local repository. Derived on demand, never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VcsState {
    pub initialized: bool,
    pub current_branch: Option<String>,
    pub has_remote: bool,
    pub remote_url: Option<String>,
    pub is_dirty: bool,
    pub ahead_count: u32,
    pub behind_count: u32,
    pub last_commit: Option<LastCommit>,
}

impl VcsState {
    /// State of a directory that is not a repository.
    #[must_use]
    pub fn uninitialized() -> Self {
        Self::default()
    }
}

/// HEAD commit summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastCommit {
    /// Committer time, seconds since the Unix epoch.
    pub timestamp: i64,
    pub message: String,
}

impl LastCommit {
    /// Parse `%ct%x1f%s` output.
    #[must_use]
    pub fn parse_log_line(line: &str) -> Option<Self> {
        let (timestamp, message) = line.split_once('\u{1f}')?;
        Some(Self {
            timestamp: timestamp.trim().parse().ok()?,
            message: message.to_string(),
        })
    }
}

/// How a path differs from HEAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Change recorded in the index only.
    Staged,
    /// Change in the working tree only.
    Modified,
    /// Change in the index with further edits in the working tree.
    StagedAndModified,
    Untracked,
    /// Unmerged path left by a failed merge.
    Conflicted,
}

impl ChangeKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Staged => "staged",
            Self::Modified => "modified",
            Self::StagedAndModified => "staged+modified",
            Self::Untracked => "untracked",
            Self::Conflicted => "conflicted",
        }
    }

    fn from_codes(index: char, worktree: char) -> Option<Self> {
        match (index, worktree) {
            ('?', '?') => Some(Self::Untracked),
            ('!', '!') => None,
            ('U', _) | (_, 'U') | ('A', 'A') | ('D', 'D') => Some(Self::Conflicted),
            (' ', ' ') => None,
            (' ', _) => Some(Self::Modified),
            (_, ' ') => Some(Self::Staged),
            _ => Some(Self::StagedAndModified),
        }
    }
}

/// One changed path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub path: String,
    pub kind: ChangeKind,
}

/// Branch header of the porcelain output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchInfo {
    /// None when HEAD is detached.
    pub name: Option<String>,
    pub upstream: Option<String>,
    /// No commit exists yet.
    pub unborn: bool,
    pub ahead: u32,
    pub behind: u32,
    /// Upstream is configured but no longer exists on the remote.
    pub upstream_gone: bool,
}

impl BranchInfo {
    fn parse(line: &str) -> Option<Self> {
        let caps = branch_line()?.captures(line)?;
        let branch = caps.name("branch")?.as_str();
        let mut info = Self {
            name: (!branch.starts_with("HEAD (")).then(|| branch.to_string()),
            upstream: caps.name("upstream").map(|m| m.as_str().to_string()),
            unborn: caps.name("unborn").is_some(),
            ..Self::default()
        };

        if let Some(track) = caps.name("track") {
            for item in track.as_str().split(", ") {
                if item == "gone" {
                    info.upstream_gone = true;
                    continue;
                }
                let Some(item) = track_item().and_then(|re| re.captures(item)) else {
                    continue;
                };
                let n = item["n"].parse().unwrap_or(0);
                match &item["dir"] {
                    "ahead" => info.ahead = n,
                    _ => info.behind = n,
                }
            }
        }
        Some(info)
    }
}

/// Parsed `git status --porcelain=v1 --branch` output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PorcelainStatus {
    pub branch: BranchInfo,
    pub entries: Vec<StatusEntry>,
}

impl PorcelainStatus {
    #[must_use]
    pub fn parse(output: &str) -> Self {
        let mut status = Self::default();
        for line in output.lines() {
            if line.starts_with("## ") {
                if let Some(branch) = BranchInfo::parse(line) {
                    status.branch = branch;
                }
                continue;
            }

            let mut codes = line.chars();
            let (Some(index), Some(worktree)) = (codes.next(), codes.next()) else {
                continue;
            };
            let Some(kind) = ChangeKind::from_codes(index, worktree) else {
                continue;
            };
            let Some(path) = line.get(3..) else {
                continue;
            };
            // renames list "old -> new"; report the new name
            let path = path.rsplit_once(" -> ").map_or(path, |(_, new)| new);
            status.entries.push(StatusEntry {
                path: unquote(path),
                kind,
            });
        }
        status
    }

    /// Any tracked or untracked change present.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.entries.is_empty()
    }

    #[must_use]
    pub fn count(&self, kind: ChangeKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}

/// Git quotes paths containing spaces or special characters.
fn unquote(path: &str) -> String {
    path.strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .map_or_else(|| path.to_string(), |p| p.replace("\\\"", "\"").replace("\\\\", "\\"))
}
