// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! REST payloads. Only the fields this tool reads are declared.

use serde::{Deserialize, Serialize};

/// The account a token belongs to (`GET /user`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Account {
    pub login: String,
    pub name: Option<String>,
}

/// Repository metadata (`GET /repos/{owner}/{repo}`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteRepository {
    pub name: String,
    pub full_name: String,
    pub clone_url: String,
    pub ssh_url: String,
    pub html_url: String,
    pub private: bool,
    pub description: Option<String>,
    pub default_branch: Option<String>,
}

/// Body of `POST /user/repos`.
#[derive(Debug, Clone, Serialize)]
pub struct NewRepository<'a> {
    pub name: &'a str,
    pub private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    /// The local history is pushed afterwards, so the remote starts empty.
    pub auto_init: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserRef {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommitAuthor {
    pub name: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommitDetail {
    pub message: String,
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommitSummary {
    pub sha: String,
    pub html_url: String,
    pub commit: CommitDetail,
}

impl CommitSummary {
    /// First line of the commit message.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.commit.message.lines().next().unwrap_or_default()
    }

    #[must_use]
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}

/// Open pull request or issue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IssueSummary {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub user: Option<UserRef>,
    /// Present when an `/issues` entry is really a pull request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

/// Recent commits, open pull requests and open issues of one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecentActivity {
    pub commits: Vec<CommitSummary>,
    pub pulls: Vec<IssueSummary>,
    pub issues: Vec<IssueSummary>,
}
