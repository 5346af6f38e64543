// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote URL parsing on top of `gix::url`.
//!
//! ```text
//! git@github.com:owner/repo.git        \
//! ssh://git@github.com:22/owner/repo    +--> https://github.com/owner/repo
//! https://token@github.com/owner/repo/ /
//! ```

use crate::error::GitError;

/// Host, owner and repository name extracted from a remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLocation {
    pub host: String,
    pub owner: String,
    pub name: String,
}

impl RemoteLocation {
    /// Parse scp-like (`user@host:owner/repo`) and scheme URLs
    /// (`https://`, `ssh://`, `git://`). Local paths yield None.
    #[must_use]
    pub fn parse(url: &str) -> Option<Self> {
        let parsed = gix::url::parse(url.trim().as_bytes().into()).ok()?;
        if parsed.scheme == gix::url::Scheme::File {
            return None;
        }
        let host = parsed.host().filter(|h| !h.is_empty())?;

        let path = std::str::from_utf8(&parsed.path).ok()?.trim_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let (owner, name) = path.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }

        Some(Self {
            host: host.to_ascii_lowercase(),
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Canonical browser URL: `https://host/owner/name`.
    #[must_use]
    pub fn web_url(&self) -> String {
        format!("https://{}/{}/{}", self.host, self.owner, self.name)
    }

    /// `owner/name`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Parse `url` and require it to live on `expected_host`.
///
/// # Errors
///
/// Returns `GitError::UnrecognizedHost` if the URL cannot be parsed or points
/// at a different host.
pub fn locate_on_host(url: &str, expected_host: &str) -> Result<RemoteLocation, GitError> {
    RemoteLocation::parse(url)
        .filter(|loc| loc.host.eq_ignore_ascii_case(expected_host))
        .ok_or_else(|| GitError::UnrecognizedHost {
            url: url.to_string(),
            expected_host: expected_host.to_string(),
        })
}
