// repo-setup: Publish local folders as hosted Git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Hosted repository gateway (GitHub REST API).
//!
//! ```text
//! HostedClient::new(api_url, timeout)
//!   authenticated_user()   GET  /user
//!   repository()           GET  /repos/{owner}/{repo}     404 -> None
//!   create_repository()    POST /user/repos               422 -> AlreadyExists
//!   recent_activity()      GET  commits | pulls | issues  (concurrent)
//!
//! 401/403 -> Unauthorized, other non-2xx -> HttpError (body kept)
//! Global client: OnceLock, connection pool, keep-alive
//! ```

pub mod types;


use crate::config::types::HostedConfig;
use crate::error::{HostedError, SetupResult};
use crate::git::remote::RemoteLocation;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

use types::{Account, CommitSummary, IssueSummary, NewRepository, RecentActivity, RemoteRepository};

const ACCEPT: &str = "application/vnd.github+json";

/// Global HTTP client, initialized once and reused for every request.
fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(format!("repo-setup/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Thin client for the endpoints the orchestrator needs.
#[derive(Debug, Clone)]
pub struct HostedClient {
    api_url: String,
    timeout: Duration,
}

impl HostedClient {
    #[must_use]
    pub fn new(api_url: &str, timeout: Duration) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &HostedConfig) -> Self {
        Self::new(&config.api_url, config.timeout())
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn request(&self, method: reqwest::Method, path: &str, token: &str) -> (String, RequestBuilder) {
        let url = format!("{}{path}", self.api_url);
        let builder = global_client()
            .request(method, &url)
            .bearer_auth(token)
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", "2022-11-28")
            .timeout(self.timeout);
        (url, builder)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> SetupResult<T> {
        let (url, builder) = self.request(reqwest::Method::GET, path, token);
        let response = send(builder).await?;
        let response = check_status(response, &url).await?;
        Ok(response.json::<T>().await.map_err(HostedError::Reqwest)?)
    }

    /// Resolve the account owning `token`. Also serves as token validation.
    ///
    /// # Errors
    ///
    /// Returns `HostedError::Unauthorized` if the token is rejected, or another
    /// `HostedError` on transport or decoding failures.
    pub async fn authenticated_user(&self, token: &str) -> SetupResult<Account> {
        debug!(api = %self.api_url, "resolving authenticated user");
        self.get_json("/user", token).await
    }

    /// Fetch repository metadata, None if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns a `HostedError` for any response other than 2xx or 404.
    pub async fn repository(
        &self,
        token: &str,
        owner: &str,
        name: &str,
    ) -> SetupResult<Option<RemoteRepository>> {
        let (url, builder) =
            self.request(reqwest::Method::GET, &format!("/repos/{owner}/{name}"), token);
        let response = send(builder).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(owner, name, "repository absent");
            return Ok(None);
        }
        let response = check_status(response, &url).await?;
        let repo = response
            .json::<RemoteRepository>()
            .await
            .map_err(HostedError::Reqwest)?;
        Ok(Some(repo))
    }

    /// Create a repository under the authenticated account.
    ///
    /// # Errors
    ///
    /// Returns `HostedError::AlreadyExists` if the name is taken, or another
    /// `HostedError` on failure.
    pub async fn create_repository(
        &self,
        token: &str,
        new: &NewRepository<'_>,
    ) -> SetupResult<RemoteRepository> {
        debug!(name = new.name, private = new.private, "creating repository");
        let (url, builder) = self.request(reqwest::Method::POST, "/user/repos", token);
        let response = send(builder.json(new)).await?;

        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            let body = response.text().await.unwrap_or_default();
            if body.contains("already exists") {
                return Err(HostedError::AlreadyExists {
                    name: new.name.to_string(),
                }
                .into());
            }
            return Err(HostedError::HttpError {
                status: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
                url,
                body,
            }
            .into());
        }

        let response = check_status(response, &url).await?;
        Ok(response
            .json::<RemoteRepository>()
            .await
            .map_err(HostedError::Reqwest)?)
    }

    /// Most recent commits on the default branch.
    ///
    /// # Errors
    ///
    /// Returns a `HostedError` on any failed request.
    pub async fn list_commits(
        &self,
        token: &str,
        location: &RemoteLocation,
        limit: u8,
    ) -> SetupResult<Vec<CommitSummary>> {
        let path = format!("/repos/{}/commits?per_page={limit}", location.full_name());
        self.get_json(&path, token).await
    }

    /// Open pull requests.
    ///
    /// # Errors
    ///
    /// Returns a `HostedError` on any failed request.
    pub async fn list_open_pulls(
        &self,
        token: &str,
        location: &RemoteLocation,
        limit: u8,
    ) -> SetupResult<Vec<IssueSummary>> {
        let path = format!(
            "/repos/{}/pulls?state=open&per_page={limit}",
            location.full_name()
        );
        self.get_json(&path, token).await
    }

    /// Open issues, with pull requests filtered out.
    ///
    /// # Errors
    ///
    /// Returns a `HostedError` on any failed request.
    pub async fn list_open_issues(
        &self,
        token: &str,
        location: &RemoteLocation,
        limit: u8,
    ) -> SetupResult<Vec<IssueSummary>> {
        let path = format!(
            "/repos/{}/issues?state=open&per_page={limit}",
            location.full_name()
        );
        let issues: Vec<IssueSummary> = self.get_json(&path, token).await?;
        Ok(issues
            .into_iter()
            .filter(|issue| issue.pull_request.is_none())
            .collect())
    }

    /// Commits, pull requests and issues fetched concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first `HostedError` among the three requests.
    pub async fn recent_activity(
        &self,
        token: &str,
        location: &RemoteLocation,
        limit: u8,
    ) -> SetupResult<RecentActivity> {
        let (commits, pulls, issues) = futures_util::future::try_join3(
            self.list_commits(token, location, limit),
            self.list_open_pulls(token, location, limit),
            self.list_open_issues(token, location, limit),
        )
        .await?;
        Ok(RecentActivity {
            commits,
            pulls,
            issues,
        })
    }
}

async fn send(builder: RequestBuilder) -> SetupResult<Response> {
    Ok(builder.send().await.map_err(HostedError::Reqwest)?)
}

async fn check_status(response: Response, url: &str) -> SetupResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return Err(HostedError::Unauthorized {
            status: status.as_u16(),
            body,
        }
        .into());
    }
    Err(HostedError::HttpError {
        status: status.as_u16(),
        url: url.to_string(),
        body,
    }
    .into())
}
