//! GitHub REST client for release publication and actor lookup.
//!
//! One release invocation makes at most two calls: an optional
//! `GET /users/{username}` to resolve the acting identity, and a single
//! `POST /repos/{owner}/{repo}/releases`. Both are blocking with a fixed
//! timeout; expiry surfaces as a publication error the caller treats as
//! non-fatal to already-completed git state.

use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::GithubConfig;
use crate::error::{ReleaseError, Result};

/// Body of the release-creation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleasePayload {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_commitish: Option<String>,
}

/// The subset of the release object this crate consumes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublishedRelease {
    #[serde(default)]
    pub body: String,
    pub html_url: String,
}

/// GitHub user profile fields used for identity resolution
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Hosting platform seam for release creation
pub trait ReleaseHost: Send + Sync {
    fn create_release(&self, payload: &ReleasePayload) -> Result<PublishedRelease>;
}

/// Bearer-token authenticated GitHub API client
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::blocking::Client,
    api_url: String,
    token: String,
    repository: String,
}

impl GithubClient {
    /// Build a client for one `owner/name` repository slug
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        repository: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("mono-release/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReleaseError::publish(format!("Cannot build HTTP client: {}", e)))?;

        Ok(GithubClient {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            repository: repository.into(),
        })
    }

    /// Resolve the `owner/name` slug from configuration, falling back to the
    /// GITHUB_REPOSITORY environment variable the CI runner provides.
    pub fn resolve_repository(config: &GithubConfig) -> Result<String> {
        if let Some(slug) = &config.repository {
            return Ok(slug.clone());
        }

        std::env::var("GITHUB_REPOSITORY").map_err(|_| {
            ReleaseError::config(
                "No repository configured and GITHUB_REPOSITORY is not set",
            )
        })
    }

    /// Fetch a user's public profile
    pub fn get_user(&self, username: &str) -> Result<UserProfile> {
        let url = format!("{}/users/{}", self.api_url, username);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .map_err(|e| ReleaseError::publish(format!("Cannot reach {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(ReleaseError::publish(format!(
                "User lookup for '{}' returned {}",
                username,
                response.status()
            )));
        }

        response
            .json()
            .map_err(|e| ReleaseError::publish(format!("Malformed user response: {}", e)))
    }
}

impl ReleaseHost for GithubClient {
    fn create_release(&self, payload: &ReleasePayload) -> Result<PublishedRelease> {
        let url = format!("{}/repos/{}/releases", self.api_url, self.repository);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(payload)
            .send()
            .map_err(|e| ReleaseError::publish(format!("Cannot reach {}: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(ReleaseError::publish(format!(
                "Release creation returned {}: {}",
                status,
                body.trim()
            )));
        }

        response
            .json()
            .map_err(|e| ReleaseError::publish(format!("Malformed release response: {}", e)))
    }
}

/// In-memory host for tests: records payloads and answers with a canned
/// release, or fails every call when scripted to.
pub struct MockHost {
    releases: Mutex<Vec<ReleasePayload>>,
    fail: bool,
}

impl MockHost {
    pub fn new() -> Self {
        MockHost {
            releases: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// A host that fails every create call
    pub fn failing() -> Self {
        MockHost {
            releases: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Payloads received so far
    pub fn releases(&self) -> Vec<ReleasePayload> {
        self.releases.lock().unwrap().clone()
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseHost for MockHost {
    fn create_release(&self, payload: &ReleasePayload) -> Result<PublishedRelease> {
        if self.fail {
            return Err(ReleaseError::publish("Scripted publish failure"));
        }
        self.releases.lock().unwrap().push(payload.clone());
        Ok(PublishedRelease {
            body: payload.body.clone(),
            html_url: format!("https://example.test/releases/{}", payload.tag_name),
        })
    }
}
