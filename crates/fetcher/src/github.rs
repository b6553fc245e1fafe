//! Minimal GitHub REST client for the open issue / pull request listings.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, LINK, USER_AGENT};
use serde::{Deserialize, Serialize};

use herald_common::error::{AppError, Result};
use herald_common::types::{ItemKind, RepoCoordinates};

/// Largest page size the listing endpoints accept.
pub const PAGE_SIZE: u32 = 100;

const API_VERSION: &str = "2022-11-28";

/// One record as returned by the host listing endpoints.
///
/// Only the fields the monitors read are declared; everything else is
/// ignored on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub user: Option<RawUser>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub labels: Vec<RawLabel>,
    /// Present on issue-listing records that are actually pull requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

impl RawItem {
    /// Author login, if the host reported one.
    pub fn author_login(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.login.as_deref())
    }

    /// Whether this record is a pull request.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A label, either the full label object or a bare name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLabel {
    Object { name: String },
    Name(String),
}

impl RawLabel {
    pub fn name(&self) -> &str {
        match self {
            RawLabel::Object { name } | RawLabel::Name(name) => name,
        }
    }
}

/// One page of a listing plus the continuation signal.
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<RawItem>,
    pub has_next: bool,
}

/// Bearer-authenticated client for one GitHub API host.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Listing URL for the given item kind.
    pub fn listing_url(&self, kind: ItemKind, repo: &RepoCoordinates) -> String {
        let endpoint = match kind {
            ItemKind::Issue => "issues",
            ItemKind::PullRequest => "pulls",
        };
        format!(
            "{}/repos/{}/{}/{}",
            self.base_url, repo.owner, repo.name, endpoint
        )
    }

    /// Fetch one page of open items, newest first.
    ///
    /// `since` is only sent to the issues endpoint, which filters on update
    /// time server-side. Anything created after `since` was also updated
    /// after it, so this never hides an eligible item.
    pub async fn list_page(
        &self,
        kind: ItemKind,
        repo: &RepoCoordinates,
        page: u32,
        since: Option<DateTime<Utc>>,
    ) -> Result<Page> {
        let url = self.listing_url(kind, repo);

        let mut query: Vec<(&str, String)> = vec![
            ("state", "open".to_string()),
            ("sort", "created".to_string()),
            ("direction", "desc".to_string()),
            ("per_page", PAGE_SIZE.to_string()),
            ("page", page.to_string()),
        ];
        if let (ItemKind::Issue, Some(since)) = (kind, since) {
            query.push(("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header(USER_AGENT, concat!("repo-herald/", env!("CARGO_PKG_VERSION")))
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamFetch(format!(
                "{status} from {url}: {body}"
            )));
        }

        let has_next = has_next_page(response.headers());
        let items: Vec<RawItem> = response.json().await?;

        Ok(Page { items, has_next })
    }
}

/// Whether the `Link` header advertises a `rel="next"` page.
pub fn has_next_page(headers: &HeaderMap) -> bool {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.contains("rel=\"next\""))
}
