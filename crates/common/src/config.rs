use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::types::{
    DiscordTarget, Mention, NotificationTarget, RepoCoordinates, SlackTarget, Task,
};

/// Default GitHub REST endpoint.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Default Slack Web API endpoint.
pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";

/// Global application configuration loaded from environment variables.
///
/// Action inputs arrive as `INPUT_<NAME>` variables. Empty values are
/// treated as unset.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Monitoring task to run
    pub task: Task,

    /// Repository API token
    pub git_token: String,

    /// Repository to monitor
    pub repo: RepoCoordinates,

    /// Lookback in hours. Validated when the time window is resolved.
    pub lookback_hours: Option<i64>,

    /// Optional tighter inclusion window in hours
    pub hard_window_hours: Option<i64>,

    /// Disable the newest-first early stop and walk every page
    pub full_scan: bool,

    /// Backend selector and addressing
    pub target: NotificationTarget,

    /// GitHub REST base URL (default: https://api.github.com)
    pub github_api_url: String,

    /// Slack Web API base URL (default: https://slack.com/api)
    pub slack_api_url: String,

    /// Per-request HTTP timeout in seconds (default: 30)
    pub http_timeout_secs: u64,

    /// Pause between two notifications in seconds (default: 5)
    pub notify_delay_secs: u64,

    /// Upper bound on listing pages fetched per run (default: 50)
    pub max_pages: u32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        if dotenvy::dotenv().is_ok() {
            tracing::debug!("Loaded variables from .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let git_token = get("INPUT_GIT_SECRET").ok_or_else(|| {
            AppError::Config(
                "'git_secret' is a mandatory input. Please provide a valid GitHub token."
                    .to_string(),
            )
        })?;

        let task = get("INPUT_TASK")
            .unwrap_or_default()
            .parse::<Task>()
            .map_err(AppError::Config)?;

        let repo = resolve_repo(
            get("INPUT_REPO_OWNER"),
            get("INPUT_REPO_NAME"),
            get("GITHUB_REPOSITORY"),
        );

        let lookback_hours = get("INPUT_FETCH_DATA_INTERVAL")
            .map(|v| parse_hours("INPUT_FETCH_DATA_INTERVAL", &v))
            .transpose()?;
        let hard_window_hours = get("INPUT_NOTIFY_WINDOW")
            .map(|v| parse_hours("INPUT_NOTIFY_WINDOW", &v))
            .transpose()?;

        let slack = SlackTarget {
            token: get("INPUT_SLACK_BOT_TOKEN"),
            channel: get("INPUT_SLACK_CHANNEL"),
            mention: Mention::parse(
                get("INPUT_SLACK_ID_TYPE").as_deref(),
                get("INPUT_SLACK_IDS").as_deref(),
            ),
        };

        let discord = DiscordTarget {
            webhook_url: get("INPUT_DISCORD_WEBHOOK_URL"),
            mention: Mention::parse(
                get("INPUT_DISCORD_ID_TYPE").as_deref(),
                get("INPUT_DISCORD_IDS").as_deref(),
            ),
        };

        Ok(Self {
            task,
            git_token,
            repo,
            lookback_hours,
            hard_window_hours,
            full_scan: get("INPUT_FULL_SCAN")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            target: NotificationTarget {
                notifier: get("INPUT_NOTIFIER"),
                slack,
                discord,
            },
            github_api_url: get("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            slack_api_url: get("SLACK_API_URL")
                .unwrap_or_else(|| DEFAULT_SLACK_API_URL.to_string()),
            http_timeout_secs: parse_or("HTTP_TIMEOUT_SECS", get("HTTP_TIMEOUT_SECS"), 30)?,
            notify_delay_secs: parse_or("NOTIFY_DELAY_SECS", get("NOTIFY_DELAY_SECS"), 5)?,
            max_pages: parse_or("MAX_PAGES", get("MAX_PAGES"), 50)?,
        })
    }
}

/// Explicit owner/name inputs win; otherwise fall back to `owner/name`
/// from `GITHUB_REPOSITORY`.
fn resolve_repo(
    owner: Option<String>,
    name: Option<String>,
    github_repository: Option<String>,
) -> RepoCoordinates {
    let (fallback_owner, fallback_name) = github_repository
        .as_deref()
        .and_then(|full| full.split_once('/'))
        .map(|(o, n)| (o.to_string(), n.to_string()))
        .unwrap_or_default();

    RepoCoordinates {
        owner: owner.unwrap_or(fallback_owner),
        name: name.unwrap_or(fallback_name),
    }
}

fn parse_hours(key: &str, value: &str) -> Result<i64> {
    value
        .parse::<i64>()
        .map_err(|_| AppError::Config(format!("{key} must be a whole number of hours, got '{value}'")))
}

fn parse_or<T: std::str::FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    match value {
        Some(v) => v
            .parse()
            .map_err(|_| AppError::Config(format!("{key} has an invalid value '{v}'"))),
        None => Ok(default),
    }
}
