//! Monitor orchestration.
//!
//! One `Monitor` per item kind composes the pipeline:
//! 1. Resolve the time window from the configured lookback
//! 2. Fetch eligible records (a failed fetch counts as "no items")
//! 3. Normalize them into `WorkItem`s
//! 4. Select the configured backend and dispatch
//!
//! Only configuration errors escape `run`.

use std::str::FromStr;

use chrono::Utc;

use herald_common::error::Result;
use herald_common::types::{ItemKind, NotificationTarget, NotifierKind, RepoCoordinates};
use herald_fetcher::normalize::normalize_all;
use herald_fetcher::{ItemFetcher, TimeWindow};
use herald_notifier::{DiscordNotifier, DispatchOutcome, Dispatcher, SlackNotifier};

/// Inputs for one monitor run.
#[derive(Debug, Clone)]
pub struct MonitorRequest {
    pub repo: RepoCoordinates,
    pub target: NotificationTarget,
    /// Lookback in hours
    pub lookback_hours: Option<i64>,
    /// Optional tighter inclusion window in hours
    pub hard_window_hours: Option<i64>,
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// Nothing eligible in the window (or the fetch failed).
    NoItems,
    /// No usable backend selected; nothing was sent.
    NotifierDisabled,
    Dispatched(DispatchOutcome),
}

/// Shared settings for building backend clients.
#[derive(Debug, Clone)]
pub struct Backends {
    pub http: reqwest::Client,
    pub slack_api_url: String,
}

/// Monitors one kind of repository item.
pub struct Monitor {
    kind: ItemKind,
    fetcher: ItemFetcher,
    dispatcher: Dispatcher,
    backends: Backends,
}

impl Monitor {
    pub fn new(
        kind: ItemKind,
        fetcher: ItemFetcher,
        dispatcher: Dispatcher,
        backends: Backends,
    ) -> Self {
        Self {
            kind,
            fetcher,
            dispatcher,
            backends,
        }
    }

    /// Monitor for newly opened issues.
    pub fn issues(fetcher: ItemFetcher, dispatcher: Dispatcher, backends: Backends) -> Self {
        Self::new(ItemKind::Issue, fetcher, dispatcher, backends)
    }

    /// Monitor for newly opened pull requests.
    pub fn pull_requests(fetcher: ItemFetcher, dispatcher: Dispatcher, backends: Backends) -> Self {
        Self::new(ItemKind::PullRequest, fetcher, dispatcher, backends)
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Resolve the window against the current time, then run.
    pub async fn run(&self, request: &MonitorRequest) -> Result<MonitorOutcome> {
        let now = Utc::now();
        let mut window = TimeWindow::resolve(request.lookback_hours, now)?;
        if let Some(hours) = request.hard_window_hours {
            window = window.with_hard_cutoff(hours, now)?;
        }

        self.run_with_window(request, &window).await
    }

    /// Run against an already resolved window.
    pub async fn run_with_window(
        &self,
        request: &MonitorRequest,
        window: &TimeWindow,
    ) -> Result<MonitorOutcome> {
        tracing::info!(kind = %self.kind, repo = %request.repo, "Starting monitor");

        let raw = match self.fetcher.fetch(self.kind, &request.repo, window).await {
            Ok(raw) => raw,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::error!(
                    kind = %self.kind,
                    repo = %request.repo,
                    error = %e,
                    "Error fetching items"
                );
                Vec::new()
            }
        };

        let items = normalize_all(self.kind, &raw);
        if items.is_empty() {
            tracing::info!(kind = %self.kind, "No new {} found", self.kind.plural());
            return Ok(MonitorOutcome::NoItems);
        }

        let Some(backend) = select_backend(request.target.notifier.as_deref()) else {
            return Ok(MonitorOutcome::NotifierDisabled);
        };

        tracing::debug!(backend = %backend, count = items.len(), "Backend selected");

        let repo_name = request.repo.name.as_str();
        let outcome = match backend {
            NotifierKind::Slack => {
                let notifier = SlackNotifier::new(
                    self.backends.http.clone(),
                    self.backends.slack_api_url.clone(),
                    request.target.slack.clone(),
                );
                self.dispatcher
                    .dispatch(&notifier, repo_name, self.kind, &items)
                    .await
            }
            NotifierKind::Discord => {
                let notifier = DiscordNotifier::new(
                    self.backends.http.clone(),
                    request.target.discord.clone(),
                );
                self.dispatcher
                    .dispatch(&notifier, repo_name, self.kind, &items)
                    .await
            }
        };

        Ok(MonitorOutcome::Dispatched(outcome))
    }
}

/// Resolve the raw selector. Absent or unknown selectors disable
/// notification with a log line instead of failing the run.
pub fn select_backend(selector: Option<&str>) -> Option<NotifierKind> {
    let Some(raw) = selector else {
        tracing::info!("No notifier selected. Skipping notification.");
        return None;
    };

    match NotifierKind::from_str(raw) {
        Ok(kind) => Some(kind),
        Err(reason) => {
            tracing::info!(reason = %reason, "Unsupported notifier. Skipping notification.");
            None
        }
    }
}
