//! RepoHerald binary entrypoint: one monitor run per invocation.

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use herald_common::config::AppConfig;
use herald_common::types::Task;
use herald_engine::{Backends, Monitor, MonitorOutcome, MonitorRequest};
use herald_fetcher::{FetchMode, GitHubClient, ItemFetcher};
use herald_notifier::{Dispatcher, PacingPolicy};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "herald_action=info,herald_engine=info,herald_fetcher=info,herald_notifier=info",
        )
    });
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!(task = %config.task, repo = %config.repo, "RepoHerald starting...");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let monitor = build_monitor(&config, http);
    let request = MonitorRequest {
        repo: config.repo.clone(),
        target: config.target.clone(),
        lookback_hours: config.lookback_hours,
        hard_window_hours: config.hard_window_hours,
    };

    match monitor.run(&request).await {
        Ok(outcome) => {
            log_outcome(&outcome);
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Monitor run failed");
            Err(e.into())
        }
    }
}

fn build_monitor(config: &AppConfig, http: reqwest::Client) -> Monitor {
    let mode = if config.full_scan {
        FetchMode::FullScan
    } else {
        FetchMode::NewestFirst
    };

    let fetcher = ItemFetcher::new(GitHubClient::new(
        http.clone(),
        config.github_api_url.clone(),
        config.git_token.clone(),
    ))
    .with_mode(mode)
    .with_max_pages(config.max_pages);

    let dispatcher = Dispatcher::new(PacingPolicy::fixed(Duration::from_secs(
        config.notify_delay_secs,
    )));

    let backends = Backends {
        http,
        slack_api_url: config.slack_api_url.clone(),
    };

    match config.task {
        Task::MonitorIssues => Monitor::issues(fetcher, dispatcher, backends),
        Task::MonitorPrs => Monitor::pull_requests(fetcher, dispatcher, backends),
    }
}

fn log_outcome(outcome: &MonitorOutcome) {
    match outcome {
        MonitorOutcome::NoItems => tracing::info!("Run finished: nothing to notify"),
        MonitorOutcome::NotifierDisabled => tracing::info!("Run finished: notifications disabled"),
        MonitorOutcome::Dispatched(dispatch) => {
            tracing::info!(outcome = ?dispatch, "Run finished");
        }
    }
}
