use herald_common::error::Result;
use herald_common::types::{ItemKind, RepoCoordinates};

use crate::github::{GitHubClient, Page, RawItem};
use crate::window::TimeWindow;

/// Login of the automated dependency-update bot whose pull requests are
/// never notified.
pub const DEPENDENCY_BOT_LOGIN: &str = "dependabot[bot]";

/// Default upper bound on pages walked in a single run.
pub const DEFAULT_MAX_PAGES: u32 = 50;

/// How far the fetcher walks the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Trust newest-first ordering and stop at the first page holding an
    /// item older than the window.
    #[default]
    NewestFirst,
    /// Walk every page the host advertises, up to the page bound.
    FullScan,
}

/// Result of filtering one listing page.
#[derive(Debug, Clone, Default)]
pub struct PageFilter {
    pub eligible: Vec<RawItem>,
    /// Some record on the page was created before the pagination cutoff.
    pub reached_cutoff: bool,
}

/// Walks the paginated open-items listing and keeps only items created
/// inside the time window.
pub struct ItemFetcher {
    client: GitHubClient,
    mode: FetchMode,
    max_pages: u32,
}

impl ItemFetcher {
    pub fn new(client: GitHubClient) -> Self {
        Self {
            client,
            mode: FetchMode::default(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_mode(mut self, mode: FetchMode) -> Self {
        if mode == FetchMode::FullScan {
            tracing::info!("Full scan enabled, early pagination stop disabled");
        }
        self.mode = mode;
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Fetch every eligible item of `kind`, newest first.
    ///
    /// A failed page aborts the walk and the error is returned; items
    /// gathered from earlier pages are discarded with it.
    pub async fn fetch(
        &self,
        kind: ItemKind,
        repo: &RepoCoordinates,
        window: &TimeWindow,
    ) -> Result<Vec<RawItem>> {
        tracing::info!(
            %kind,
            url = %self.client.listing_url(kind, repo),
            since = %window.since_cutoff,
            "Fetching new items"
        );

        let mut collected = Vec::new();
        let mut page = 1u32;

        loop {
            tracing::debug!(page, %kind, "Fetching page");

            let Page { items, has_next } = self
                .client
                .list_page(kind, repo, page, Some(window.since_cutoff))
                .await?;

            if items.is_empty() {
                break;
            }

            let fetched = items.len();
            let filtered = filter_page(kind, window, items);
            tracing::debug!(
                page,
                fetched,
                eligible = filtered.eligible.len(),
                reached_cutoff = filtered.reached_cutoff,
                "Filtered page"
            );
            collected.extend(filtered.eligible);

            if !has_next {
                break;
            }

            if self.mode == FetchMode::NewestFirst && filtered.reached_cutoff {
                tracing::debug!(page, "Reached items older than the window, stopping early");
                break;
            }

            if page >= self.max_pages {
                tracing::warn!(
                    max_pages = self.max_pages,
                    "Page limit reached, remaining pages not fetched"
                );
                break;
            }

            page += 1;
        }

        tracing::info!(%kind, count = collected.len(), "Fetched new item(s)");
        Ok(collected)
    }
}

/// Apply kind, bot and creation-time filtering to one page.
pub fn filter_page(kind: ItemKind, window: &TimeWindow, items: Vec<RawItem>) -> PageFilter {
    let reached_cutoff = items
        .iter()
        .any(|item| window.is_before_since(item.created_at));

    let eligible = items
        .into_iter()
        .filter(|item| match kind {
            // Issue listings also return pull requests
            ItemKind::Issue => !item.is_pull_request(),
            ItemKind::PullRequest => item.author_login() != Some(DEPENDENCY_BOT_LOGIN),
        })
        .filter(|item| window.includes(item.created_at))
        .collect();

    PageFilter {
        eligible,
        reached_cutoff,
    }
}
