//! Sequential, paced delivery of a batch of work items to one backend.
//!
//! A failed delivery is logged and counted; the remaining items are still
//! attempted. Items go out in the order received.

use std::time::Duration;

use herald_common::types::{ItemKind, WorkItem};

use crate::Notifier;

/// Delay inserted after each delivery attempt to stay under backend rate
/// limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    pub delay: Duration,
}

impl PacingPolicy {
    /// Default pause between two messages.
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);

    pub fn fixed(delay: Duration) -> Self {
        Self { delay }
    }

    /// No pause at all.
    pub fn none() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self::fixed(Self::DEFAULT_DELAY)
    }
}

/// Counters for one completed dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliverySummary {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// What a dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The batch was empty; the backend was not contacted.
    NothingToSend,
    /// The backend is unconfigured; the reason was logged.
    Skipped(String),
    Completed(DeliverySummary),
}

/// Drives a [`Notifier`] over a batch of items.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    pacing: PacingPolicy,
}

impl Dispatcher {
    pub fn new(pacing: PacingPolicy) -> Self {
        Self { pacing }
    }

    pub fn pacing(&self) -> PacingPolicy {
        self.pacing
    }

    /// Deliver every item through `notifier`.
    pub async fn dispatch<N: Notifier>(
        &self,
        notifier: &N,
        repo: &str,
        kind: ItemKind,
        items: &[WorkItem],
    ) -> DispatchOutcome {
        if items.is_empty() {
            tracing::info!(backend = notifier.name(), %kind, "No items found within the specified time frame");
            return DispatchOutcome::NothingToSend;
        }

        if let Some(reason) = notifier.skip_reason() {
            tracing::info!(backend = notifier.name(), reason = %reason, "Skipping notification");
            return DispatchOutcome::Skipped(reason);
        }

        tracing::info!(
            backend = notifier.name(),
            %kind,
            count = items.len(),
            "Sending notifications"
        );

        let mut summary = DeliverySummary::default();

        for (index, item) in items.iter().enumerate() {
            let payload = notifier.build_payload(kind, repo, item);
            summary.attempted += 1;

            match notifier.deliver(&payload).await {
                Ok(()) => {
                    summary.delivered += 1;
                    tracing::info!(
                        backend = notifier.name(),
                        title = %item.title,
                        url = %item.url,
                        "Posted notification"
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(
                        backend = notifier.name(),
                        title = %item.title,
                        url = %item.url,
                        error = %e,
                        "Failed to post notification"
                    );
                }
            }

            let has_next = index + 1 < items.len();
            if has_next && !self.pacing.delay.is_zero() {
                tracing::debug!(
                    delay_ms = self.pacing.delay.as_millis() as u64,
                    "Waiting before sending the next message"
                );
                tokio::time::sleep(self.pacing.delay).await;
            }
        }

        tracing::info!(
            backend = notifier.name(),
            repo,
            attempted = summary.attempted,
            delivered = summary.delivered,
            failed = summary.failed,
            "All notifications processed"
        );

        DispatchOutcome::Completed(summary)
    }
}
