//! Notification delivery.
//!
//! Each backend implements [`Notifier`]: a pure payload builder plus a
//! delivery call. The [`dispatcher::Dispatcher`] drives any notifier over a
//! batch of work items with pacing and per-item error isolation.

pub mod discord;
pub mod dispatcher;
pub mod mention;
pub mod slack;

use async_trait::async_trait;
use serde::Serialize;

use herald_common::error::Result;
use herald_common::types::{ItemKind, WorkItem};

pub use discord::DiscordNotifier;
pub use dispatcher::{DeliverySummary, DispatchOutcome, Dispatcher, PacingPolicy};
pub use slack::SlackNotifier;

/// Capability shared by every notification backend.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Backend-specific message body.
    type Payload: Serialize + Send + Sync;

    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Why this backend cannot deliver, when a required credential or
    /// address is missing. `None` means the backend is usable.
    fn skip_reason(&self) -> Option<String>;

    /// Build the message for one item. Never performs I/O.
    fn build_payload(&self, kind: ItemKind, repo: &str, item: &WorkItem) -> Self::Payload;

    /// Send one message.
    async fn deliver(&self, payload: &Self::Payload) -> Result<()>;
}

/// Labels as a comma-separated list of backtick-quoted names.
pub(crate) fn quoted_labels(labels: &[String]) -> Option<String> {
    if labels.is_empty() {
        return None;
    }
    Some(
        labels
            .iter()
            .map(|label| format!("`{label}`"))
            .collect::<Vec<_>>()
            .join(", "),
    )
}
