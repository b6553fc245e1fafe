//! Discord backend: embed messages posted to an incoming webhook.

use async_trait::async_trait;
use serde::Serialize;

use herald_common::error::{AppError, Result};
use herald_common::types::{DiscordTarget, ItemKind, WorkItem};

use crate::{Notifier, mention, quoted_labels};

/// Embed color for issues (red).
pub const ISSUE_COLOR: u32 = 15_548_997;

/// Embed color for pull requests (green).
pub const PULL_REQUEST_COLOR: u32 = 5_763_719;

/// JSON body of a webhook execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscordPayload {
    /// Plain-text mention prefix, only when mentions are configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    pub footer: EmbedFooter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// Build the Discord message for one item.
pub fn build_payload(
    kind: ItemKind,
    repo: &str,
    item: &WorkItem,
    target: &DiscordTarget,
) -> DiscordPayload {
    let (title, color, footer, link) = match kind {
        ItemKind::Issue => (
            format!("📈 New Issue in {repo}"),
            ISSUE_COLOR,
            "Mark as acknowledged after triaging 👍",
            "View Issue",
        ),
        ItemKind::PullRequest => (
            format!("🚀 New Pull Request in {repo}"),
            PULL_REQUEST_COLOR,
            "Review and acknowledge👍",
            "View PR",
        ),
    };

    let mut lines = vec![format!("**Title:** {}", item.title)];
    if kind == ItemKind::PullRequest && !item.author.is_empty() {
        lines.push(format!("**Author:** {}", item.author));
    }
    if let Some(labels) = quoted_labels(&item.labels) {
        lines.push(format!("**Labels:** {labels}"));
    }
    let description = format!("{}\n\n[{link}]({})", lines.join("\n"), item.url);

    let author = (!item.author.is_empty()).then(|| EmbedAuthor {
        name: item.author.clone(),
        icon_url: item.author_avatar_url.clone(),
    });

    DiscordPayload {
        content: mention::render(target.mention.as_ref()),
        embeds: vec![Embed {
            title,
            description,
            color,
            author,
            footer: EmbedFooter {
                text: footer.to_string(),
            },
        }],
    }
}

/// Posts messages to one Discord webhook.
pub struct DiscordNotifier {
    http: reqwest::Client,
    target: DiscordTarget,
}

impl DiscordNotifier {
    pub fn new(http: reqwest::Client, target: DiscordTarget) -> Self {
        Self { http, target }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    type Payload = DiscordPayload;

    fn name(&self) -> &'static str {
        "discord"
    }

    fn skip_reason(&self) -> Option<String> {
        self.target
            .webhook_url
            .is_none()
            .then(|| "No Discord webhook URL provided".to_string())
    }

    fn build_payload(&self, kind: ItemKind, repo: &str, item: &WorkItem) -> DiscordPayload {
        build_payload(kind, repo, item, &self.target)
    }

    async fn deliver(&self, payload: &DiscordPayload) -> Result<()> {
        let url = self
            .target
            .webhook_url
            .as_deref()
            .ok_or_else(|| AppError::Delivery("Discord webhook URL missing".to_string()))?;

        let response = self.http.post(url).json(payload).send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(AppError::Delivery(format!("Discord returned {status}: {body}")))
        }
    }
}
