//! Slack backend: Block Kit payloads posted through `chat.postMessage`.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use herald_common::error::{AppError, Result};
use herald_common::types::{ItemKind, SlackTarget, WorkItem};

use crate::{Notifier, mention, quoted_labels};

/// Body of a `chat.postMessage` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlackPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Fallback text shown in notifications.
    pub text: String,
    pub blocks: Vec<Block>,
    pub unfurl_links: bool,
    pub unfurl_media: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: TextObject,
    },
    Section {
        fields: Vec<TextObject>,
        #[serde(skip_serializing_if = "Option::is_none")]
        accessory: Option<Element>,
    },
    Context {
        elements: Vec<TextObject>,
    },
    Actions {
        elements: Vec<Element>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String, emoji: bool },
    Mrkdwn { text: String },
}

impl TextObject {
    fn mrkdwn(text: impl Into<String>) -> Self {
        TextObject::Mrkdwn { text: text.into() }
    }

    fn plain(text: impl Into<String>) -> Self {
        TextObject::PlainText {
            text: text.into(),
            emoji: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Image {
        image_url: String,
        alt_text: String,
    },
    Button {
        text: TextObject,
        url: String,
        style: String,
    },
}

/// Build the Slack message for one item.
pub fn build_payload(
    kind: ItemKind,
    repo: &str,
    item: &WorkItem,
    target: &SlackTarget,
) -> SlackPayload {
    let (header, mention_label, footer, button) = match kind {
        ItemKind::Issue => (
            format!("📈 New Issue in {repo}"),
            "Assignee",
            "*(Mark as acknowledged👍 after triaging)*",
            "View Issue",
        ),
        ItemKind::PullRequest => (
            format!("🚀 New Pull Request in {repo}"),
            "Reviewer",
            "*(Review and acknowledge👍)*",
            "View PR",
        ),
    };

    let mut fields = vec![TextObject::mrkdwn(format!("*Title:*\n{}", item.title))];
    if kind == ItemKind::PullRequest && !item.author.is_empty() {
        fields.push(TextObject::mrkdwn(format!("*Author:*\n{}", item.author)));
    }
    if let Some(labels) = quoted_labels(&item.labels) {
        fields.push(TextObject::mrkdwn(format!("*Labels:*\n{labels}")));
    }
    if let Some(mentions) = mention::render(target.mention.as_ref()) {
        fields.push(TextObject::mrkdwn(format!("*{mention_label}:* {mentions}")));
    }

    let accessory = item.author_avatar_url.as_ref().map(|url| Element::Image {
        image_url: url.clone(),
        alt_text: "Author's Avatar".to_string(),
    });

    SlackPayload {
        channel: target.channel.clone(),
        text: format!("{header}: {}", item.title),
        blocks: vec![
            Block::Header {
                text: TextObject::plain(header),
            },
            Block::Section { fields, accessory },
            Block::Context {
                elements: vec![TextObject::mrkdwn(footer)],
            },
            Block::Actions {
                elements: vec![Element::Button {
                    text: TextObject::plain(button),
                    url: item.url.clone(),
                    style: "primary".to_string(),
                }],
            },
        ],
        unfurl_links: false,
        unfurl_media: false,
    }
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Posts messages to one Slack channel with a bot token.
pub struct SlackNotifier {
    http: reqwest::Client,
    api_url: String,
    target: SlackTarget,
}

impl SlackNotifier {
    pub fn new(http: reqwest::Client, api_url: impl Into<String>, target: SlackTarget) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            target,
        }
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    type Payload = SlackPayload;

    fn name(&self) -> &'static str {
        "slack"
    }

    fn skip_reason(&self) -> Option<String> {
        if self.target.token.is_none() {
            Some("No Slack token provided".to_string())
        } else if self.target.channel.is_none() {
            Some("No Slack channel provided".to_string())
        } else {
            None
        }
    }

    fn build_payload(&self, kind: ItemKind, repo: &str, item: &WorkItem) -> SlackPayload {
        build_payload(kind, repo, item, &self.target)
    }

    async fn deliver(&self, payload: &SlackPayload) -> Result<()> {
        let token = self
            .target
            .token
            .as_deref()
            .ok_or_else(|| AppError::Delivery("Slack token missing".to_string()))?;

        let response = self
            .http
            .post(format!("{}/chat.postMessage", self.api_url))
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Delivery(format!("Slack returned {status}")));
        }

        let body: PostMessageResponse = response.json().await?;
        if body.ok {
            Ok(())
        } else {
            Err(AppError::Delivery(
                body.error.unwrap_or_else(|| "unknown Slack error".to_string()),
            ))
        }
    }
}
