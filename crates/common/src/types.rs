use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of repository item being monitored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Issue,
    PullRequest,
}

impl ItemKind {
    /// Human label used in log lines and message headers.
    pub fn noun(&self) -> &'static str {
        match self {
            ItemKind::Issue => "Issue",
            ItemKind::PullRequest => "Pull Request",
        }
    }

    /// Lowercase plural for summary log lines ("issues", "pull requests").
    pub fn plural(&self) -> &'static str {
        match self {
            ItemKind::Issue => "issues",
            ItemKind::PullRequest => "pull requests",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Issue => write!(f, "issue"),
            ItemKind::PullRequest => write!(f, "pull_request"),
        }
    }
}

/// A normalized issue or pull request eligible for notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub kind: ItemKind,
    pub title: String,
    /// Browser URL of the item. Only used for logging and links.
    pub url: String,
    /// Author login, empty when the host omitted it.
    pub author: String,
    pub author_avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Label names in the order the host returned them.
    pub labels: Vec<String>,
}

/// Owner/name pair identifying a repository on the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoCoordinates {
    pub owner: String,
    pub name: String,
}

impl RepoCoordinates {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for RepoCoordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Supported notification backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    Slack,
    Discord,
}

impl FromStr for NotifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slack" => Ok(NotifierKind::Slack),
            "discord" => Ok(NotifierKind::Discord),
            other => Err(format!("unrecognized notifier '{other}'")),
        }
    }
}

impl std::fmt::Display for NotifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifierKind::Slack => write!(f, "slack"),
            NotifierKind::Discord => write!(f, "discord"),
        }
    }
}

/// Who to mention in Slack messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlackMentionKind {
    User,
    /// A Slack user group (`<!subteam^ID>`).
    Group,
}

impl FromStr for SlackMentionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(SlackMentionKind::User),
            "group" => Ok(SlackMentionKind::Group),
            other => Err(format!("unrecognized slack mention kind '{other}'")),
        }
    }
}

/// Who to mention in Discord messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscordMentionKind {
    User,
    Role,
}

impl FromStr for DiscordMentionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(DiscordMentionKind::User),
            "role" => Ok(DiscordMentionKind::Role),
            other => Err(format!("unrecognized discord mention kind '{other}'")),
        }
    }
}

/// Mention configuration: a mention kind plus the ordered ids to mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention<K> {
    pub kind: K,
    pub ids: Vec<String>,
}

impl<K: FromStr> Mention<K> {
    /// Parse a mention from raw inputs: a kind name and a comma-separated id
    /// list. Ids are trimmed and empty entries dropped. Returns `None` when
    /// the kind is unknown or no id remains.
    pub fn parse(kind: Option<&str>, ids: Option<&str>) -> Option<Self> {
        let kind = kind?.parse::<K>().ok()?;
        let ids: Vec<String> = ids?
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        if ids.is_empty() {
            return None;
        }

        Some(Self { kind, ids })
    }
}

/// Slack addressing. A missing token disables the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackTarget {
    pub token: Option<String>,
    pub channel: Option<String>,
    pub mention: Option<Mention<SlackMentionKind>>,
}

/// Discord addressing. A missing webhook URL disables the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordTarget {
    pub webhook_url: Option<String>,
    pub mention: Option<Mention<DiscordMentionKind>>,
}

/// Backend selector plus per-backend addressing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTarget {
    /// Raw selector as configured. Resolved by the monitor.
    pub notifier: Option<String>,
    pub slack: SlackTarget,
    pub discord: DiscordTarget,
}

/// Monitoring task requested by the invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    MonitorIssues,
    MonitorPrs,
}

impl Task {
    pub fn item_kind(&self) -> ItemKind {
        match self {
            Task::MonitorIssues => ItemKind::Issue,
            Task::MonitorPrs => ItemKind::PullRequest,
        }
    }
}

impl FromStr for Task {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "monitor-issues" => Ok(Task::MonitorIssues),
            "monitor-prs" => Ok(Task::MonitorPrs),
            other => Err(format!("Unsupported task: {other}")),
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Task::MonitorIssues => write!(f, "monitor-issues"),
            Task::MonitorPrs => write!(f, "monitor-prs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_kind_labels() {
        assert_eq!(ItemKind::Issue.noun(), "Issue");
        assert_eq!(ItemKind::Issue.plural(), "issues");
        assert_eq!(ItemKind::PullRequest.plural(), "pull requests");
        assert_eq!(ItemKind::PullRequest.to_string(), "pull_request");
    }

    #[test]
    fn test_notifier_kind_parse() {
        assert_eq!("slack".parse::<NotifierKind>(), Ok(NotifierKind::Slack));
        assert_eq!(" Discord ".parse::<NotifierKind>(), Ok(NotifierKind::Discord));
        assert!("teams".parse::<NotifierKind>().is_err());
        assert!("".parse::<NotifierKind>().is_err());
    }

    #[test]
    fn test_mention_parse_trims_and_keeps_order() {
        let mention: Mention<SlackMentionKind> =
            Mention::parse(Some("user"), Some(" U2, U1 ,,U3")).unwrap();
        assert_eq!(mention.kind, SlackMentionKind::User);
        assert_eq!(mention.ids, vec!["U2", "U1", "U3"]);
    }

    #[test]
    fn test_mention_parse_without_ids_is_none() {
        assert!(Mention::<SlackMentionKind>::parse(Some("group"), Some(" , ")).is_none());
        assert!(Mention::<SlackMentionKind>::parse(Some("group"), None).is_none());
    }

    #[test]
    fn test_mention_parse_unknown_kind_is_none() {
        // "role" is a Discord concept only
        assert!(Mention::<SlackMentionKind>::parse(Some("role"), Some("R1")).is_none());
        let discord: Mention<DiscordMentionKind> =
            Mention::parse(Some("role"), Some("R1")).unwrap();
        assert_eq!(discord.kind, DiscordMentionKind::Role);
    }

    #[test]
    fn test_task_parse() {
        assert_eq!("monitor-issues".parse::<Task>(), Ok(Task::MonitorIssues));
        assert_eq!("monitor-prs".parse::<Task>(), Ok(Task::MonitorPrs));
        assert_eq!(Task::MonitorPrs.item_kind(), ItemKind::PullRequest);
        assert!("monitor-commits".parse::<Task>().is_err());
    }

    #[test]
    fn test_repo_coordinates_display() {
        assert_eq!(RepoCoordinates::new("acme", "widgets").to_string(), "acme/widgets");
    }
}
