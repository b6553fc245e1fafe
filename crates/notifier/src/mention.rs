//! Mention rendering for both backends.

use herald_common::types::{DiscordMentionKind, Mention, SlackMentionKind};

/// Backend-specific syntax for mentioning one id.
pub trait MentionSyntax {
    fn wrap(&self, id: &str) -> String;
}

impl MentionSyntax for SlackMentionKind {
    fn wrap(&self, id: &str) -> String {
        match self {
            SlackMentionKind::User => format!("<@{id}>"),
            SlackMentionKind::Group => format!("<!subteam^{id}>"),
        }
    }
}

impl MentionSyntax for DiscordMentionKind {
    fn wrap(&self, id: &str) -> String {
        match self {
            DiscordMentionKind::User => format!("<@{id}>"),
            DiscordMentionKind::Role => format!("<@&{id}>"),
        }
    }
}

/// Render every configured id in order, space separated.
///
/// Returns `None` when there is nothing to mention, so callers omit the
/// segment entirely.
pub fn render<K: MentionSyntax>(mention: Option<&Mention<K>>) -> Option<String> {
    let mention = mention?;
    let rendered: Vec<String> = mention
        .ids
        .iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(|id| mention.kind.wrap(id))
        .collect();

    (!rendered.is_empty()).then(|| rendered.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention<K>(kind: K, ids: &[&str]) -> Mention<K> {
        Mention {
            kind,
            ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_slack_user_mentions_in_order() {
        let m = mention(SlackMentionKind::User, &["A", "B"]);
        assert_eq!(render(Some(&m)).as_deref(), Some("<@A> <@B>"));
    }

    #[test]
    fn test_slack_group_mentions() {
        let m = mention(SlackMentionKind::Group, &["S1"]);
        assert_eq!(render(Some(&m)).as_deref(), Some("<!subteam^S1>"));
    }

    #[test]
    fn test_discord_mentions() {
        let users = mention(DiscordMentionKind::User, &["1", "2"]);
        assert_eq!(render(Some(&users)).as_deref(), Some("<@1> <@2>"));
        let roles = mention(DiscordMentionKind::Role, &["9"]);
        assert_eq!(render(Some(&roles)).as_deref(), Some("<@&9>"));
    }

    #[test]
    fn test_empty_or_absent_mention_renders_nothing() {
        let empty = mention(SlackMentionKind::User, &[]);
        assert_eq!(render(Some(&empty)), None);
        let blank = mention(DiscordMentionKind::Role, &["  "]);
        assert_eq!(render(Some(&blank)), None);
        assert_eq!(render::<SlackMentionKind>(None), None);
    }
}
