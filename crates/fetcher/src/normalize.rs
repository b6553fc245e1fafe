use herald_common::types::{ItemKind, WorkItem};

use crate::github::{RawItem, RawLabel};

/// Map a raw host record to a `WorkItem`.
///
/// Missing author data degrades to an empty login and no avatar; labels
/// are reduced to their names.
pub fn normalize(kind: ItemKind, raw: &RawItem) -> WorkItem {
    let user = raw.user.as_ref();

    WorkItem {
        kind,
        title: raw.title.clone(),
        url: raw.html_url.clone(),
        author: user
            .and_then(|u| u.login.clone())
            .unwrap_or_default(),
        author_avatar_url: user
            .and_then(|u| u.avatar_url.clone())
            .filter(|url| !url.is_empty()),
        created_at: raw.created_at,
        labels: raw.labels.iter().map(RawLabel::name).map(str::to_string).collect(),
    }
}

/// Normalize a batch, preserving order.
pub fn normalize_all(kind: ItemKind, raw: &[RawItem]) -> Vec<WorkItem> {
    raw.iter().map(|item| normalize(kind, item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::RawUser;
    use chrono::{TimeZone, Utc};

    fn record() -> RawItem {
        RawItem {
            title: "Fix bug".to_string(),
            html_url: "https://x/1".to_string(),
            user: Some(RawUser {
                login: Some("alice".to_string()),
                avatar_url: Some("https://avatars/alice".to_string()),
            }),
            created_at: Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap(),
            labels: vec![
                RawLabel::Object { name: "bug".into() },
                RawLabel::Name("urgent".into()),
            ],
            pull_request: None,
        }
    }

    #[test]
    fn test_normalize_maps_fields() {
        let item = normalize(ItemKind::PullRequest, &record());
        assert_eq!(item.kind, ItemKind::PullRequest);
        assert_eq!(item.title, "Fix bug");
        assert_eq!(item.url, "https://x/1");
        assert_eq!(item.author, "alice");
        assert_eq!(item.author_avatar_url.as_deref(), Some("https://avatars/alice"));
        assert_eq!(item.labels, vec!["bug", "urgent"]);
    }

    #[test]
    fn test_normalize_tolerates_missing_user() {
        let mut raw = record();
        raw.user = None;
        let item = normalize(ItemKind::Issue, &raw);
        assert_eq!(item.author, "");
        assert_eq!(item.author_avatar_url, None);

        raw.user = Some(RawUser {
            login: None,
            avatar_url: Some(String::new()),
        });
        let item = normalize(ItemKind::Issue, &raw);
        assert_eq!(item.author, "");
        assert_eq!(item.author_avatar_url, None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = record();
        assert_eq!(
            normalize(ItemKind::Issue, &raw),
            normalize(ItemKind::Issue, &raw)
        );
    }

    #[test]
    fn test_normalize_all_preserves_order() {
        let mut second = record();
        second.title = "Second".into();
        let items = normalize_all(ItemKind::Issue, &[record(), second]);
        assert_eq!(items[0].title, "Fix bug");
        assert_eq!(items[1].title, "Second");
    }
}
