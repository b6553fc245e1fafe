//! Integration tests for the Slack and Discord backends against mock HTTP
//! endpoints.

use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{any, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use herald_common::types::{
    DiscordMentionKind, DiscordTarget, ItemKind, Mention, SlackMentionKind, SlackTarget, WorkItem,
};
use herald_notifier::{
    DeliverySummary, DiscordNotifier, DispatchOutcome, Dispatcher, Notifier, PacingPolicy,
    SlackNotifier,
};

fn item(number: u32) -> WorkItem {
    WorkItem {
        kind: ItemKind::PullRequest,
        title: format!("Change {number}"),
        url: format!("https://github.com/acme/widgets/pull/{number}"),
        author: "alice".to_string(),
        author_avatar_url: Some("https://avatars/alice".to_string()),
        created_at: Utc::now(),
        labels: vec!["enhancement".to_string()],
    }
}

fn dispatcher() -> Dispatcher {
    Dispatcher::new(PacingPolicy::none())
}

#[tokio::test]
async fn test_slack_posts_each_item_with_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .and(header("authorization", "Bearer xoxb-test"))
        .and(body_partial_json(json!({
            "channel": "C123",
            "unfurl_links": false,
            "unfurl_media": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(2)
        .mount(&server)
        .await;

    let notifier = SlackNotifier::new(
        reqwest::Client::new(),
        server.uri(),
        SlackTarget {
            token: Some("xoxb-test".to_string()),
            channel: Some("C123".to_string()),
            mention: Some(Mention {
                kind: SlackMentionKind::Group,
                ids: vec!["S1".to_string()],
            }),
        },
    );

    let outcome = dispatcher()
        .dispatch(&notifier, "widgets", ItemKind::PullRequest, &[item(1), item(2)])
        .await;

    assert_eq!(
        outcome,
        DispatchOutcome::Completed(DeliverySummary {
            attempted: 2,
            delivered: 2,
            failed: 0,
        })
    );
}

#[tokio::test]
async fn test_slack_api_error_is_a_delivery_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "ok": false, "error": "channel_not_found" })),
        )
        .mount(&server)
        .await;

    let notifier = SlackNotifier::new(
        reqwest::Client::new(),
        server.uri(),
        SlackTarget {
            token: Some("xoxb-test".to_string()),
            channel: Some("C404".to_string()),
            mention: None,
        },
    );

    let payload = notifier.build_payload(ItemKind::PullRequest, "widgets", &item(1));
    let err = notifier.deliver(&payload).await.unwrap_err();
    assert!(err.to_string().contains("channel_not_found"));
}

#[tokio::test]
async fn test_discord_posts_embed_to_webhook() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/webhooks/1/token"))
        .and(body_partial_json(json!({
            "content": "<@&42>",
            "embeds": [{ "title": "🚀 New Pull Request in widgets", "color": 5763719 }]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = DiscordNotifier::new(
        reqwest::Client::new(),
        DiscordTarget {
            webhook_url: Some(format!("{}/api/webhooks/1/token", server.uri())),
            mention: Some(Mention {
                kind: DiscordMentionKind::Role,
                ids: vec!["42".to_string()],
            }),
        },
    );

    let outcome = dispatcher()
        .dispatch(&notifier, "widgets", ItemKind::PullRequest, &[item(1)])
        .await;

    assert!(matches!(
        outcome,
        DispatchOutcome::Completed(DeliverySummary { delivered: 1, .. })
    ));
}

#[tokio::test]
async fn test_discord_rate_limit_on_one_item_does_not_stop_the_batch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "embeds": [{ "description": "**Title:** Change 2\n**Author:** alice\n**Labels:** `enhancement`\n\n[View PR](https://github.com/acme/widgets/pull/2)" }] })))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "message": "You are being rate limited.",
            "retry_after": 1.5
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    let notifier = DiscordNotifier::new(
        reqwest::Client::new(),
        DiscordTarget {
            webhook_url: Some(format!("{}/api/webhooks/1/token", server.uri())),
            mention: None,
        },
    );

    let outcome = dispatcher()
        .dispatch(
            &notifier,
            "widgets",
            ItemKind::PullRequest,
            &[item(1), item(2), item(3)],
        )
        .await;

    assert_eq!(
        outcome,
        DispatchOutcome::Completed(DeliverySummary {
            attempted: 3,
            delivered: 2,
            failed: 1,
        })
    );
}

#[tokio::test]
async fn test_discord_without_webhook_makes_no_calls() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let notifier = DiscordNotifier::new(reqwest::Client::new(), DiscordTarget::default());

    let outcome = dispatcher()
        .dispatch(&notifier, "widgets", ItemKind::PullRequest, &[item(1)])
        .await;

    assert_eq!(
        outcome,
        DispatchOutcome::Skipped("No Discord webhook URL provided".to_string())
    );
}
