// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::api::testing::{MockTransport, Reply};
use crate::api::Method;
use crate::store::{KeyValueStorage, MemoryStorage, TOKEN_KEY, USERNAME_KEY};
use serde_json::json;
use sisam_core::ApiOrigin;
use std::time::Duration;

struct Harness {
    controller: SessionController<MockTransport>,
    mock: MockTransport,
    storage: Arc<MemoryStorage>,
}

fn harness_with(storage: Arc<MemoryStorage>, mode: PollMode) -> Harness {
    let mock = MockTransport::new().with_empty_collections();
    mock.on(
        Method::Post,
        "/users/login",
        Reply::ok(json!({"token": "tok-1", "username": "alice"})),
    );
    let tokens = Arc::new(TokenStore::load(storage.clone()));
    let origin = ApiOrigin::parse("https://api.sisam.test").unwrap();
    let api = ApiClient::with_transport(origin, mock.clone(), tokens);
    let controller = SessionController::new(api, PollIntervals::default()).with_poll_mode(mode);
    Harness {
        controller,
        mock,
        storage,
    }
}

fn harness() -> Harness {
    harness_with(Arc::new(MemoryStorage::new()), PollMode::OnDemand)
}

fn alice() -> Credentials {
    Credentials::new("alice", "secret")
}

async fn logged_in() -> Harness {
    let mut h = harness();
    h.mock.on(
        Method::Get,
        "/posts/feed",
        Reply::ok(json!([{"id": 1, "like_count": 3, "has_liked": false}])),
    );
    h.controller.login(&alice()).await.unwrap();
    h.controller.refresh().await.unwrap();
    h
}

// ── authentication ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_authenticates_and_persists_token() {
    let mut h = harness();

    h.controller.login(&alice()).await.unwrap();

    assert_eq!(h.controller.state(), SessionState::Authenticated);
    assert_eq!(h.controller.username().as_deref(), Some("alice"));
    assert_eq!(
        h.storage.get(TOKEN_KEY).unwrap().as_deref(),
        Some("tok-1")
    );
    assert_eq!(
        h.storage.get(USERNAME_KEY).unwrap().as_deref(),
        Some("alice")
    );
    assert_eq!(h.controller.resources().mode(), Some(PollMode::OnDemand));
    assert!(h.controller.resources().feed().is_active());
}

#[tokio::test]
async fn test_login_falls_back_to_submitted_username() {
    let mut h = harness();
    h.mock.on(Method::Post, "/users/login", Reply::ok(json!({"token": "t"})));

    h.controller.login(&alice()).await.unwrap();

    assert_eq!(h.controller.username().as_deref(), Some("alice"));
}

#[tokio::test(start_paused = true)]
async fn test_login_populates_all_four_collections() {
    let mut h = harness_with(Arc::new(MemoryStorage::new()), PollMode::Background);
    h.mock.on(Method::Get, "/posts/feed", Reply::ok(json!([{"id": 1}])));
    h.mock.on(Method::Get, "/stories/", Reply::ok(json!([{"id": 1}])));
    h.mock.on(
        Method::Get,
        "/notifications/",
        Reply::ok(json!([{"id": 1, "text": "hi"}])),
    );
    h.mock.on(
        Method::Get,
        "/messages/conversations",
        Reply::ok(json!([{"user": {"username": "bob"}}])),
    );

    h.controller.login(&alice()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(h.controller.feed().len(), 1);
    assert_eq!(h.controller.stories().len(), 1);
    assert_eq!(h.controller.notifications().len(), 1);
    assert_eq!(h.controller.conversations().len(), 1);
    let events = h.controller.drain_events();
    assert_eq!(events.len(), 4);
    assert!(events
        .iter()
        .all(|e| matches!(e, PollEvent::Updated { count: 1, .. })));
}

#[tokio::test]
async fn test_login_failure_persists_nothing() {
    let mut h = harness();
    h.mock.on(
        Method::Post,
        "/users/login",
        Reply::status(401, "bad credentials"),
    );

    let err = h.controller.login(&alice()).await.unwrap_err();

    assert!(err.is_auth());
    assert_eq!(h.controller.state(), SessionState::AuthenticationFailed);
    assert_eq!(h.storage.get(TOKEN_KEY).unwrap(), None);
    assert!(h
        .controller
        .status_message()
        .unwrap()
        .contains("bad credentials"));
    assert!(!h.controller.resources().feed().is_active());
}

#[tokio::test]
async fn test_retry_after_failure() {
    let mut h = harness();
    h.mock.once(Method::Post, "/users/login", Reply::status(401, "nope"));

    assert!(h.controller.login(&alice()).await.is_err());
    h.controller.retry(&alice()).await.unwrap();

    assert_eq!(h.controller.state(), SessionState::Authenticated);
    assert_eq!(h.controller.status_message(), None);
}

#[tokio::test]
async fn test_acknowledge_returns_to_anonymous() {
    let mut h = harness();
    h.mock.on(Method::Post, "/users/login", Reply::Fail("refused".into()));

    assert!(h.controller.login(&alice()).await.is_err());
    h.controller.acknowledge().unwrap();

    assert_eq!(h.controller.state(), SessionState::Anonymous);
}

#[tokio::test]
async fn test_login_twice_is_an_invalid_transition() {
    let mut h = harness();
    h.controller.login(&alice()).await.unwrap();

    let err = h.controller.login(&alice()).await.unwrap_err();

    assert!(matches!(err, Error::InvalidTransition { .. }));
    assert!(err.to_string().contains("anonymous (logout)"));
    assert_eq!(h.controller.state(), SessionState::Authenticated);
}

#[yare::parameterized(
    empty_username = { "", "pw", "username" },
    blank_username = { "   ", "pw", "username" },
    empty_password = { "alice", "", "password" },
)]
#[test_macro(tokio::test)]
async fn test_login_validation(username: &str, password: &str, field: &str) {
    let mut h = harness();

    let err = h
        .controller
        .login(&Credentials::new(username, password))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::FieldEmpty { field: f } if f == field));
    assert_eq!(h.controller.state(), SessionState::Anonymous);
    assert!(h.mock.requests().is_empty());
}

#[tokio::test]
async fn test_signup_keeps_state() {
    let mut h = harness();
    h.mock.on(Method::Post, "/users/signup", Reply::ok(json!({})));

    h.controller.signup(&alice()).await.unwrap();

    assert_eq!(h.controller.state(), SessionState::Anonymous);
    assert_eq!(h.mock.requests_to(Method::Post, "/users/signup").len(), 1);
}

#[tokio::test]
async fn test_signup_rejection_while_logged_in_keeps_session() {
    let mut h = logged_in().await;
    h.mock.on(Method::Post, "/users/signup", Reply::status(403, "signups closed"));

    let err = h.controller.signup(&alice()).await.unwrap_err();

    assert!(err.is_auth());
    assert_eq!(h.controller.state(), SessionState::Authenticated);
    assert_eq!(h.controller.tokens().current_token().as_deref(), Some("tok-1"));
    assert_eq!(h.storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
    assert!(h.controller.status_message().unwrap().contains("signups closed"));
    assert!(!h.controller.feed().is_empty());
}

// ── logout ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_logout_clears_everything() {
    let mut h = logged_in().await;
    assert_eq!(h.controller.feed().len(), 1);

    h.controller.logout().unwrap();

    assert_eq!(h.controller.state(), SessionState::Anonymous);
    assert_eq!(h.controller.tokens().current_token(), None);
    assert_eq!(h.storage.get(TOKEN_KEY).unwrap(), None);
    assert!(h.controller.feed().is_empty());
    assert!(h.controller.stories().is_empty());
    assert!(h.controller.notifications().is_empty());
    assert!(h.controller.conversations().is_empty());

    let before = h.mock.requests().len();
    assert!(!h.controller.resources().feed().tick().await.unwrap());
    assert_eq!(h.mock.requests().len(), before);
    assert!(h.controller.feed().is_empty());
}

#[tokio::test]
async fn test_logout_when_anonymous_fails() {
    let mut h = harness();

    let err = h.controller.logout().unwrap_err();

    assert!(err
        .to_string()
        .contains("cannot go from anonymous to anonymous"));
}

#[tokio::test]
async fn test_logout_drops_open_conversation_and_pending_edits() {
    let mut h = logged_in().await;
    h.controller.open_conversation("bob").unwrap();

    h.controller.logout().unwrap();

    assert_eq!(h.controller.resources().open_username(), None);
    assert_eq!(h.controller.pending_mutations(), 0);
}

// ── forced logout ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_rejected_token_on_mutation_forces_logout() {
    let mut h = logged_in().await;
    h.mock.on(Method::Post, "/posts/1/like", Reply::status(401, "expired"));

    let err = h.controller.like(1).await.unwrap_err();

    assert!(err.is_auth());
    assert_eq!(h.controller.state(), SessionState::Anonymous);
    assert_eq!(h.controller.status_message(), Some(SESSION_EXPIRED));
    assert_eq!(h.storage.get(TOKEN_KEY).unwrap(), None);
    assert!(h.controller.feed().is_empty());
}

#[tokio::test]
async fn test_rejected_token_on_poll_forces_logout() {
    let mut h = logged_in().await;
    h.mock.on(Method::Get, "/stories/", Reply::status(403, "forbidden"));

    assert!(h.controller.refresh().await.is_err());

    assert_eq!(h.controller.state(), SessionState::Anonymous);
    assert_eq!(h.controller.tokens().current_token(), None);
    assert!(!h.controller.resources().feed().is_active());
}

#[tokio::test]
async fn test_server_error_keeps_session() {
    let mut h = logged_in().await;
    h.mock.on(Method::Get, "/posts/7/comments", Reply::status(500, "oops"));

    assert!(h.controller.comments(7).await.is_err());

    assert_eq!(h.controller.state(), SessionState::Authenticated);
    assert!(h.controller.status_message().unwrap().contains("oops"));
}

#[tokio::test]
async fn test_background_poll_failure_is_quiet() {
    let mut h = logged_in().await;
    h.mock.on(Method::Get, "/stories/", Reply::status(500, "oops"));

    // Same path a running poller takes: the tick reports through the
    // event channel only.
    assert!(h.controller.resources().stories().tick().await.is_err());
    let events = h.controller.drain_events();

    assert!(matches!(
        events.as_slice(),
        [PollEvent::Failed { auth: false, .. }]
    ));
    assert_eq!(h.controller.state(), SessionState::Authenticated);
    assert_eq!(h.controller.status_message(), None);
}

#[tokio::test]
async fn test_handle_error_when_anonymous_only_records_message() {
    let mut h = harness();

    h.controller.handle_error(&Error::from_status(401, "no".into()));

    assert_eq!(h.controller.state(), SessionState::Anonymous);
    assert!(h.controller.status_message().unwrap().contains("no"));
}

// ── restore ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_restore_with_persisted_token() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(TOKEN_KEY, "persisted").unwrap();
    storage.set(USERNAME_KEY, "alice").unwrap();
    let mut h = harness_with(storage, PollMode::OnDemand);

    h.controller.restore();

    assert_eq!(h.controller.state(), SessionState::Authenticated);
    assert_eq!(h.controller.username().as_deref(), Some("alice"));
    assert!(h.mock.requests().is_empty());

    h.controller.refresh().await.unwrap();
    let sent = h.mock.requests_to(Method::Get, "/posts/feed");
    assert_eq!(sent[0].token.as_deref(), Some("persisted"));
}

#[tokio::test]
async fn test_restore_without_token_stays_anonymous() {
    let mut h = harness();

    h.controller.restore();

    assert_eq!(h.controller.state(), SessionState::Anonymous);
    assert!(matches!(
        h.controller.refresh().await.unwrap_err(),
        Error::NotAuthenticated
    ));
}

// ── mutations through the controller ────────────────────────────────────────

#[tokio::test]
async fn test_like_overlays_feed_until_newer_snapshot() {
    let mut h = logged_in().await;
    h.mock.on(
        Method::Post,
        "/posts/1/like",
        Reply::ok(json!({"like_count": 4, "has_liked": true})),
    );

    let state = h.controller.like(1).await.unwrap();
    assert_eq!(
        state,
        LikeState {
            like_count: 4,
            has_liked: true
        }
    );
    // The snapshot still says 3, but it predates the like.
    assert_eq!(h.controller.feed()[0].like_count, 4);
    assert!(h.controller.feed()[0].has_liked);

    // Someone else liked it meanwhile; a fresh snapshot wins.
    h.mock.on(
        Method::Get,
        "/posts/feed",
        Reply::ok(json!([{"id": 1, "like_count": 5, "has_liked": true}])),
    );
    h.controller.refresh().await.unwrap();
    assert_eq!(h.controller.feed()[0].like_count, 5);
}

#[tokio::test]
async fn test_like_unknown_post_refreshes_feed_first() {
    let mut h = logged_in().await;
    h.mock.on(
        Method::Get,
        "/posts/feed",
        Reply::ok(json!([{"id": 9, "like_count": 1, "has_liked": false}])),
    );
    h.mock.on(
        Method::Post,
        "/posts/9/like",
        Reply::ok(json!({"like_count": 2, "has_liked": true})),
    );
    let feed_requests = h.mock.requests_to(Method::Get, "/posts/feed").len();

    h.controller.like(9).await.unwrap();

    assert_eq!(
        h.mock.requests_to(Method::Get, "/posts/feed").len(),
        feed_requests + 1
    );
}

#[tokio::test]
async fn test_follow_starts_from_profile() {
    let mut h = logged_in().await;
    h.mock.on(
        Method::Get,
        "/users/bob",
        Reply::ok(json!({
            "user": {"username": "bob"},
            "followers_count": 7,
            "is_following": false
        })),
    );
    h.mock.on(
        Method::Post,
        "/users/bob/follow",
        Reply::ok(json!({"following": true, "followers_count": 8})),
    );

    let state = h.controller.follow("bob").await.unwrap();

    assert_eq!(
        state,
        FollowState {
            following: true,
            followers_count: 8
        }
    );
}

#[tokio::test]
async fn test_unfollow_failure_sets_status() {
    let mut h = logged_in().await;
    h.mock.on(
        Method::Get,
        "/users/bob",
        Reply::ok(json!({"user": {"username": "bob"}, "followers_count": 7, "is_following": true})),
    );
    h.mock.on(Method::Post, "/users/bob/unfollow", Reply::status(500, "try later"));

    assert!(h.controller.unfollow("bob").await.is_err());

    assert!(h.controller.status_message().unwrap().contains("try later"));
    let profile = h.controller.profile("bob").await.unwrap();
    assert!(profile.is_following);
    assert_eq!(profile.followers_count, 7);
}

// ── validation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_requires_authentication() {
    let mut h = harness();

    assert!(matches!(
        h.controller.like(1).await.unwrap_err(),
        Error::NotAuthenticated
    ));
    assert!(matches!(
        h.controller.search("cats").await.unwrap_err(),
        Error::NotAuthenticated
    ));
    assert!(h.mock.requests().is_empty());
}

#[tokio::test]
async fn test_upload_without_file_is_rejected() {
    let mut h = logged_in().await;
    let before = h.mock.requests().len();

    let post = h.controller.create_post("caption", None).await.unwrap_err();
    let story = h.controller.create_story("caption", None).await.unwrap_err();

    assert!(matches!(post, Error::FieldRequired { field: "media file" }));
    assert!(matches!(story, Error::FieldRequired { field: "media file" }));
    assert_eq!(h.mock.requests().len(), before);
}

#[tokio::test]
async fn test_create_post_refreshes_feed() {
    let mut h = logged_in().await;
    h.mock.on(Method::Post, "/posts/", Reply::ok(json!({"id": 2})));
    h.mock.on(
        Method::Get,
        "/posts/feed",
        Reply::ok(json!([{"id": 2}, {"id": 1}])),
    );

    h.controller
        .create_post("hello", Some(MediaFile::new("a.jpg", vec![1, 2])))
        .await
        .unwrap();

    assert_eq!(h.controller.feed().len(), 2);
}

#[yare::parameterized(
    empty = { "" },
    blank = { "  \n" },
)]
#[test_macro(tokio::test)]
async fn test_empty_texts_are_rejected(text: &str) {
    let mut h = logged_in().await;
    let before = h.mock.requests().len();

    assert!(matches!(
        h.controller.add_comment(1, text).await.unwrap_err(),
        Error::FieldEmpty { field: "comment" }
    ));
    assert!(matches!(
        h.controller.send_message("bob", text).await.unwrap_err(),
        Error::FieldEmpty { field: "message" }
    ));
    assert_eq!(h.mock.requests().len(), before);
}

#[tokio::test]
async fn test_blank_search_sends_no_request() {
    let mut h = logged_in().await;
    let before = h.mock.requests().len();

    let results = h.controller.search("   ").await.unwrap();

    assert!(results.is_empty());
    assert_eq!(h.mock.requests().len(), before);
}

// ── messages ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_messages_with_opens_conversation() {
    let mut h = logged_in().await;
    h.mock.on(
        Method::Get,
        "/messages/with/bob",
        Reply::ok(json!([{"text": "hi"}, {"text": "there"}])),
    );

    let messages = h.controller.messages_with("bob").await.unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(h.controller.resources().open_username(), Some("bob"));

    h.controller.close_conversation();
    assert_eq!(h.controller.messages(), None);
}

#[tokio::test]
async fn test_send_message_refreshes_open_conversation() {
    let mut h = logged_in().await;
    h.mock.once(Method::Get, "/messages/with/bob", Reply::ok(json!([])));
    h.mock.on(
        Method::Get,
        "/messages/with/bob",
        Reply::ok(json!([{"text": "hello bob"}])),
    );
    h.mock.on(Method::Post, "/messages/with/bob", Reply::ok(json!({})));
    h.controller.messages_with("bob").await.unwrap();

    h.controller.send_message("bob", "hello bob").await.unwrap();

    assert_eq!(h.controller.messages().unwrap().len(), 1);
}

#[tokio::test]
async fn test_mark_notifications_read_refreshes() {
    let mut h = logged_in().await;
    h.mock.once(
        Method::Get,
        "/notifications/",
        Reply::ok(json!([{"id": 1, "text": "a", "is_read": false}])),
    );
    h.controller.refresh().await.unwrap();
    assert_eq!(h.controller.unread_notifications(), 1);
    h.mock.on(Method::Post, "/notifications/mark_read", Reply::ok(json!({})));
    h.mock.on(
        Method::Get,
        "/notifications/",
        Reply::ok(json!([{"id": 1, "text": "a", "is_read": true}])),
    );

    h.controller.mark_notifications_read().await.unwrap();

    assert_eq!(h.controller.unread_notifications(), 0);
}
