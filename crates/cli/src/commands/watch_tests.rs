// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use std::future::pending;

use super::*;
use crate::api::testing::Reply;
use crate::api::Method;
use crate::commands::testing::TestContext;
use crate::session::SESSION_EXPIRED;
use serde_json::json;

#[tokio::test(start_paused = true)]
async fn test_watch_stops_after_ticks() {
    let mut ctx = TestContext::with_mode(PollMode::Background).login().await;

    watch_impl(&mut ctx.session, &mut ctx.out, Some(4), None, pending::<()>())
        .await
        .unwrap();

    let output = ctx.output();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines.iter().all(|l| l.ends_with(": 0 items")));
    for resource in ["feed", "stories", "notifications", "conversations"] {
        assert!(lines.iter().any(|l| l.starts_with(resource)), "{}", resource);
    }
}

#[tokio::test(start_paused = true)]
async fn test_watch_includes_open_conversation() {
    let mut ctx = TestContext::with_mode(PollMode::Background);
    ctx.mock.on(
        Method::Get,
        "/messages/with/bob",
        Reply::ok(json!([{"text": "hi"}])),
    );
    let mut ctx = ctx.login().await;

    watch_impl(&mut ctx.session, &mut ctx.out, Some(5), Some("bob"), pending::<()>())
        .await
        .unwrap();

    assert!(ctx.output().contains("messages: 1 item\n"));
    assert!(ctx.session.resources().open_username().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_watch_ends_on_rejected_token() {
    let mut ctx = TestContext::with_mode(PollMode::Background);
    ctx.mock
        .on(Method::Get, "/posts/feed", Reply::status(401, "token expired"));
    let mut ctx = ctx.login().await;

    let err = watch_impl(&mut ctx.session, &mut ctx.out, None, None, pending::<()>())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotAuthenticated));
    assert!(ctx.output().ends_with(&format!("{}\n", SESSION_EXPIRED)));
    assert!(!ctx.session.state().is_authenticated());
}

#[tokio::test(start_paused = true)]
async fn test_watch_stops_on_shutdown() {
    let mut ctx = TestContext::with_mode(PollMode::Background).login().await;
    ctx.session.drain_events();

    watch_impl(&mut ctx.session, &mut ctx.out, None, None, async {})
        .await
        .unwrap();
}

#[tokio::test]
async fn test_watch_requires_login() {
    let mut ctx = TestContext::with_mode(PollMode::Background);

    let err = watch_impl(&mut ctx.session, &mut ctx.out, Some(1), None, pending::<()>())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotAuthenticated));
}
