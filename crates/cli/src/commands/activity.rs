// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use crate::api::HttpTransport;
use crate::cli::OutputFormat;
use crate::display::{format_conversation, format_message, format_notification};
use crate::error::Result;
use crate::poller::PollMode;
use crate::resources::Collection;
use crate::session::SessionController;

use super::{apply_limit, with_session, write_list};

pub fn notifications(mark_read: bool, limit: Option<usize>, output: OutputFormat) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(notifications_impl(session, out, mark_read, limit, output))
    })
}

pub fn conversations(output: OutputFormat) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(conversations_impl(session, out, output))
    })
}

pub fn messages(username: String, output: OutputFormat) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(async move { messages_impl(session, out, &username, output).await })
    })
}

pub fn send(username: String, text: String) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(async move { send_impl(session, out, &username, &text).await })
    })
}

pub(crate) async fn notifications_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    mark_read: bool,
    limit: Option<usize>,
    output: OutputFormat,
) -> Result<()> {
    if mark_read {
        session.mark_notifications_read().await?;
    }
    session.refresh_one(Collection::Notifications).await?;
    let notifications = apply_limit(session.notifications(), limit);
    write_list(out, &notifications, output, "No notifications.", |n| {
        vec![format_notification(n)]
    })
}

pub(crate) async fn conversations_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    output: OutputFormat,
) -> Result<()> {
    session.refresh_one(Collection::Conversations).await?;
    write_list(
        out,
        &session.conversations(),
        output,
        "No conversations yet.",
        |c| vec![format_conversation(c)],
    )
}

pub(crate) async fn messages_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    username: &str,
    output: OutputFormat,
) -> Result<()> {
    let messages = session.messages_with(username).await?;
    let me = session.username();
    write_list(out, &messages, output, "No messages yet.", |m| {
        vec![format_message(m, me.as_deref())]
    })
}

pub(crate) async fn send_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    username: &str,
    text: &str,
) -> Result<()> {
    session.send_message(username, text).await?;
    writeln!(out, "Sent to @{}", username.trim())?;
    Ok(())
}

#[cfg(test)]
#[path = "activity_tests.rs"]
mod tests;
