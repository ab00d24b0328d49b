// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `sisam watch`: keep the pollers running and print what they report.

use std::future::Future;
use std::io::Write;

use crate::api::HttpTransport;
use crate::display::format_event;
use crate::error::{Error, Result};
use crate::poller::PollMode;
use crate::session::SessionController;

use super::with_session;

pub fn run(ticks: Option<usize>, with: Option<String>) -> Result<()> {
    with_session(PollMode::Background, move |session, out| {
        Box::pin(async move {
            let interrupted = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!("failed to listen for ctrl-c: {}", e);
                    std::future::pending::<()>().await;
                }
            };
            watch_impl(session, out, ticks, with.as_deref(), interrupted).await
        })
    })
}

/// Print poller events until `ticks` have been seen, `shutdown` resolves,
/// or the server ends the session.
pub(crate) async fn watch_impl<T, S>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    ticks: Option<usize>,
    with: Option<&str>,
    shutdown: S,
) -> Result<()>
where
    T: HttpTransport + 'static,
    S: Future<Output = ()>,
{
    if !session.state().is_authenticated() {
        return Err(Error::NotAuthenticated);
    }
    if let Some(username) = with {
        session.open_conversation(username)?;
    }
    tokio::pin!(shutdown);

    let mut seen = 0usize;
    while ticks != Some(seen) {
        let event = tokio::select! {
            biased;
            _ = &mut shutdown => break,
            event = session.next_event() => event,
        };
        let Some(event) = event else { break };
        writeln!(out, "{}", format_event(&event))?;
        out.flush()?;

        if !session.state().is_authenticated() {
            if let Some(status) = session.status_message() {
                writeln!(out, "{}", status)?;
            }
            return Err(Error::NotAuthenticated);
        }
        seen += 1;
    }

    session.close_conversation();
    Ok(())
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
