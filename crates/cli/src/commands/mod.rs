// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod activity;
pub mod auth;
pub mod config;
pub mod local;
pub mod people;
pub mod posts;
pub mod stories;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod watch;

use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use sisam_core::ApiOrigin;

use crate::api::ApiClient;
use crate::cli::OutputFormat;
use crate::config::{self as client_config, Config};
use crate::error::Result;
use crate::poller::PollMode;
use crate::session::SessionController;
use crate::store::{FileStorage, TokenStore};

/// Everything a command needs from the local machine.
pub struct Context {
    pub config: Config,
    pub state_dir: PathBuf,
    pub tokens: Arc<TokenStore>,
}

impl Context {
    /// API origin after applying `SISAM_API_BASE`.
    pub fn origin(&self) -> Result<ApiOrigin> {
        self.config.origin()
    }

    /// Build a controller and resume any persisted session.
    pub fn session(&self, mode: PollMode) -> Result<SessionController> {
        let api = ApiClient::new(
            self.origin()?,
            self.config.request_timeout(),
            Arc::clone(&self.tokens),
        )?;
        let mut session =
            SessionController::new(api, self.config.poll_intervals()).with_poll_mode(mode);
        session.restore();
        Ok(session)
    }
}

/// Load config and the persisted session from the state directory.
pub fn open_context() -> Result<Context> {
    let state_dir = client_config::state_dir();
    let config = Config::load(&state_dir)?;
    let storage = Arc::new(FileStorage::new(&state_dir));
    Ok(Context {
        config,
        tokens: Arc::new(TokenStore::load(storage)),
        state_dir,
    })
}

/// Future returned by a command body.
pub type CommandFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a>>;

/// Run `body` against a restored session inside a fresh runtime, writing to
/// stdout.
pub fn with_session<F>(mode: PollMode, body: F) -> Result<()>
where
    F: for<'s> FnOnce(&'s mut SessionController, &'s mut dyn Write) -> CommandFuture<'s>,
{
    let ctx = open_context()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let mut session = ctx.session(mode)?;
        let mut stdout = io::stdout();
        body(&mut session, &mut stdout).await
    })
}

/// Print `value` as pretty JSON.
pub fn write_json<S: serde::Serialize + ?Sized>(out: &mut dyn Write, value: &S) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Print a listing in the requested format.
///
/// Text output shows `empty` when there is nothing to list; entries that
/// span several lines are separated by a blank line.
pub fn write_list<T, F>(
    out: &mut dyn Write,
    items: &[T],
    format: OutputFormat,
    empty: &str,
    render: F,
) -> Result<()>
where
    T: serde::Serialize,
    F: Fn(&T) -> Vec<String>,
{
    if format == OutputFormat::Json {
        return write_json(out, items);
    }
    if items.is_empty() {
        writeln!(out, "{}", empty)?;
        return Ok(());
    }
    let mut multiline = false;
    for (i, item) in items.iter().enumerate() {
        let lines = render(item);
        if i > 0 && (multiline || lines.len() > 1) {
            writeln!(out)?;
        }
        multiline = lines.len() > 1;
        for line in lines {
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}

/// Keep at most `limit` items.
pub fn apply_limit<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}
