// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sisamrs - terminal client library for the Sisam social network.
//!
//! This crate provides everything behind the `sisam` CLI: an HTTP client for
//! the Sisam REST API, background pollers that keep the feed, stories,
//! notifications and conversations fresh, optimistic likes and follows, and
//! the session state machine that ties them together.
//!
//! # Main Components
//!
//! - [`ApiClient`] - typed endpoints over a pluggable [`HttpTransport`]
//! - [`TokenStore`] - persisted bearer token, username and theme
//! - [`SessionController`] - login/logout lifecycle, pollers and mutations
//! - [`Config`] - backend origin, poll intervals and request timeout
//! - [`Error`] - error types for all operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use sisamrs::{ApiClient, Config, SessionController, TokenStore};
//!
//! let config = Config::load(&state_dir)?;
//! let tokens = Arc::new(TokenStore::load(storage));
//! let api = ApiClient::new(config.origin()?, config.request_timeout(), tokens)?;
//! let mut session = SessionController::new(api, config.poll_intervals());
//! session.login(&Credentials::new("alice", "secret")).await?;
//! for post in session.feed() {
//!     println!("{}", post.id);
//! }
//! ```

pub mod api;
mod cli;
pub mod colors;
mod commands;
pub mod config;
mod display;
mod env;
pub mod error;
pub mod help;
pub mod mutations;
pub mod poller;
pub mod resources;
pub mod session;
pub mod store;

pub use api::{ApiClient, HttpTransport, MediaFile, ReqwestTransport};
pub use cli::{Cli, Command, ConfigCommand, CredentialArgs, LimitArgs, OutputArgs, OutputFormat};
pub use config::Config;
pub use error::{Error, Result};
pub use mutations::Mutations;
pub use poller::{PollEvent, PollMode, Poller};
pub use resources::{Collection, Resources};
pub use session::SessionController;
pub use store::{FileStorage, KeyValueStorage, MemoryStorage, TokenStore};

use clap::CommandFactory;
use clap_complete::generate;

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Login { credentials } => commands::auth::login(credentials),
        Command::Signup { credentials } => commands::auth::signup(credentials),
        Command::Logout => commands::auth::logout(),
        Command::Status { output } => commands::auth::status(output.output),
        Command::Feed { limits, output } => commands::posts::feed(limits.limit, output.output),
        Command::Like { id } => commands::posts::like(id),
        Command::Comments { id, output } => commands::posts::comments(id, output.output),
        Command::Comment { id, text } => commands::posts::comment(id, text),
        Command::Post { file, caption } => commands::posts::post(file, caption),
        Command::EditPost { id, caption } => commands::posts::edit(id, caption),
        Command::DeletePost { id } => commands::posts::delete(id),
        Command::Stories { output } => commands::stories::list(output.output),
        Command::Story { file, caption } => commands::stories::create(file, caption),
        Command::EditStory { id, caption } => commands::stories::edit(id, caption),
        Command::DeleteStory { id } => commands::stories::delete(id),
        Command::Profile { username, output } => commands::people::profile(username, output.output),
        Command::EditProfile { full_name } => commands::people::edit_profile(full_name),
        Command::Follow { username } => commands::people::follow(username),
        Command::Unfollow { username } => commands::people::unfollow(username),
        Command::Search { query, output } => commands::people::search(query, output.output),
        Command::Notifications {
            mark_read,
            limits,
            output,
        } => commands::activity::notifications(mark_read, limits.limit, output.output),
        Command::Conversations { output } => commands::activity::conversations(output.output),
        Command::Messages { username, output } => {
            commands::activity::messages(username, output.output)
        }
        Command::Send { username, text } => commands::activity::send(username, text),
        Command::Watch { ticks, with } => commands::watch::run(ticks, with),
        Command::MediaUrl { raw } => commands::local::media_url(&raw),
        Command::Theme { theme } => commands::local::theme(theme.as_deref()),
        Command::Config(cmd) => commands::config::run(cmd),
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "sisam", &mut std::io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
