// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use std::path::PathBuf;

use crate::colors;
use crate::help;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

pub use args::{CredentialArgs, LimitArgs, OutputArgs};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "sisam")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(disable_version_flag = true)]
#[command(about = "Command-line client for the Sisam social network")]
#[command(
    long_about = "Command-line client for the Sisam social network.\n\n\
    Browse the feed and stories, post, like, follow and message from the terminal.\n\
    The session token is kept in the state directory between runs."
)]
#[command(help_template = help::template())]
#[command(before_help = help::commands())]
#[command(after_help = help::quickstart())]
#[command(styles = help::styles())]
// Allow the unit type field pattern which is required for clap's ArgAction::Version/Help
#[allow(clippy::manual_non_exhaustive)]
pub struct Cli {
    /// Print version
    #[arg(short = 'v', short_alias = 'V', long = "version", action = clap::ArgAction::Version)]
    version: (),

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────
    /// Log in and remember the session
    #[command(
        arg_required_else_help = true,
        after_help = colors::examples("\
Examples:
  sisam login alice -p hunter2          Log in with an inline password
  echo hunter2 | sisam login alice      Read the password from stdin")
    )]
    Login {
        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Create an account
    #[command(arg_required_else_help = true)]
    Signup {
        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Forget the stored session
    Logout,

    /// Show who is logged in and against which server
    Status {
        #[command(flatten)]
        output: OutputArgs,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Posts
    // ─────────────────────────────────────────────────────────────────────────
    /// Show the feed
    #[command(after_help = colors::examples("\
Examples:
  sisam feed                 Show every post in the feed
  sisam feed -n 5            Show the five newest posts
  sisam feed -o json         Output as JSON"))]
    Feed {
        #[command(flatten)]
        limits: LimitArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Like or unlike a post
    #[command(arg_required_else_help = true)]
    Like {
        /// Post ID
        id: u64,
    },

    /// Show the comments on a post
    #[command(arg_required_else_help = true)]
    Comments {
        /// Post ID
        id: u64,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Comment on a post
    #[command(arg_required_else_help = true)]
    Comment {
        /// Post ID
        id: u64,

        /// Comment text
        #[arg(value_parser = non_empty_string)]
        text: String,
    },

    /// Publish a photo or video
    #[command(
        arg_required_else_help = true,
        after_help = colors::examples("\
Examples:
  sisam post cat.jpg                    Post a photo without caption
  sisam post cat.jpg -c \"Sunday\"        Post a photo with a caption")
    )]
    Post {
        /// Media file to upload
        file: PathBuf,

        /// Caption
        #[arg(long, short, default_value = "")]
        caption: String,
    },

    /// Change the caption of a post
    #[command(arg_required_else_help = true)]
    EditPost {
        /// Post ID
        id: u64,

        /// New caption
        caption: String,
    },

    /// Delete a post
    #[command(arg_required_else_help = true)]
    DeletePost {
        /// Post ID
        id: u64,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Stories
    // ─────────────────────────────────────────────────────────────────────────
    /// Show current stories
    Stories {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Publish a story
    #[command(arg_required_else_help = true)]
    Story {
        /// Image file to upload
        file: PathBuf,

        /// Caption
        #[arg(long, short, default_value = "")]
        caption: String,
    },

    /// Change the caption of a story
    #[command(arg_required_else_help = true)]
    EditStory {
        /// Story ID
        id: u64,

        /// New caption
        caption: String,
    },

    /// Delete a story
    #[command(arg_required_else_help = true)]
    DeleteStory {
        /// Story ID
        id: u64,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // People
    // ─────────────────────────────────────────────────────────────────────────
    /// Show a profile (your own when no user is given)
    Profile {
        /// Username
        username: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Edit your profile
    #[command(arg_required_else_help = true)]
    EditProfile {
        /// Display name
        #[arg(long)]
        full_name: Option<String>,
    },

    /// Follow a user
    #[command(arg_required_else_help = true)]
    Follow {
        /// Username
        #[arg(value_parser = non_empty_string)]
        username: String,
    },

    /// Stop following a user
    #[command(arg_required_else_help = true)]
    Unfollow {
        /// Username
        #[arg(value_parser = non_empty_string)]
        username: String,
    },

    /// Search users and posts
    #[command(arg_required_else_help = true)]
    Search {
        /// Search text
        query: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Activity
    // ─────────────────────────────────────────────────────────────────────────
    /// Show notifications
    #[command(after_help = colors::examples("\
Examples:
  sisam notifications                Show notifications
  sisam notifications --mark-read    Mark all as read, then show them"))]
    Notifications {
        /// Mark every notification as read first
        #[arg(long)]
        mark_read: bool,

        #[command(flatten)]
        limits: LimitArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List conversations
    Conversations {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the messages exchanged with a user
    #[command(arg_required_else_help = true)]
    Messages {
        /// Username
        #[arg(value_parser = non_empty_string)]
        username: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Send a direct message
    #[command(arg_required_else_help = true)]
    Send {
        /// Recipient
        #[arg(value_parser = non_empty_string)]
        username: String,

        /// Message text
        #[arg(value_parser = non_empty_string)]
        text: String,
    },

    /// Keep refreshing and print every update
    #[command(after_help = colors::examples("\
Examples:
  sisam watch                  Refresh until interrupted
  sisam watch --ticks 8        Stop after eight refreshes
  sisam watch --with bob       Also follow the conversation with bob"))]
    Watch {
        /// Stop after this many refreshes
        #[arg(long)]
        ticks: Option<usize>,

        /// Also poll the conversation with this user
        #[arg(long = "with", value_name = "USERNAME")]
        with: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Setup
    // ─────────────────────────────────────────────────────────────────────────
    /// Resolve a media path against the API origin
    #[command(
        arg_required_else_help = true,
        after_help = colors::examples("\
Examples:
  sisam media-url uploads/a.jpg                          Relative path
  sisam media-url http://127.0.0.1:8000/uploads/a.jpg    Loopback URL")
    )]
    MediaUrl {
        /// Path or URL as returned by the server
        raw: String,
    },

    /// Show or set the color theme (dark, light, toggle)
    Theme {
        /// New theme
        theme: Option<String>,
    },

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    #[command(arg_required_else_help = true)]
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration commands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Set the API origin
    #[command(arg_required_else_help = true)]
    SetOrigin {
        /// Absolute http(s) URL, e.g. https://sisam-backend.onrender.com
        origin: String,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
