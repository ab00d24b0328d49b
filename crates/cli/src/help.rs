// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Help text generation with colorization support.

use crate::colors;
use clap::builder::styling::Styles;

/// Generate clap Styles for help output.
pub fn styles() -> Styles {
    if !colors::should_colorize() {
        return Styles::plain();
    }

    use anstyle::{Ansi256Color, Color, Style};

    let color = |code| Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(code))));
    let header = color(colors::codes::HEADER);
    let literal = color(colors::codes::LITERAL);
    let context = color(colors::codes::CONTEXT);

    Styles::styled()
        .header(header)
        .usage(header)
        .literal(literal)
        .placeholder(context)
        .valid(context)
}

/// Main help template with colorized Options header.
pub fn template() -> String {
    format!(
        "{{about-with-newline}}
{{usage-heading}} {{usage}}

{{before-help}}{}
{{options}}{{after-help}}",
        colors::header("Options:")
    )
}

/// Commands list shown before options in main help.
///
/// `follow`/`unfollow` are shown together as `[un]follow`.
pub fn commands() -> String {
    let entries: &[(&str, &[(&str, &str)])] = &[
        (
            "Session:",
            &[
                ("login", "Log in and remember the session"),
                ("signup", "Create an account"),
                ("logout", "Forget the stored session"),
                ("status", "Show who is logged in"),
            ],
        ),
        (
            "Posts & Stories:",
            &[
                ("feed", "Show the feed"),
                ("like", "Like or unlike a post"),
                ("comments", "Show the comments on a post"),
                ("comment", "Comment on a post"),
                ("post", "Publish a photo or video"),
                ("edit-post", "Change the caption of a post"),
                ("delete-post", "Delete a post"),
                ("stories", "Show current stories"),
                ("story", "Publish a story"),
                ("edit-story", "Change the caption of a story"),
                ("delete-story", "Delete a story"),
            ],
        ),
        (
            "People & Activity:",
            &[
                ("profile", "Show a profile"),
                ("edit-profile", "Edit your profile"),
                ("[un]follow", "Follow or stop following a user"),
                ("search", "Search users and posts"),
                ("notifications", "Show notifications"),
                ("conversations", "List conversations"),
                ("messages", "Show messages with a user"),
                ("send", "Send a direct message"),
                ("watch", "Keep refreshing and print updates"),
            ],
        ),
        (
            "Setup:",
            &[
                ("media-url", "Resolve a media path"),
                ("theme", "Show or set the color theme"),
                ("config", "Manage configuration"),
                ("completion", "Generate shell completions"),
            ],
        ),
    ];

    let width = entries
        .iter()
        .flat_map(|(_, cmds)| cmds.iter().map(|(name, _)| name.len()))
        .max()
        .unwrap_or(0);

    let mut sections = Vec::new();
    for (title, cmds) in entries {
        let mut lines = vec![colors::header(title)];
        for (name, about) in *cmds {
            let padding = " ".repeat(width - name.len() + 2);
            lines.push(format!("  {}{}{}", command_literal(name), padding, about));
        }
        sections.push(lines.join("\n"));
    }
    sections.join("\n\n")
}

/// Color a command name, dimming an `[un]` prefix.
fn command_literal(name: &str) -> String {
    match name.strip_prefix("[un]") {
        Some(rest) => format!("{}{}", colors::context("[un]"), colors::literal(rest)),
        None => colors::literal(name),
    }
}

/// Quickstart help shown after options in main help.
pub fn quickstart() -> String {
    colors::examples(
        "\
Get started:
  sisam login <username>     Log in (password read from stdin)
  sisam feed                 Show the feed
  sisam like <id>            Like a post
  sisam watch                Follow updates live",
    )
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;
