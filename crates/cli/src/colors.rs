// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal color utilities for help output.
//!
//! Respects environment variables:
//! - `NO_COLOR=1`: Disables colors
//! - `COLOR=1`: Forces colors even without TTY

use std::io::IsTerminal;

use crate::env;

/// ANSI 256-color codes used in help output.
pub mod codes {
    /// Section headers: steel blue
    pub const HEADER: u8 = 74;
    /// Commands/literals: light grey
    pub const LITERAL: u8 = 250;
    /// Placeholders and descriptions: medium grey
    pub const CONTEXT: u8 = 245;
}

/// Check if colors should be enabled based on TTY and environment variables.
pub fn should_colorize() -> bool {
    colorize_with(env::no_color(), env::force_color(), std::io::stdout().is_terminal())
}

/// `NO_COLOR` beats `COLOR`, which beats TTY detection.
fn colorize_with(no_color: bool, force_color: bool, is_tty: bool) -> bool {
    if no_color {
        return false;
    }
    force_color || is_tty
}

fn paint(code: u8, text: &str) -> String {
    format!("\x1b[38;5;{code}m{text}\x1b[0m")
}

/// Apply header color (section titles) to text.
pub fn header(text: &str) -> String {
    paint(codes::HEADER, text)
}

/// Apply literal color (commands, options) to text.
pub fn literal(text: &str) -> String {
    paint(codes::LITERAL, text)
}

/// Apply context color (placeholders, hints) to text.
pub fn context(text: &str) -> String {
    paint(codes::CONTEXT, text)
}

/// Colorize an examples help block.
///
/// ```text
/// Examples:
///   sisam feed -n 5        Show the five newest posts
/// ```
///
/// Lines ending in `:` become headers; in example lines the command (up to
/// the first run of two spaces) is colored, quoted text and flag values
/// dimmed.
pub fn examples(text: &str) -> String {
    if !should_colorize() {
        return text.to_string();
    }
    colorize_examples(text)
}

fn colorize_examples(text: &str) -> String {
    text.lines()
        .map(|line| {
            let trimmed = line.trim_start();
            let indent = &line[..line.len() - trimmed.len()];
            if trimmed.ends_with(':') && !trimmed.contains("  ") {
                format!("{indent}{}", header(trimmed))
            } else if let Some(end) = find_description_start(trimmed) {
                format!(
                    "{indent}{}{}",
                    colorize_command(&trimmed[..end]),
                    &trimmed[end..]
                )
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Colorize a command line word by word.
///
/// Flags and plain words are literals; quoted strings, `<placeholders>` and
/// the value following a flag are context.
pub fn colorize_command(cmd: &str) -> String {
    let mut out = Vec::new();
    let mut words = cmd.split(' ').peekable();
    let mut after_flag = false;

    while let Some(word) = words.next() {
        if word.starts_with('"') && !(word.len() > 1 && word.ends_with('"')) {
            // Quoted text spans words until the closing quote.
            let mut quoted = word.to_string();
            for next in words.by_ref() {
                quoted.push(' ');
                quoted.push_str(next);
                if next.ends_with('"') {
                    break;
                }
            }
            out.push(context(&quoted));
            after_flag = false;
            continue;
        }

        let dim = after_flag || word.starts_with('"') || word.starts_with('<') || word == "|";
        out.push(if dim { context(word) } else { literal(word) });
        after_flag = word.starts_with('-') && !word.contains('=');
    }

    out.join(" ")
}

/// Find where the description starts (after 2+ spaces following the command).
pub fn find_description_start(line: &str) -> Option<usize> {
    let start = line.find("  ")?;
    let rest = &line[start..];
    let spaces = rest.len() - rest.trim_start_matches(' ').len();
    (spaces < rest.len()).then_some(start)
}

#[cfg(test)]
#[path = "colors_tests.rs"]
mod tests;
