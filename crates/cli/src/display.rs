// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, NaiveDateTime};
use sisam_core::{
    Comment, Conversation, Message, Notification, Post, Profile, Story, UserSummary,
};

use crate::poller::PollEvent;

/// Maximum line width for wrapped text content (excluding 4-space indent).
const WRAP_WIDTH: usize = 76;

/// Wrap text at word boundaries if it's a single line.
///
/// - If content contains newlines: return as-is (preserve user formatting)
/// - If content is single line >width: wrap at word boundaries
/// - If content is single line <=width: return as-is
pub fn wrap_text(content: &str, width: usize) -> String {
    if content.contains('\n') || content.len() <= width {
        return content.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in content.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

fn indented(content: &str) -> Vec<String> {
    wrap_text(content, WRAP_WIDTH)
        .lines()
        .map(|line| format!("    {}", line))
        .collect()
}

/// Render a server timestamp as `YYYY-MM-DD HH:MM`, or as-is when it
/// doesn't parse.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}

fn plural(count: u64, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{} {}", count, one)
    } else {
        format!("{} {}", count, many)
    }
}

/// `@name` or `@name (Full Name)`.
pub fn format_user(user: &UserSummary) -> String {
    match user.full_name.as_deref().filter(|n| !n.is_empty()) {
        Some(full) => format!("@{} ({})", user.username, full),
        None => format!("@{}", user.username),
    }
}

/// Format a post with caption and media URL.
///
/// ```text
/// 12: @alice, 3 likes (liked)
///     Caption goes here
///     https://api.example/uploads/cat.jpg
/// ```
pub fn format_post(post: &Post) -> Vec<String> {
    let liked = if post.has_liked { " (liked)" } else { "" };
    let mut lines = vec![format!(
        "{}: @{}, {}{}",
        post.id,
        post.author(),
        plural(post.like_count, "like", "likes"),
        liked
    )];
    if let Some(caption) = post.caption.as_deref().filter(|c| !c.is_empty()) {
        lines.extend(indented(caption));
    }
    if let Some(url) = &post.media_url {
        lines.push(format!("    {}", url));
    }
    lines
}

pub fn format_comment(comment: &Comment) -> String {
    match comment.created_at.as_deref() {
        Some(at) => format!("@{} [{}]: {}", comment.author(), format_timestamp(at), comment.text),
        None => format!("@{}: {}", comment.author(), comment.text),
    }
}

pub fn format_story(story: &Story) -> Vec<String> {
    let id = story
        .id
        .map(|id| format!("{}: ", id))
        .unwrap_or_default();
    let mut lines = vec![format!("{}@{}", id, story.username)];
    if let Some(caption) = story.caption.as_deref().filter(|c| !c.is_empty()) {
        lines.extend(indented(caption));
    }
    if let Some(url) = &story.image_url {
        lines.push(format!("    {}", url));
    }
    lines
}

/// Unread notifications are marked with `*`.
pub fn format_notification(notification: &Notification) -> String {
    let marker = if notification.is_read { " " } else { "*" };
    match notification.created_at.as_deref() {
        Some(at) => format!("{} {} ({})", marker, notification.text, format_timestamp(at)),
        None => format!("{} {}", marker, notification.text),
    }
}

pub fn format_conversation(conversation: &Conversation) -> String {
    let mut line = format_user(&conversation.user);
    if conversation.unread_count > 0 {
        line.push_str(&format!(" ({} unread)", conversation.unread_count));
    }
    if let Some(last) = &conversation.last_message {
        line.push_str(&format!(": {}", last.text));
    }
    line
}

/// Format a message; the sender is shown as `me` when it is `me`.
pub fn format_message(message: &Message, me: Option<&str>) -> String {
    let sender = message
        .sender
        .as_ref()
        .map(|u| u.username.as_str())
        .unwrap_or("?");
    let who = if Some(sender) == me {
        "me".to_string()
    } else {
        format!("@{}", sender)
    };
    match message.created_at.as_deref() {
        Some(at) => format!("{} [{}]: {}", who, format_timestamp(at), message.text),
        None => format!("{}: {}", who, message.text),
    }
}

pub fn format_profile(profile: &Profile) -> Vec<String> {
    let mut lines = vec![format_user(&profile.user)];
    lines.push(format!(
        "{}, {} following",
        plural(profile.followers_count, "follower", "followers"),
        profile.following_count
    ));
    if profile.is_following {
        lines.push("You follow this account.".to_string());
    }
    if let Some(avatar) = &profile.user.avatar_url {
        lines.push(format!("Avatar: {}", avatar));
    }
    if !profile.posts.is_empty() {
        lines.push(String::new());
        lines.push(format!("Posts ({}):", profile.posts.len()));
        for post in &profile.posts {
            lines.extend(format_post(post).into_iter().map(|l| format!("  {}", l)));
        }
    }
    lines
}

/// One line per poller event, as printed by `watch`.
pub fn format_event(event: &PollEvent) -> String {
    match event {
        PollEvent::Updated { resource, count } => {
            format!("{}: {}", resource, plural(*count as u64, "item", "items"))
        }
        PollEvent::Failed { resource, error, .. } => {
            format!("{}: refresh failed: {}", resource, error)
        }
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
