// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wire types for the Sisam REST API.
//!
//! The backend is loose about which fields it sends, so every response type
//! defaults missing fields instead of failing to decode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::optimistic::{FollowState, LikeState};

/// Identifier of a post.
pub type PostId = u64;

/// Identifier of a story.
pub type StoryId = u64;

/// Fallback shown when the API omits an author.
const UNKNOWN_USER: &str = "user";

/// Minimal user record embedded in posts, comments and conversations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSummary {
    pub id: Option<u64>,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// A feed post.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub id: PostId,
    pub user: Option<UserSummary>,
    pub caption: Option<String>,
    pub media_url: Option<String>,
    pub like_count: u64,
    pub has_liked: bool,
    /// Server timestamp, passed through verbatim.
    pub created_at: Option<String>,
}

impl Post {
    /// Author username, or a placeholder when the API omitted it.
    pub fn author(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.username.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_USER)
    }

    /// Like state as reported by the server.
    pub fn like_state(&self) -> LikeState {
        LikeState {
            like_count: self.like_count,
            has_liked: self.has_liked,
        }
    }
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    pub id: Option<u64>,
    pub user: Option<UserSummary>,
    pub text: String,
    pub created_at: Option<String>,
}

impl Comment {
    pub fn author(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.username.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_USER)
    }
}

/// A story.
///
/// Different backend revisions name the author and image fields
/// differently; decoding takes the first one present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawStory")]
pub struct Story {
    pub id: Option<StoryId>,
    pub username: String,
    pub image_url: Option<String>,
    pub caption: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawStory {
    id: Option<StoryId>,
    username: Option<String>,
    user_username: Option<String>,
    author_username: Option<String>,
    image_url: Option<String>,
    media_url: Option<String>,
    url: Option<String>,
    photo_url: Option<String>,
    caption: Option<String>,
    created_at: Option<String>,
}

fn first_present(candidates: [Option<String>; 4]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
}

impl From<RawStory> for Story {
    fn from(raw: RawStory) -> Self {
        let username = first_present([
            raw.username,
            raw.user_username,
            raw.author_username,
            None,
        ])
        .unwrap_or_else(|| UNKNOWN_USER.to_string());
        let image_url = first_present([raw.image_url, raw.media_url, raw.url, raw.photo_url]);

        Story {
            id: raw.id,
            username,
            image_url,
            caption: raw.caption,
            created_at: raw.created_at,
        }
    }
}

/// A notification entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    pub id: u64,
    pub text: String,
    pub is_read: bool,
    pub created_at: Option<String>,
}

/// A direct message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    pub id: Option<u64>,
    pub sender: Option<UserSummary>,
    pub recipient: Option<UserSummary>,
    pub text: String,
    pub created_at: Option<String>,
}

/// One row of the conversation list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Conversation {
    pub user: UserSummary,
    pub last_message: Option<Message>,
    pub unread_count: u64,
}

/// A user profile page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub user: UserSummary,
    pub followers_count: u64,
    pub following_count: u64,
    pub is_following: bool,
    pub posts: Vec<Post>,
}

impl Profile {
    /// Follow state as reported by the server.
    pub fn follow_state(&self) -> FollowState {
        FollowState {
            following: self.is_following,
            followers_count: self.followers_count,
        }
    }
}

/// Response of `POST /posts/{id}/like`. Either field may be missing on
/// older backend revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LikeResult {
    pub like_count: Option<u64>,
    pub has_liked: Option<bool>,
}

impl LikeResult {
    /// The reported state, taking missing fields from `fallback`.
    pub fn resolve(&self, fallback: LikeState) -> LikeState {
        LikeState {
            like_count: self.like_count.unwrap_or(fallback.like_count),
            has_liked: self.has_liked.unwrap_or(fallback.has_liked),
        }
    }
}

/// Response of the follow/unfollow endpoints. Counts are optional because
/// not every backend revision returns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowResult {
    #[serde(alias = "is_following")]
    pub following: Option<bool>,
    pub followers_count: Option<u64>,
}

/// Response of `POST /users/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub username: String,
}

/// Response of `GET /search`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResults {
    pub users: Vec<UserSummary>,
    pub posts: Vec<Post>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.posts.is_empty()
    }
}

/// Login/signup request body.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `PUT /users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
}

/// Body of caption edits for posts and stories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptionUpdate {
    pub caption: String,
}

/// Body of comment and message submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBody {
    pub text: String,
}

/// Color theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(Error::InvalidTheme(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
