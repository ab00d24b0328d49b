// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed client for the Sisam REST API.
//!
//! Every request reads the bearer token from the shared [`TokenStore`] at
//! send time, so a login or logout takes effect for the next request issued
//! by any holder of the client, pollers included.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde_json::json;

use sisam_core::{
    normalize_media_url, ApiOrigin, AuthResponse, Comment, Conversation, Credentials,
    FollowResult, LikeResult, Message, Notification, Post, PostId, Profile, ProfileUpdate,
    SearchResults, Story, StoryId, UserSummary,
};

use super::transport::{ApiRequest, FormPart, HttpTransport, ReqwestTransport};
use crate::error::{Error, Result};
use crate::store::TokenStore;

/// Bytes escaped inside a single path segment: everything but RFC 3986
/// unreserved characters.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Escape `username` for use as one path segment.
///
/// `.` and `..` are refused outright: URL parsing collapses them (escaped
/// or not) into the parent path.
pub fn user_segment(username: &str) -> Result<String> {
    match username {
        "" => Err(Error::FieldEmpty { field: "username" }),
        "." | ".." => Err(Error::Validation(format!("invalid username: '{username}'"))),
        _ => Ok(utf8_percent_encode(username, SEGMENT).to_string()),
    }
}

/// A file attached to a post or story upload.
#[derive(Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        MediaFile {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read an upload from disk, named after the file.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(MediaFile::new(file_name, bytes))
    }

    fn into_part(self, field: &str) -> FormPart {
        FormPart::File {
            name: field.to_string(),
            file_name: self.file_name,
            bytes: self.bytes,
        }
    }
}

impl std::fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaFile")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// API client, generic over the transport for testing.
pub struct ApiClient<T: HttpTransport = ReqwestTransport> {
    transport: Arc<T>,
    tokens: Arc<TokenStore>,
    origin: ApiOrigin,
}

impl<T: HttpTransport> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        ApiClient {
            transport: Arc::clone(&self.transport),
            tokens: Arc::clone(&self.tokens),
            origin: self.origin.clone(),
        }
    }
}

impl ApiClient<ReqwestTransport> {
    /// Create a client with the default reqwest transport.
    pub fn new(origin: ApiOrigin, timeout: Duration, tokens: Arc<TokenStore>) -> Result<Self> {
        let transport = ReqwestTransport::new(origin.clone(), timeout)?;
        Ok(Self::with_transport(origin, transport, tokens))
    }
}

impl<T: HttpTransport> ApiClient<T> {
    /// Create a client with a custom transport (for testing).
    pub fn with_transport(origin: ApiOrigin, transport: T, tokens: Arc<TokenStore>) -> Self {
        ApiClient {
            transport: Arc::new(transport),
            tokens,
            origin,
        }
    }

    pub fn origin(&self) -> &ApiOrigin {
        &self.origin
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// Canonical form of a media reference returned by the API.
    pub fn media_url(&self, raw: &str) -> Option<String> {
        normalize_media_url(&self.origin, raw)
    }

    /// Send a request, signing it with the current token when one is held.
    async fn send(&self, request: ApiRequest) -> Result<String> {
        let request = request.bearer(self.tokens.current_token());
        self.send_unsigned(request).await
    }

    async fn send_unsigned(&self, request: ApiRequest) -> Result<String> {
        let method = request.method;
        let path = request.path.clone();
        let response = self.transport.execute(request).await?;
        tracing::debug!("{} {} -> {}", method.as_str(), path, response.status);
        if !response.is_success() {
            return Err(Error::from_status(response.status, response.body));
        }
        Ok(response.body)
    }

    async fn send_json<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R> {
        let path = request.path.clone();
        let body = self.send(request).await?;
        decode(&path, &body)
    }

    // ── auth ────────────────────────────────────────────────────────────────

    /// `POST /users/login`. Sent without a bearer token.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let request = ApiRequest::post("/users/login").json(serde_json::to_value(credentials)?);
        let body = self.send_unsigned(request).await?;
        decode("/users/login", &body)
    }

    /// `POST /users/signup`. Sent without a bearer token.
    pub async fn signup(&self, credentials: &Credentials) -> Result<()> {
        let request = ApiRequest::post("/users/signup").json(serde_json::to_value(credentials)?);
        self.send_unsigned(request).await?;
        Ok(())
    }

    // ── posts ───────────────────────────────────────────────────────────────

    pub async fn feed(&self) -> Result<Vec<Post>> {
        let mut posts: Vec<Post> = self.send_json(ApiRequest::get("/posts/feed")).await?;
        posts.iter_mut().for_each(|p| self.normalize_post(p));
        Ok(posts)
    }

    /// Upload a post. The server expects the file under the `media` field.
    pub async fn create_post(&self, caption: &str, media: MediaFile) -> Result<()> {
        let parts = vec![FormPart::text("caption", caption), media.into_part("media")];
        self.send(ApiRequest::post("/posts/").multipart(parts)).await?;
        Ok(())
    }

    pub async fn update_post(&self, id: PostId, caption: &str) -> Result<()> {
        let request = ApiRequest::put(format!("/posts/{id}")).json(json!({ "caption": caption }));
        self.send(request).await?;
        Ok(())
    }

    pub async fn delete_post(&self, id: PostId) -> Result<()> {
        self.send(ApiRequest::delete(format!("/posts/{id}"))).await?;
        Ok(())
    }

    /// Toggle the like on a post; the response is the server's new state.
    pub async fn like(&self, id: PostId) -> Result<LikeResult> {
        let body = self
            .send(ApiRequest::post(format!("/posts/{id}/like")).json(json!({})))
            .await?;
        // A bare acknowledgement carries no state; the caller keeps its own.
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    pub async fn comments(&self, id: PostId) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .send_json(ApiRequest::get(format!("/posts/{id}/comments")))
            .await?;
        for comment in &mut comments {
            if let Some(user) = comment.user.as_mut() {
                self.normalize_user(user);
            }
        }
        Ok(comments)
    }

    pub async fn add_comment(&self, id: PostId, text: &str) -> Result<()> {
        let request =
            ApiRequest::post(format!("/posts/{id}/comments")).json(json!({ "text": text }));
        self.send(request).await?;
        Ok(())
    }

    // ── stories ─────────────────────────────────────────────────────────────

    pub async fn stories(&self) -> Result<Vec<Story>> {
        let mut stories: Vec<Story> = self.send_json(ApiRequest::get("/stories/")).await?;
        for story in &mut stories {
            story.image_url = story.image_url.as_deref().and_then(|u| self.media_url(u));
        }
        Ok(stories)
    }

    /// Upload a story. The server expects the file under the `file` field.
    pub async fn create_story(&self, caption: &str, file: MediaFile) -> Result<()> {
        let parts = vec![FormPart::text("caption", caption), file.into_part("file")];
        self.send(ApiRequest::post("/stories/").multipart(parts)).await?;
        Ok(())
    }

    pub async fn update_story(&self, id: StoryId, caption: &str) -> Result<()> {
        let request =
            ApiRequest::put(format!("/stories/{id}")).json(json!({ "caption": caption }));
        self.send(request).await?;
        Ok(())
    }

    pub async fn delete_story(&self, id: StoryId) -> Result<()> {
        self.send(ApiRequest::delete(format!("/stories/{id}"))).await?;
        Ok(())
    }

    // ── users ───────────────────────────────────────────────────────────────

    pub async fn profile(&self, username: &str) -> Result<Profile> {
        let mut profile: Profile = self
            .send_json(ApiRequest::get(format!("/users/{}", user_segment(username)?)))
            .await?;
        self.normalize_user(&mut profile.user);
        profile.posts.iter_mut().for_each(|p| self.normalize_post(p));
        Ok(profile)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<()> {
        let request = ApiRequest::put("/users/me").json(serde_json::to_value(update)?);
        self.send(request).await?;
        Ok(())
    }

    pub async fn follow(&self, username: &str) -> Result<FollowResult> {
        self.follow_request(username, "follow").await
    }

    pub async fn unfollow(&self, username: &str) -> Result<FollowResult> {
        self.follow_request(username, "unfollow").await
    }

    async fn follow_request(&self, username: &str, action: &str) -> Result<FollowResult> {
        let path = format!("/users/{}/{action}", user_segment(username)?);
        let body = self.send(ApiRequest::post(path).json(json!({}))).await?;
        // Older backends answer with a bare message; treat that as "no counts".
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    // ── notifications ───────────────────────────────────────────────────────

    pub async fn notifications(&self) -> Result<Vec<Notification>> {
        self.send_json(ApiRequest::get("/notifications/")).await
    }

    /// Mark every notification as read.
    pub async fn mark_notifications_read(&self) -> Result<()> {
        self.send(ApiRequest::post("/notifications/mark_read").json(json!({})))
            .await?;
        Ok(())
    }

    // ── search ──────────────────────────────────────────────────────────────

    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        let mut results: SearchResults = self
            .send_json(ApiRequest::get("/search").query("q", query))
            .await?;
        results.users.iter_mut().for_each(|u| self.normalize_user(u));
        results.posts.iter_mut().for_each(|p| self.normalize_post(p));
        Ok(results)
    }

    // ── messages ────────────────────────────────────────────────────────────

    pub async fn conversations(&self) -> Result<Vec<Conversation>> {
        let mut conversations: Vec<Conversation> = self
            .send_json(ApiRequest::get("/messages/conversations"))
            .await?;
        conversations
            .iter_mut()
            .for_each(|c| self.normalize_user(&mut c.user));
        Ok(conversations)
    }

    pub async fn messages_with(&self, username: &str) -> Result<Vec<Message>> {
        let path = format!("/messages/with/{}", user_segment(username)?);
        self.send_json(ApiRequest::get(path)).await
    }

    pub async fn send_message(&self, username: &str, text: &str) -> Result<()> {
        let path = format!("/messages/with/{}", user_segment(username)?);
        let request = ApiRequest::post(path).json(json!({ "text": text }));
        self.send(request).await?;
        Ok(())
    }

    fn normalize_post(&self, post: &mut Post) {
        post.media_url = post.media_url.as_deref().and_then(|u| self.media_url(u));
        if let Some(user) = post.user.as_mut() {
            self.normalize_user(user);
        }
    }

    fn normalize_user(&self, user: &mut UserSummary) {
        user.avatar_url = user.avatar_url.as_deref().and_then(|u| self.media_url(u));
    }
}

fn decode<R: DeserializeOwned>(path: &str, body: &str) -> Result<R> {
    serde_json::from_str(body).map_err(|e| Error::Decode(format!("{path}: {e}")))
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
