// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session controller.
//!
//! Drives the [`SessionState`] machine and owns everything that lives only
//! while logged in: the pollers, their snapshots and pending optimistic
//! edits. Every API failure passes through [`SessionController::handle_error`],
//! so a rejected token anywhere ends the session the same way an explicit
//! logout does.

use std::sync::Arc;

use chrono::Utc;
use sisam_core::{
    Comment, Conversation, Credentials, FollowState, LikeState, Message, Notification, Post,
    PostId, Profile, ProfileUpdate, SearchResults, Session, SessionEvent, SessionState, Story,
    StoryId,
};
use tokio::sync::mpsc;

use crate::api::{ApiClient, HttpTransport, MediaFile, ReqwestTransport};
use crate::config::PollIntervals;
use crate::error::{Error, Result};
use crate::mutations::Mutations;
use crate::poller::{PollEvent, PollMode};
use crate::resources::{Collection, Resources};
use crate::store::TokenStore;

/// Status shown after the server rejected the stored token.
pub const SESSION_EXPIRED: &str = "session expired, log in again";

pub struct SessionController<T: HttpTransport = ReqwestTransport> {
    api: ApiClient<T>,
    resources: Resources,
    events: mpsc::UnboundedReceiver<PollEvent>,
    mutations: Mutations<T>,
    state: SessionState,
    /// Last error worth showing to the user; cleared by the next success.
    status_message: Option<String>,
    poll_mode: PollMode,
}

impl<T: HttpTransport + 'static> SessionController<T> {
    /// Create an anonymous controller with stopped pollers.
    pub fn new(api: ApiClient<T>, intervals: PollIntervals) -> Self {
        let (resources, events) = Resources::new(&api, intervals);
        SessionController {
            mutations: Mutations::new(api.clone()),
            api,
            resources,
            events,
            state: SessionState::Anonymous,
            status_message: None,
            poll_mode: PollMode::Background,
        }
    }

    /// Choose how pollers refresh once the session is authenticated.
    pub fn with_poll_mode(mut self, mode: PollMode) -> Self {
        self.poll_mode = mode;
        self
    }

    /// Resume a persisted session.
    ///
    /// A stored token is trusted without a round trip; the first request
    /// that the server rejects ends the session.
    pub fn restore(&mut self) {
        if self.state != SessionState::Anonymous || !self.tokens().is_authenticated() {
            return;
        }
        self.state = SessionState::Authenticated;
        self.resources.start_all(self.poll_mode);
        tracing::info!(
            "restored session for {}",
            self.tokens().username().as_deref().unwrap_or("<unknown>")
        );
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session(&self) -> Arc<Session> {
        self.tokens().session()
    }

    pub fn username(&self) -> Option<String> {
        self.tokens().username()
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        self.api.tokens()
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Edits still awaiting a server answer.
    pub fn pending_mutations(&self) -> usize {
        self.mutations.pending_count()
    }

    fn require_auth(&self) -> Result<()> {
        if self.state.is_authenticated() {
            Ok(())
        } else {
            Err(Error::NotAuthenticated)
        }
    }

    // ── authentication ──────────────────────────────────────────────────────

    /// Submit credentials from the anonymous state.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<()> {
        validate_credentials(credentials)?;
        self.state = self.state.transition(SessionEvent::Login)?;
        self.authenticate(credentials).await
    }

    /// Resubmit credentials after a failed login.
    pub async fn retry(&mut self, credentials: &Credentials) -> Result<()> {
        validate_credentials(credentials)?;
        self.state = self.state.transition(SessionEvent::Retry)?;
        self.authenticate(credentials).await
    }

    async fn authenticate(&mut self, credentials: &Credentials) -> Result<()> {
        match self.api.login(credentials).await {
            Ok(auth) => {
                let username = if auth.username.is_empty() {
                    credentials.username.as_str()
                } else {
                    auth.username.as_str()
                };
                self.state = self.state.transition(SessionEvent::Succeeded)?;
                self.tokens().set_token(&auth.token, Some(username));
                self.status_message = None;
                self.resources.start_all(self.poll_mode);
                tracing::info!("logged in as {}", username);
                Ok(())
            }
            Err(e) => {
                self.state = self.state.transition(SessionEvent::Failed)?;
                self.status_message = Some(e.to_string());
                tracing::info!("login failed: {}", e);
                Err(e)
            }
        }
    }

    /// Dismiss a failed login.
    pub fn acknowledge(&mut self) -> Result<()> {
        self.state = self.state.transition(SessionEvent::Acknowledge)?;
        self.status_message = None;
        Ok(())
    }

    /// End the session and discard everything tied to it.
    pub fn logout(&mut self) -> Result<()> {
        self.state = self.state.transition(SessionEvent::Logout)?;
        self.teardown();
        self.status_message = None;
        tracing::info!("logged out");
        Ok(())
    }

    fn teardown(&mut self) {
        self.tokens().clear_token();
        self.resources.stop_all();
        self.resources.close_conversation();
        self.resources.reset_all();
        self.mutations.clear();
        // Events from the ended session are meaningless now.
        while self.events.try_recv().is_ok() {}
    }

    /// Register a new account. The session state is unchanged.
    pub async fn signup(&mut self, credentials: &Credentials) -> Result<()> {
        validate_credentials(credentials)?;
        let result = self.api.signup(credentials).await;
        // Signup never touches the current token, so a 401/403 here says
        // nothing about the session.
        self.status_message = result.as_ref().err().map(Error::to_string);
        result
    }

    /// Record `error` for display, ending the session if the server
    /// rejected the token.
    pub fn handle_error(&mut self, error: &Error) {
        if error.is_auth() && self.state.accepts(SessionEvent::Rejected) {
            self.force_logout(&error.to_string());
        } else {
            self.status_message = Some(error.to_string());
        }
    }

    fn force_logout(&mut self, reason: &str) {
        match self.state.transition(SessionEvent::Rejected) {
            Ok(next) => {
                tracing::warn!("token rejected, logging out: {}", reason);
                self.state = next;
                self.teardown();
                self.status_message = Some(SESSION_EXPIRED.to_string());
            }
            Err(e) => tracing::debug!("ignoring rejection: {}", e),
        }
    }

    fn settle<R>(&mut self, result: Result<R>) -> Result<R> {
        match &result {
            Ok(_) => self.status_message = None,
            Err(e) => self.handle_error(e),
        }
        result
    }

    // ── poll events ─────────────────────────────────────────────────────────

    /// Take every queued poller event, ending the session on an auth
    /// failure.
    pub fn drain_events(&mut self) -> Vec<PollEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        for event in &events {
            self.observe(event);
        }
        events
    }

    /// Wait for the next poller event.
    pub async fn next_event(&mut self) -> Option<PollEvent> {
        let event = self.events.recv().await?;
        self.observe(&event);
        Some(event)
    }

    fn observe(&mut self, event: &PollEvent) {
        if let PollEvent::Failed {
            resource,
            error,
            auth,
        } = event
        {
            if *auth {
                self.force_logout(error);
            } else {
                tracing::debug!("{} refresh failed: {}", resource, error);
            }
        }
    }

    /// Refresh the four polled collections once.
    pub async fn refresh(&mut self) -> Result<()> {
        self.require_auth()?;
        let result = self.resources.tick_all().await;
        let result = self.settle(result);
        self.drain_events();
        result
    }

    /// Refresh one collection now.
    pub async fn refresh_one(&mut self, collection: Collection) -> Result<()> {
        self.require_auth()?;
        let result = self.resources.tick(collection).await.map(|_| ());
        let result = self.settle(result);
        self.drain_events();
        result
    }

    /// Refresh after a successful mutation; a failure here leaves the
    /// mutation's outcome intact.
    async fn refresh_quietly(&mut self, collection: Collection) {
        if let Err(e) = self.resources.tick(collection).await {
            tracing::debug!("refresh of {:?} after mutation failed: {}", collection, e);
        }
        self.drain_events();
    }

    // ── snapshots ───────────────────────────────────────────────────────────

    /// Feed posts with local like state laid over the snapshot.
    pub fn feed(&self) -> Vec<Post> {
        let snapshot = self.resources.feed().snapshot();
        let fetched_at = snapshot.last_fetched_at();
        snapshot
            .into_items()
            .into_iter()
            .map(|mut post| {
                let shown = self.mutations.like_state(post.id, post.like_state(), fetched_at);
                post.like_count = shown.like_count;
                post.has_liked = shown.has_liked;
                post
            })
            .collect()
    }

    pub fn stories(&self) -> Vec<Story> {
        self.resources.stories().snapshot().into_items()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.resources.notifications().snapshot().into_items()
    }

    pub fn conversations(&self) -> Vec<Conversation> {
        self.resources.conversations().snapshot().into_items()
    }

    /// Messages of the open conversation, if any.
    pub fn messages(&self) -> Option<Vec<Message>> {
        self.resources
            .messages_snapshot()
            .map(|snapshot| snapshot.into_items())
    }

    pub fn unread_notifications(&self) -> usize {
        self.resources.unread_notifications()
    }

    pub fn unread_conversations(&self) -> usize {
        self.resources.unread_conversations()
    }

    // ── optimistic mutations ────────────────────────────────────────────────

    /// Toggle the like on post `id`, returning the state the server reports.
    pub async fn like(&mut self, id: PostId) -> Result<LikeState> {
        self.require_auth()?;
        if !self.feed().iter().any(|p| p.id == id) {
            self.refresh_quietly(Collection::Feed).await;
            self.require_auth()?;
        }

        let snapshot = self.resources.feed().snapshot();
        let base = snapshot
            .items()
            .iter()
            .find(|p| p.id == id)
            .map(Post::like_state)
            .unwrap_or_default();
        let result = self
            .mutations
            .toggle_like(id, base, snapshot.last_fetched_at())
            .await;
        self.settle(result)
    }

    pub async fn follow(&mut self, username: &str) -> Result<FollowState> {
        self.set_following(username, true).await
    }

    pub async fn unfollow(&mut self, username: &str) -> Result<FollowState> {
        self.set_following(username, false).await
    }

    async fn set_following(&mut self, username: &str, want: bool) -> Result<FollowState> {
        self.require_auth()?;
        let username = required("username", username)?;
        let issued_at = Utc::now();
        let profile = self.api.profile(username).await;
        let base = self.settle(profile)?.follow_state();

        let result = if want {
            self.mutations.follow(username, base, Some(issued_at)).await
        } else {
            self.mutations.unfollow(username, base, Some(issued_at)).await
        };
        self.settle(result)
    }

    // ── posts and stories ───────────────────────────────────────────────────

    pub async fn create_post(&mut self, caption: &str, media: Option<MediaFile>) -> Result<()> {
        self.require_auth()?;
        let media = media.ok_or(Error::FieldRequired { field: "media file" })?;
        let result = self.api.create_post(caption, media).await;
        self.settle(result)?;
        self.refresh_quietly(Collection::Feed).await;
        Ok(())
    }

    pub async fn update_post(&mut self, id: PostId, caption: &str) -> Result<()> {
        self.require_auth()?;
        let result = self.api.update_post(id, caption).await;
        self.settle(result)?;
        self.refresh_quietly(Collection::Feed).await;
        Ok(())
    }

    pub async fn delete_post(&mut self, id: PostId) -> Result<()> {
        self.require_auth()?;
        let result = self.api.delete_post(id).await;
        self.settle(result)?;
        self.refresh_quietly(Collection::Feed).await;
        Ok(())
    }

    pub async fn create_story(&mut self, caption: &str, file: Option<MediaFile>) -> Result<()> {
        self.require_auth()?;
        let file = file.ok_or(Error::FieldRequired { field: "media file" })?;
        let result = self.api.create_story(caption, file).await;
        self.settle(result)?;
        self.refresh_quietly(Collection::Stories).await;
        Ok(())
    }

    pub async fn update_story(&mut self, id: StoryId, caption: &str) -> Result<()> {
        self.require_auth()?;
        let result = self.api.update_story(id, caption).await;
        self.settle(result)?;
        self.refresh_quietly(Collection::Stories).await;
        Ok(())
    }

    pub async fn delete_story(&mut self, id: StoryId) -> Result<()> {
        self.require_auth()?;
        let result = self.api.delete_story(id).await;
        self.settle(result)?;
        self.refresh_quietly(Collection::Stories).await;
        Ok(())
    }

    pub async fn comments(&mut self, id: PostId) -> Result<Vec<Comment>> {
        self.require_auth()?;
        let result = self.api.comments(id).await;
        self.settle(result)
    }

    pub async fn add_comment(&mut self, id: PostId, text: &str) -> Result<()> {
        self.require_auth()?;
        let text = required("comment", text)?;
        let result = self.api.add_comment(id, text).await;
        self.settle(result)
    }

    // ── profiles and search ─────────────────────────────────────────────────

    /// Profile of `username` with any local follow state laid over it.
    pub async fn profile(&mut self, username: &str) -> Result<Profile> {
        self.require_auth()?;
        let username = required("username", username)?;
        let issued_at = Utc::now();
        let result = self.api.profile(username).await;
        let mut profile = self.settle(result)?;

        let shown =
            self.mutations
                .follow_state(username, profile.follow_state(), Some(issued_at));
        profile.is_following = shown.following;
        profile.followers_count = shown.followers_count;
        Ok(profile)
    }

    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<()> {
        self.require_auth()?;
        let result = self.api.update_profile(update).await;
        self.settle(result)
    }

    /// Search users and posts. A blank query matches nothing and sends no
    /// request.
    pub async fn search(&mut self, query: &str) -> Result<SearchResults> {
        self.require_auth()?;
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResults::default());
        }
        let result = self.api.search(query).await;
        self.settle(result)
    }

    // ── notifications and messages ──────────────────────────────────────────

    pub async fn mark_notifications_read(&mut self) -> Result<()> {
        self.require_auth()?;
        let result = self.api.mark_notifications_read().await;
        self.settle(result)?;
        self.refresh_quietly(Collection::Notifications).await;
        Ok(())
    }

    /// Start polling the conversation with `username`.
    pub fn open_conversation(&mut self, username: &str) -> Result<()> {
        self.require_auth()?;
        let username = required("username", username)?;
        self.resources.open_conversation(username);
        Ok(())
    }

    pub fn close_conversation(&mut self) {
        self.resources.close_conversation();
    }

    /// Open the conversation with `username` and fetch its messages now.
    pub async fn messages_with(&mut self, username: &str) -> Result<Vec<Message>> {
        self.open_conversation(username)?;
        self.refresh_one(Collection::Messages).await?;
        Ok(self.messages().unwrap_or_default())
    }

    pub async fn send_message(&mut self, username: &str, text: &str) -> Result<()> {
        self.require_auth()?;
        let username = required("username", username)?;
        let text = required("message", text)?;
        let result = self.api.send_message(username, text).await;
        self.settle(result)?;
        if self.resources.open_username() == Some(username) {
            self.refresh_quietly(Collection::Messages).await;
        }
        Ok(())
    }
}

fn validate_credentials(credentials: &Credentials) -> Result<()> {
    required("username", &credentials.username)?;
    if credentials.password.is_empty() {
        return Err(Error::FieldEmpty { field: "password" });
    }
    Ok(())
}

/// Trim `value`, rejecting it when nothing is left.
fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::FieldEmpty { field })
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
