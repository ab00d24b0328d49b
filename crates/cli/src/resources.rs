// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The set of pollers backing an authenticated session.
//!
//! Feed, stories, notifications and conversations are always polled while
//! logged in. Messages are polled only for the one conversation that is
//! open, if any.

use std::sync::Arc;

use sisam_core::{CachedResource, Conversation, Message, Notification, Post, Story};
use tokio::sync::mpsc;

use crate::api::{ApiClient, HttpTransport};
use crate::config::PollIntervals;
use crate::error::Result;
use crate::poller::{fetcher, FetchFn, PollEvent, PollMode, Poller};

type MessagesFetch = Arc<dyn Fn(String) -> FetchFn<Message> + Send + Sync>;

/// One of the polled collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Feed,
    Stories,
    Notifications,
    Conversations,
    /// Messages of the open conversation.
    Messages,
}

struct OpenConversation {
    username: String,
    poller: Poller<Message>,
}

/// All pollers of one session.
pub struct Resources {
    feed: Poller<Post>,
    stories: Poller<Story>,
    notifications: Poller<Notification>,
    conversations: Poller<Conversation>,
    messages: Option<OpenConversation>,
    messages_fetch: MessagesFetch,
    intervals: PollIntervals,
    event_tx: mpsc::UnboundedSender<PollEvent>,
    /// Set while started.
    mode: Option<PollMode>,
}

impl Resources {
    /// Build stopped pollers over `api`.
    ///
    /// Returns the set and a receiver for poll events.
    pub fn new<T: HttpTransport + 'static>(
        api: &ApiClient<T>,
        intervals: PollIntervals,
    ) -> (Self, mpsc::UnboundedReceiver<PollEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let feed = {
            let api = api.clone();
            Poller::new(
                "feed",
                intervals.feed,
                fetcher(move || {
                    let api = api.clone();
                    async move { api.feed().await }
                }),
                event_tx.clone(),
            )
        };
        let stories = {
            let api = api.clone();
            Poller::new(
                "stories",
                intervals.stories,
                fetcher(move || {
                    let api = api.clone();
                    async move { api.stories().await }
                }),
                event_tx.clone(),
            )
        };
        let notifications = {
            let api = api.clone();
            Poller::new(
                "notifications",
                intervals.notifications,
                fetcher(move || {
                    let api = api.clone();
                    async move { api.notifications().await }
                }),
                event_tx.clone(),
            )
        };
        let conversations = {
            let api = api.clone();
            Poller::new(
                "conversations",
                intervals.conversations,
                fetcher(move || {
                    let api = api.clone();
                    async move { api.conversations().await }
                }),
                event_tx.clone(),
            )
        };
        let messages_fetch: MessagesFetch = {
            let api = api.clone();
            Arc::new(move |username: String| {
                let api = api.clone();
                fetcher(move || {
                    let api = api.clone();
                    let username = username.clone();
                    async move { api.messages_with(&username).await }
                })
            })
        };

        let resources = Resources {
            feed,
            stories,
            notifications,
            conversations,
            messages: None,
            messages_fetch,
            intervals,
            event_tx,
            mode: None,
        };
        (resources, event_rx)
    }

    pub fn feed(&self) -> &Poller<Post> {
        &self.feed
    }

    pub fn stories(&self) -> &Poller<Story> {
        &self.stories
    }

    pub fn notifications(&self) -> &Poller<Notification> {
        &self.notifications
    }

    pub fn conversations(&self) -> &Poller<Conversation> {
        &self.conversations
    }

    /// Poller of the open conversation, if one is open.
    pub fn messages(&self) -> Option<&Poller<Message>> {
        self.messages.as_ref().map(|open| &open.poller)
    }

    /// Username of the open conversation.
    pub fn open_username(&self) -> Option<&str> {
        self.messages.as_ref().map(|open| open.username.as_str())
    }

    pub fn mode(&self) -> Option<PollMode> {
        self.mode
    }

    /// Start every poller in `mode`.
    pub fn start_all(&mut self, mode: PollMode) {
        self.mode = Some(mode);
        self.feed.start_in(mode);
        self.stories.start_in(mode);
        self.notifications.start_in(mode);
        self.conversations.start_in(mode);
        if let Some(open) = self.messages.as_mut() {
            open.poller.start_in(mode);
        }
    }

    /// Stop every poller. No snapshot changes after this returns.
    pub fn stop_all(&mut self) {
        self.mode = None;
        self.feed.stop();
        self.stories.stop();
        self.notifications.stop();
        self.conversations.stop();
        if let Some(open) = self.messages.as_mut() {
            open.poller.stop();
        }
    }

    /// Empty every snapshot.
    pub fn reset_all(&self) {
        self.feed.reset();
        self.stories.reset();
        self.notifications.reset();
        self.conversations.reset();
        if let Some(open) = self.messages.as_ref() {
            open.poller.reset();
        }
    }

    /// Refresh the four collections once, concurrently.
    ///
    /// Every poller runs to completion; the first failure is returned.
    pub async fn tick_all(&self) -> Result<()> {
        let (feed, stories, notifications, conversations) = tokio::join!(
            self.feed.tick(),
            self.stories.tick(),
            self.notifications.tick(),
            self.conversations.tick(),
        );
        feed?;
        stories?;
        notifications?;
        conversations?;
        Ok(())
    }

    /// Refresh one collection now.
    ///
    /// `Ok(false)` when nothing was written, including when `Messages` is
    /// selected and no conversation is open.
    pub async fn tick(&self, collection: Collection) -> Result<bool> {
        match collection {
            Collection::Feed => self.feed.tick().await,
            Collection::Stories => self.stories.tick().await,
            Collection::Notifications => self.notifications.tick().await,
            Collection::Conversations => self.conversations.tick().await,
            Collection::Messages => match self.messages() {
                Some(poller) => poller.tick().await,
                None => Ok(false),
            },
        }
    }

    /// Begin polling messages with `username`, replacing any open
    /// conversation.
    pub fn open_conversation(&mut self, username: &str) {
        if self.open_username() == Some(username) {
            return;
        }
        self.close_conversation();

        let fetch = (self.messages_fetch)(username.to_string());
        let mut poller = Poller::new(
            "messages",
            self.intervals.messages,
            fetch,
            self.event_tx.clone(),
        );
        if let Some(mode) = self.mode {
            poller.start_in(mode);
        }
        self.messages = Some(OpenConversation {
            username: username.to_string(),
            poller,
        });
    }

    /// Stop polling the open conversation and drop its messages.
    pub fn close_conversation(&mut self) {
        if let Some(mut open) = self.messages.take() {
            open.poller.stop();
        }
    }

    /// Messages of the open conversation.
    pub fn messages_snapshot(&self) -> Option<CachedResource<Message>> {
        self.messages().map(Poller::snapshot)
    }

    /// Notifications not yet read.
    pub fn unread_notifications(&self) -> usize {
        self.notifications
            .snapshot()
            .items()
            .iter()
            .filter(|n| !n.is_read)
            .count()
    }

    /// Conversations with at least one unread message.
    pub fn unread_conversations(&self) -> usize {
        self.conversations
            .snapshot()
            .items()
            .iter()
            .filter(|c| c.unread_count > 0)
            .count()
    }
}

#[cfg(test)]
#[path = "resources_tests.rs"]
mod tests;
