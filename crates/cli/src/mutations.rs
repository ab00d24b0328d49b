// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Optimistic likes and follows.
//!
//! The visible state changes before the request is sent. A successful
//! response replaces it with the server's answer exactly; a failure restores
//! what was visible before the click.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use sisam_core::{FollowState, LikeState, OptimisticStore, PostId, Toggle};

use crate::api::{ApiClient, HttpTransport, ReqwestTransport};
use crate::error::Result;

type LikeStore = OptimisticStore<PostId, LikeState>;
type FollowStore = OptimisticStore<String, FollowState>;

pub struct Mutations<T: HttpTransport = ReqwestTransport> {
    api: ApiClient<T>,
    likes: Mutex<LikeStore>,
    follows: Mutex<FollowStore>,
}

impl<T: HttpTransport> Mutations<T> {
    pub fn new(api: ApiClient<T>) -> Self {
        Mutations {
            api,
            likes: Mutex::new(OptimisticStore::new()),
            follows: Mutex::new(OptimisticStore::new()),
        }
    }

    fn likes(&self) -> MutexGuard<'_, LikeStore> {
        self.likes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn follows(&self) -> MutexGuard<'_, FollowStore> {
        self.follows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Like state to show for a post whose server state is `server`, taken
    /// from a snapshot requested at `snapshot_at`.
    pub fn like_state(
        &self,
        id: PostId,
        server: LikeState,
        snapshot_at: Option<DateTime<Utc>>,
    ) -> LikeState {
        self.likes().overlay(&id, server, snapshot_at)
    }

    /// Follow state to show for `username`.
    pub fn follow_state(
        &self,
        username: &str,
        server: FollowState,
        snapshot_at: Option<DateTime<Utc>>,
    ) -> FollowState {
        self.follows()
            .overlay(&username.to_string(), server, snapshot_at)
    }

    pub fn is_like_pending(&self, id: PostId) -> bool {
        self.likes().is_pending(&id)
    }

    pub fn is_follow_pending(&self, username: &str) -> bool {
        self.follows().is_pending(&username.to_string())
    }

    /// Edits still awaiting a server answer.
    pub fn pending_count(&self) -> usize {
        self.likes().pending_count() + self.follows().pending_count()
    }

    /// Toggle the like on post `id`.
    ///
    /// `base` is the server state from the snapshot requested at
    /// `snapshot_at`. Returns the state the server reported.
    pub async fn toggle_like(
        &self,
        id: PostId,
        base: LikeState,
        snapshot_at: Option<DateTime<Utc>>,
    ) -> Result<LikeState> {
        let (ticket, optimistic) = {
            let mut likes = self.likes();
            let target = likes.overlay(&id, base, snapshot_at).toggled();
            (likes.apply(id, target), target)
        };

        match self.api.like(id).await {
            Ok(result) => {
                let server = result.resolve(optimistic);
                self.likes().confirm(&ticket, server);
                Ok(server)
            }
            Err(e) => {
                self.likes().revert(&ticket);
                tracing::warn!("like on post {} failed, reverted: {}", id, e);
                Err(e)
            }
        }
    }

    /// Follow `username`. A no-op locally when already following.
    pub async fn follow(
        &self,
        username: &str,
        base: FollowState,
        snapshot_at: Option<DateTime<Utc>>,
    ) -> Result<FollowState> {
        self.set_following(username, true, base, snapshot_at).await
    }

    /// Unfollow `username`. A no-op locally when not following.
    pub async fn unfollow(
        &self,
        username: &str,
        base: FollowState,
        snapshot_at: Option<DateTime<Utc>>,
    ) -> Result<FollowState> {
        self.set_following(username, false, base, snapshot_at).await
    }

    async fn set_following(
        &self,
        username: &str,
        want: bool,
        base: FollowState,
        snapshot_at: Option<DateTime<Utc>>,
    ) -> Result<FollowState> {
        let key = username.to_string();
        let (ticket, optimistic) = {
            let mut follows = self.follows();
            let current = follows.overlay(&key, base, snapshot_at);
            let target = if current.following == want {
                current
            } else {
                current.toggled()
            };
            (follows.apply(key, target), target)
        };

        let result = if want {
            self.api.follow(username).await
        } else {
            self.api.unfollow(username).await
        };

        let result = match result {
            Ok(result) => result,
            Err(e) => {
                self.follows().revert(&ticket);
                tracing::warn!("follow change for {} failed, reverted: {}", username, e);
                return Err(e);
            }
        };

        let following = result.following.unwrap_or(want);
        let followers_count = match result.followers_count {
            Some(count) => count,
            // The response carried no counts; ask the profile.
            None => match self.api.profile(username).await {
                Ok(profile) => profile.followers_count,
                Err(e) => {
                    tracing::warn!("failed to re-read profile of {}: {}", username, e);
                    optimistic.followers_count
                }
            },
        };

        let server = FollowState {
            following,
            followers_count,
        };
        self.follows().confirm(&ticket, server);
        Ok(server)
    }

    /// Drop every local value and pending edit.
    pub fn clear(&self) {
        self.likes().clear();
        self.follows().clear();
    }
}

#[cfg(test)]
#[path = "mutations_tests.rs"]
mod tests;
