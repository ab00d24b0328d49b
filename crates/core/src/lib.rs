// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sisam-core: Shared types for the sisam client
//!
//! This crate provides the API models and the I/O-free pieces of the
//! session and sync layer: media URL normalization, cached resource
//! ordering, optimistic edit bookkeeping and the session state machine.

pub mod error;
pub mod media;
pub mod models;
pub mod optimistic;
pub mod resource;
pub mod session;

pub use error::{Error, Result};
pub use media::{normalize_media_url, ApiOrigin};
pub use models::{
    AuthResponse, CaptionUpdate, Comment, Conversation, Credentials, FollowResult, LikeResult,
    Message, Notification, Post, PostId, Profile, ProfileUpdate, SearchResults, Story, StoryId,
    TextBody, Theme, UserSummary,
};
pub use optimistic::{EditTicket, FollowState, LikeState, OptimisticStore, Reconcile, Toggle};
pub use resource::CachedResource;
pub use session::{Session, SessionEvent, SessionState};
