// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cached copies of polled collections.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The latest successfully fetched snapshot of a collection.
///
/// Writes are ordered by request sequence number, not by completion order: a
/// response to an older request never replaces a snapshot produced by a newer
/// one. Failed fetches simply never call [`CachedResource::apply`], so the
/// previous snapshot stays visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedResource<T> {
    items: Vec<T>,
    /// When the request behind `items` was issued.
    last_fetched_at: Option<DateTime<Utc>>,
    /// Sequence number of the request behind `items` (0 = never written).
    seq: u64,
}

impl<T> Default for CachedResource<T> {
    fn default() -> Self {
        CachedResource {
            items: Vec::new(),
            last_fetched_at: None,
            seq: 0,
        }
    }
}

impl<T> CachedResource<T> {
    /// Create an empty resource.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last_fetched_at(&self) -> Option<DateTime<Utc>> {
        self.last_fetched_at
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Store the result of request `seq`, issued at `issued_at`.
    ///
    /// Returns `false` and leaves the snapshot untouched when a request with
    /// the same or a later sequence number has already written.
    pub fn apply(&mut self, seq: u64, items: Vec<T>, issued_at: DateTime<Utc>) -> bool {
        if seq <= self.seq {
            return false;
        }
        self.items = items;
        self.last_fetched_at = Some(issued_at);
        self.seq = seq;
        true
    }

    /// Discard the cached items.
    ///
    /// The sequence high-water mark survives, so responses to requests
    /// issued before the reset still lose to newer ones.
    pub fn reset(&mut self) {
        self.items.clear();
        self.last_fetched_at = None;
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
