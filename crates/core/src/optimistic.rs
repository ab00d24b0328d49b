// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Optimistic edit bookkeeping.
//!
//! An optimistic edit changes the visible value of one (entity, field) key
//! before the server has confirmed it. Each edit gets a ticket carrying a
//! sequence number; confirm and revert only take effect while the ticket is
//! still the pending edit for its key, so a late answer to an older request
//! can never overwrite a newer edit.
//!
//! ```text
//!   apply(k, v1) ──► pending(seq=1) ──► confirm(t1, server) ──► settled
//!        │                 │
//!        │           apply(k, v2) ──► pending(seq=2)    (t1 is now stale)
//!        │                                   │
//!        └────────── revert(t2) ◄────────────┘  restores the value seen before v2
//! ```

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Values that support a two-state toggle (like/unlike, follow/unfollow).
pub trait Toggle: Clone {
    /// The value after the user flips the toggle once.
    fn toggled(&self) -> Self;
}

/// Like state of a post as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LikeState {
    pub like_count: u64,
    pub has_liked: bool,
}

impl Toggle for LikeState {
    fn toggled(&self) -> Self {
        if self.has_liked {
            LikeState {
                like_count: self.like_count.saturating_sub(1),
                has_liked: false,
            }
        } else {
            LikeState {
                like_count: self.like_count.saturating_add(1),
                has_liked: true,
            }
        }
    }
}

/// Follow state of a profile as shown to the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FollowState {
    pub following: bool,
    pub followers_count: u64,
}

impl Toggle for FollowState {
    fn toggled(&self) -> Self {
        if self.following {
            FollowState {
                following: false,
                followers_count: self.followers_count.saturating_sub(1),
            }
        } else {
            FollowState {
                following: true,
                followers_count: self.followers_count.saturating_add(1),
            }
        }
    }
}

/// Handle returned by [`OptimisticStore::apply`], used to reconcile the edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTicket<K> {
    key: K,
    seq: u64,
}

impl<K> EditTicket<K> {
    /// The key this edit touched.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Sequence number of the edit.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Outcome of a confirm or revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// The ticket matched the pending edit and the visible value changed.
    Applied,
    /// The ticket was superseded (or already reconciled); nothing changed.
    Stale,
}

#[derive(Debug, Clone)]
struct PendingEdit<V> {
    seq: u64,
    /// Visible value right before the edit. `None` means the key had no
    /// local value and readers fell back to server data.
    before: Option<V>,
    before_settled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct Entry<V> {
    visible: V,
    pending: Option<PendingEdit<V>>,
    settled_at: Option<DateTime<Utc>>,
}

/// Local values for keys that have been optimistically edited.
#[derive(Debug, Clone)]
pub struct OptimisticStore<K, V> {
    entries: HashMap<K, Entry<V>>,
    next_seq: u64,
}

impl<K, V> Default for OptimisticStore<K, V> {
    fn default() -> Self {
        OptimisticStore {
            entries: HashMap::new(),
            next_seq: 1,
        }
    }
}

impl<K, V> OptimisticStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `value` immediately and record it as the pending edit for `key`.
    ///
    /// A pending edit already present for `key` is replaced, and its ticket
    /// becomes stale.
    pub fn apply(&mut self, key: K, value: V) -> EditTicket<K> {
        let seq = self.next_seq;
        self.next_seq += 1;

        let previous = self.entries.get(&key);
        let before = previous.map(|e| e.visible.clone());
        let before_settled_at = previous.and_then(|e| e.settled_at);
        self.entries.insert(
            key.clone(),
            Entry {
                visible: value,
                pending: Some(PendingEdit {
                    seq,
                    before,
                    before_settled_at,
                }),
                settled_at: None,
            },
        );

        EditTicket { key, seq }
    }

    /// Flip the visible value of `key`, starting from `base` when the key
    /// has no local value yet.
    pub fn apply_toggle(&mut self, key: K, base: V) -> EditTicket<K>
    where
        V: Toggle,
    {
        let current = self.value(&key).unwrap_or(base);
        self.apply(key, current.toggled())
    }

    /// Replace the optimistic value with the authoritative server value.
    pub fn confirm(&mut self, ticket: &EditTicket<K>, server_value: V) -> Reconcile {
        match self.entries.get_mut(&ticket.key) {
            Some(entry) if Self::is_current(entry, ticket) => {
                entry.visible = server_value;
                entry.pending = None;
                entry.settled_at = Some(Utc::now());
                Reconcile::Applied
            }
            _ => Reconcile::Stale,
        }
    }

    /// Restore the value that was visible right before the ticket's edit.
    pub fn revert(&mut self, ticket: &EditTicket<K>) -> Reconcile {
        let Some(entry) = self.entries.get_mut(&ticket.key) else {
            return Reconcile::Stale;
        };
        if !Self::is_current(entry, ticket) {
            return Reconcile::Stale;
        }

        match entry.pending.take() {
            Some(PendingEdit {
                before: Some(before),
                before_settled_at,
                ..
            }) => {
                entry.visible = before;
                // A restored value that never settled is treated as settled now.
                entry.settled_at = before_settled_at.or_else(|| Some(Utc::now()));
            }
            _ => {
                self.entries.remove(&ticket.key);
            }
        }
        Reconcile::Applied
    }

    fn is_current(entry: &Entry<V>, ticket: &EditTicket<K>) -> bool {
        entry.pending.as_ref().is_some_and(|p| p.seq == ticket.seq)
    }

    /// Locally known value for `key`, pending or settled.
    pub fn value(&self, key: &K) -> Option<V> {
        self.entries.get(key).map(|e| e.visible.clone())
    }

    /// True while an edit for `key` awaits confirmation.
    pub fn is_pending(&self, key: &K) -> bool {
        self.entries.get(key).is_some_and(|e| e.pending.is_some())
    }

    /// Number of edits awaiting confirmation.
    pub fn pending_count(&self) -> usize {
        self.entries.values().filter(|e| e.pending.is_some()).count()
    }

    /// Pick the value to show for `key` given server data from a snapshot
    /// requested at `snapshot_at`.
    ///
    /// Pending edits always win. A settled value wins only over snapshots
    /// requested before it settled.
    pub fn overlay(&self, key: &K, server: V, snapshot_at: Option<DateTime<Utc>>) -> V {
        match self.entries.get(key) {
            Some(entry) if entry.pending.is_some() => entry.visible.clone(),
            Some(entry) => match (entry.settled_at, snapshot_at) {
                (Some(settled), Some(fetched)) if settled < fetched => server,
                _ => entry.visible.clone(),
            },
            None => server,
        }
    }

    /// Drop every local value and pending edit.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[path = "optimistic_tests.rs"]
mod tests;
