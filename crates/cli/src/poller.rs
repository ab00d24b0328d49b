// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Background refresh of polled collections.
//!
//! A [`Poller`] owns one [`CachedResource`] and re-fetches it on a fixed
//! interval. Each tick's request runs in its own task, so a slow request
//! never delays the next tick. Responses are applied in request order, not
//! completion order: every fetch takes a sequence number when it starts and
//! a late response to an older request is discarded.
//!
//! ```text
//!   tick ──► spawn fetch(seq=n) ──► lock ──► active? ──► seq > current? ──► write
//!                                            │ no            │ no
//!                                            ▼               ▼
//!                                         discard         discard
//! ```
//!
//! Failures are logged and reported on the event channel; the previous
//! snapshot stays visible and the loop keeps running.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use sisam_core::CachedResource;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Future returned by a fetch function.
pub type FetchFuture<T> = Pin<Box<dyn Future<Output = Result<Vec<T>>> + Send>>;

/// Produces one fetch of the whole collection per call.
pub type FetchFn<T> = Arc<dyn Fn() -> FetchFuture<T> + Send + Sync>;

/// Wrap an async closure as a [`FetchFn`].
pub fn fetcher<T, F, Fut>(f: F) -> FetchFn<T>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()))
}

/// Events sent from pollers to the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    /// A fetch replaced the snapshot.
    Updated {
        resource: &'static str,
        count: usize,
    },
    /// A fetch failed; the snapshot is unchanged.
    Failed {
        resource: &'static str,
        error: String,
        /// The server rejected the session token.
        auth: bool,
    },
}

/// How refreshes are driven once the pollers are running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollMode {
    /// Timer loops refresh in the background.
    #[default]
    Background,
    /// Only explicit ticks refresh; no timers are spawned.
    OnDemand,
}

struct PollState<T> {
    resource: CachedResource<T>,
    /// Writes are accepted only while true.
    active: bool,
    /// Bumped on every activation so fetches from an earlier run never write.
    generation: u64,
}

struct Shared<T> {
    state: Mutex<PollState<T>>,
    next_seq: AtomicU64,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, PollState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Periodic refresher for one collection.
pub struct Poller<T> {
    name: &'static str,
    interval: Duration,
    fetch: FetchFn<T>,
    shared: Arc<Shared<T>>,
    event_tx: mpsc::UnboundedSender<PollEvent>,
    /// Present while the timer loop runs.
    cancel_token: Option<CancellationToken>,
}

impl<T: Clone + Send + 'static> Poller<T> {
    pub fn new(
        name: &'static str,
        interval: Duration,
        fetch: FetchFn<T>,
        event_tx: mpsc::UnboundedSender<PollEvent>,
    ) -> Self {
        Poller {
            name,
            interval,
            fetch,
            shared: Arc::new(Shared {
                state: Mutex::new(PollState {
                    resource: CachedResource::new(),
                    active: false,
                    generation: 0,
                }),
                next_seq: AtomicU64::new(0),
            }),
            event_tx,
            cancel_token: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether fetch results are currently accepted.
    pub fn is_active(&self) -> bool {
        self.shared.lock().active
    }

    /// Whether the background timer is running.
    pub fn is_running(&self) -> bool {
        self.cancel_token.is_some()
    }

    /// Accept fetch results without starting the timer.
    ///
    /// Used when refreshes are driven by explicit [`Poller::tick`] calls.
    pub fn activate(&mut self) {
        let mut state = self.shared.lock();
        if !state.active {
            state.active = true;
            state.generation += 1;
        }
    }

    /// Fetch immediately, then every interval until [`Poller::stop`].
    pub fn start(&mut self) {
        if self.cancel_token.is_some() {
            return;
        }
        self.activate();
        let generation = self.shared.lock().generation;

        let cancel_token = CancellationToken::new();
        self.cancel_token = Some(cancel_token.clone());

        let name = self.name;
        let interval = self.interval;
        let fetch = Arc::clone(&self.fetch);
        let shared = Arc::clone(&self.shared);
        let event_tx = self.event_tx.clone();

        tracing::debug!("starting {} poller every {:?}", name, interval);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    _ = ticker.tick() => {
                        let cycle = FetchCycle {
                            name,
                            fetch: Arc::clone(&fetch),
                            shared: Arc::clone(&shared),
                            event_tx: event_tx.clone(),
                            generation,
                            cancel_token: cancel_token.clone(),
                        };
                        tokio::spawn(async move {
                            // Errors are reported through the event channel.
                            let _ = cycle.run().await;
                        });
                    }
                }
            }
            tracing::debug!("{} poller stopped", name);
        });
    }

    /// Start with timers or just accept ticks, depending on `mode`.
    pub fn start_in(&mut self, mode: PollMode) {
        match mode {
            PollMode::Background => self.start(),
            PollMode::OnDemand => self.activate(),
        }
    }

    /// Stop the timer and refuse all further writes.
    ///
    /// Requests already in flight may complete but their results are dropped.
    pub fn stop(&mut self) {
        self.shared.lock().active = false;
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }

    /// Run one fetch now and apply it under the usual guards.
    ///
    /// Returns `Ok(true)` when the snapshot was replaced and `Ok(false)` when
    /// the poller is inactive or a newer request already wrote.
    pub async fn tick(&self) -> Result<bool> {
        let generation = {
            let state = self.shared.lock();
            if !state.active {
                return Ok(false);
            }
            state.generation
        };
        FetchCycle {
            name: self.name,
            fetch: Arc::clone(&self.fetch),
            shared: Arc::clone(&self.shared),
            event_tx: self.event_tx.clone(),
            generation,
            cancel_token: self.cancel_token.clone().unwrap_or_default(),
        }
        .run()
        .await
    }

    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> CachedResource<T> {
        self.shared.lock().resource.clone()
    }

    /// Drop the cached items.
    pub fn reset(&self) {
        self.shared.lock().resource.reset();
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}

/// One fetch-and-write.
struct FetchCycle<T> {
    name: &'static str,
    fetch: FetchFn<T>,
    shared: Arc<Shared<T>>,
    event_tx: mpsc::UnboundedSender<PollEvent>,
    generation: u64,
    cancel_token: CancellationToken,
}

impl<T> FetchCycle<T> {
    async fn run(self) -> Result<bool> {
        let seq = self.shared.next_seq.fetch_add(1, Ordering::AcqRel) + 1;
        let issued_at = Utc::now();

        let result = tokio::select! {
            _ = self.cancel_token.cancelled() => return Ok(false),
            result = (self.fetch)() => result,
        };

        let mut state = self.shared.lock();
        if !state.active || state.generation != self.generation {
            tracing::debug!("{} fetch #{} finished after stop, discarded", self.name, seq);
            return Ok(false);
        }

        match result {
            Ok(items) => {
                let count = items.len();
                if !state.resource.apply(seq, items, issued_at) {
                    tracing::debug!("{} fetch #{} superseded, discarded", self.name, seq);
                    return Ok(false);
                }
                drop(state);
                tracing::debug!("{} refreshed: {} items", self.name, count);
                let _ = self.event_tx.send(PollEvent::Updated {
                    resource: self.name,
                    count,
                });
                Ok(true)
            }
            Err(e) => {
                drop(state);
                tracing::debug!("{} fetch #{} failed: {}", self.name, seq, e);
                let _ = self.event_tx.send(PollEvent::Failed {
                    resource: self.name,
                    error: e.to_string(),
                    auth: e.is_auth(),
                });
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
