// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted transport for tests without a real server.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Notify;

use super::transport::{
    ApiRequest, ApiResponse, HttpTransport, Method, TransportError, TransportResult,
};

/// A canned reply for one request.
#[derive(Clone)]
pub enum Reply {
    Json(u16, Value),
    Text(u16, String),
    /// Fail at the transport level (connection refused and the like).
    Fail(String),
    /// Wait before replying.
    Delayed(Duration, Box<Reply>),
    /// Wait until the gate is notified before replying.
    Gated(Arc<Notify>, Box<Reply>),
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Reply::Json(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Reply::Text(status, body.to_string())
    }

    pub fn delayed(self, delay: Duration) -> Self {
        Reply::Delayed(delay, Box::new(self))
    }

    pub fn gated(self, gate: Arc<Notify>) -> Self {
        Reply::Gated(gate, Box::new(self))
    }
}

#[derive(Default)]
struct Route {
    once: VecDeque<Reply>,
    always: Option<Reply>,
}

#[derive(Default)]
struct MockState {
    routes: HashMap<(Method, String), Route>,
    requests: Vec<ApiRequest>,
}

/// Mock transport answering from per-route scripts.
///
/// One-shot replies are used first, then the sticky reply. Unscripted
/// routes answer 404.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request to `method path` with `reply`.
    pub fn on(&self, method: Method, path: &str, reply: Reply) -> &Self {
        let mut state = self.state.lock().unwrap();
        state
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .always = Some(reply);
        self
    }

    /// Answer the next request to `method path` with `reply`.
    pub fn once(&self, method: Method, path: &str, reply: Reply) -> &Self {
        let mut state = self.state.lock().unwrap();
        state
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .once
            .push_back(reply);
        self
    }

    /// Every request seen so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requests seen for one route.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// Script the four polled collections with empty lists.
    pub fn with_empty_collections(self) -> Self {
        self.on(Method::Get, "/posts/feed", Reply::ok(Value::Array(vec![])));
        self.on(Method::Get, "/stories/", Reply::ok(Value::Array(vec![])));
        self.on(Method::Get, "/notifications/", Reply::ok(Value::Array(vec![])));
        self.on(
            Method::Get,
            "/messages/conversations",
            Reply::ok(Value::Array(vec![])),
        );
        self
    }

    fn next_reply(&self, request: &ApiRequest) -> Reply {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());
        let route = state
            .routes
            .get_mut(&(request.method, request.path.clone()));
        match route {
            Some(route) => match route.once.pop_front() {
                Some(reply) => reply,
                None => route
                    .always
                    .clone()
                    .unwrap_or_else(|| Reply::status(404, "unscripted")),
            },
            None => Reply::status(
                404,
                &format!("no mock for {} {}", request.method.as_str(), request.path),
            ),
        }
    }
}

fn resolve(reply: Reply) -> Pin<Box<dyn Future<Output = TransportResult<ApiResponse>> + Send>> {
    Box::pin(async move {
        match reply {
            Reply::Json(status, body) => Ok(ApiResponse::new(status, body.to_string())),
            Reply::Text(status, body) => Ok(ApiResponse::new(status, body)),
            Reply::Fail(msg) => Err(TransportError::ConnectionFailed(msg)),
            Reply::Delayed(delay, inner) => {
                tokio::time::sleep(delay).await;
                resolve(*inner).await
            }
            Reply::Gated(gate, inner) => {
                gate.notified().await;
                resolve(*inner).await
            }
        }
    })
}

impl HttpTransport for MockTransport {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> Pin<Box<dyn Future<Output = TransportResult<ApiResponse>> + Send + '_>> {
        let reply = self.next_reply(&request);
        resolve(reply)
    }
}
