// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for HTTP requests to the Sisam backend.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTP requests via reqwest for production
//! - Scripted mock transports for unit testing

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use sisam_core::ApiOrigin;
use url::Url;

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Could not reach the server.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request did not complete in time.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The request URL could not be built.
    #[error("invalid request url: {0}")]
    InvalidUrl(String),

    /// Any other failure while sending or reading the response.
    #[error("request failed: {0}")]
    RequestFailed(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// One field of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text { name: String, value: String },
    File {
        name: String,
        file_name: String,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn text(name: &str, value: impl Into<String>) -> Self {
        FormPart::Text {
            name: name.to_string(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormPart>),
}

/// A request relative to the API origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Endpoint path such as `/posts/feed`.
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Bearer token to attach, if any.
    pub token: Option<String>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            token: None,
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Absolute URL of this request under `origin`.
    pub fn url(&self, origin: &ApiOrigin) -> TransportResult<Url> {
        let mut url = Url::parse(&origin.join(&self.path))
            .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }
}

/// Raw response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        ApiResponse {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport trait for request/response HTTP exchanges.
///
/// Takes `&self` so one transport can serve concurrent pollers.
pub trait HttpTransport: Send + Sync {
    /// Execute a request and return the raw response.
    ///
    /// Non-2xx statuses are responses, not errors.
    fn execute(
        &self,
        request: ApiRequest,
    ) -> Pin<Box<dyn Future<Output = TransportResult<ApiResponse>> + Send + '_>>;
}

/// HTTP transport implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    origin: ApiOrigin,
}

impl ReqwestTransport {
    /// Create a transport for `origin` with a per-request timeout.
    pub fn new(origin: ApiOrigin, timeout: Duration) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sisam/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::RequestFailed(e.to_string()))?;
        Ok(ReqwestTransport { client, origin })
    }

    pub fn origin(&self) -> &ApiOrigin {
        &self.origin
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(e.to_string())
    } else if e.is_connect() {
        TransportError::ConnectionFailed(e.to_string())
    } else {
        TransportError::RequestFailed(e.to_string())
    }
}

fn build_form(parts: Vec<FormPart>) -> reqwest::multipart::Form {
    parts
        .into_iter()
        .fold(reqwest::multipart::Form::new(), |form, part| match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File {
                name,
                file_name,
                bytes,
            } => form.part(
                name,
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            ),
        })
}

impl HttpTransport for ReqwestTransport {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> Pin<Box<dyn Future<Output = TransportResult<ApiResponse>> + Send + '_>> {
        Box::pin(async move {
            let url = request.url(&self.origin)?;
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
                Method::Put => reqwest::Method::PUT,
                Method::Delete => reqwest::Method::DELETE,
            };

            let mut builder = self.client.request(method, url);
            if let Some(token) = &request.token {
                builder = builder.bearer_auth(token);
            }
            builder = match request.body {
                RequestBody::Empty => builder,
                RequestBody::Json(value) => builder.json(&value),
                RequestBody::Multipart(parts) => builder.multipart(build_form(parts)),
            };

            let response = builder.send().await.map_err(map_reqwest_error)?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(map_reqwest_error)?;
            Ok(ApiResponse { status, body })
        })
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
