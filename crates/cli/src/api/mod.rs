// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP access to the Sisam backend.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌───────────────┐     ┌─────────────┐
//! │  ApiClient  │────►│ HttpTransport │────►│   Backend   │
//! │  (typed)    │◄────│    (trait)    │◄────│  (REST API) │
//! └─────────────┘     └───────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ TokenStore  │  (bearer token, read per request)
//! └─────────────┘
//! ```

mod client;
mod transport;

#[cfg(test)]
pub mod testing;

pub use client::{ApiClient, MediaFile};
pub use transport::{
    ApiRequest, ApiResponse, FormPart, HttpTransport, Method, ReqwestTransport, RequestBody,
    TransportError, TransportResult,
};
