// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Media URL normalization.
//!
//! The API reports media locations in three shapes:
//! - absolute URLs on the development host the file was uploaded through
//!   (`http://127.0.0.1:8000/uploads/a.jpg`)
//! - absolute URLs on some other host (CDN images, external avatars)
//! - bare relative paths (`uploads/a.jpg`, `/uploads/a.jpg`)
//!
//! Consumers always want a canonical absolute URL rooted at the configured
//! [`ApiOrigin`].

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

use crate::error::{Error, Result};

/// A validated API origin such as `https://sisam-backend.onrender.com`.
///
/// Stored without a trailing slash so paths can be appended with exactly one
/// separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiOrigin(String);

impl ApiOrigin {
    /// Parses an origin, rejecting anything that is not an absolute
    /// `http`/`https` URL with a host.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim().trim_end_matches('/');
        let url = Url::parse(trimmed).map_err(|_| Error::InvalidOrigin(raw.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(Error::InvalidOrigin(raw.to_string()));
        }
        Ok(ApiOrigin(trimmed.to_string()))
    }

    /// The origin without trailing slash.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins an endpoint path onto the origin with a single `/` separator.
    ///
    /// Trailing slashes on `path` are preserved (`/posts/` stays `/posts/`).
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl fmt::Display for ApiOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rewrites a media reference to a canonical absolute URL.
///
/// Returns `None` for empty or whitespace-only input.
pub fn normalize_media_url(origin: &ApiOrigin, raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    match Url::parse(trimmed) {
        Ok(url) if is_dev_host(&url) => {
            let mut out = format!("{}{}", origin.as_str(), url.path());
            if let Some(query) = url.query().filter(|q| !q.is_empty()) {
                out.push('?');
                out.push_str(query);
            }
            Some(out)
        }
        Ok(_) => Some(trimmed.to_string()),
        Err(_) => Some(origin.join(trimmed)),
    }
}

/// True for loopback and unspecified hosts that only exist on a developer
/// machine.
fn is_dev_host(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback() || ip == Ipv4Addr::UNSPECIFIED,
        Some(Host::Ipv6(ip)) => ip.is_loopback() || ip == Ipv6Addr::UNSPECIFIED,
        None => false,
    }
}

#[cfg(test)]
#[path = "media_tests.rs"]
mod tests;
