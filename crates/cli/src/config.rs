// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration management.
//!
//! Configuration is stored in `config.toml` inside the state directory and
//! includes:
//! - `api_origin`: Base URL of the Sisam backend (overridden by `SISAM_API_BASE`)
//! - `[poll]`: Refresh intervals for each polled resource
//! - `[http]`: Request timeout

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sisam_core::ApiOrigin;

use crate::env;
use crate::error::{Error, Result};

const STATE_DIR_NAME: &str = "sisam";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Backend used when neither the config nor the environment names one.
pub const DEFAULT_API_ORIGIN: &str = "https://sisam-backend.onrender.com";

/// Client configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the backend, without trailing slash.
    #[serde(default = "default_api_origin")]
    pub api_origin: String,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Poll intervals in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_feed_ms")]
    pub feed_ms: u64,
    #[serde(default = "default_stories_ms")]
    pub stories_ms: u64,
    #[serde(default = "default_notifications_ms")]
    pub notifications_ms: u64,
    #[serde(default = "default_conversations_ms")]
    pub conversations_ms: u64,
    #[serde(default = "default_messages_ms")]
    pub messages_ms: u64,
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_origin() -> String {
    DEFAULT_API_ORIGIN.to_string()
}

fn default_feed_ms() -> u64 {
    4_000
}

fn default_stories_ms() -> u64 {
    4_000
}

fn default_notifications_ms() -> u64 {
    3_000
}

fn default_conversations_ms() -> u64 {
    4_000
}

fn default_messages_ms() -> u64 {
    4_000
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            feed_ms: default_feed_ms(),
            stories_ms: default_stories_ms(),
            notifications_ms: default_notifications_ms(),
            conversations_ms: default_conversations_ms(),
            messages_ms: default_messages_ms(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_origin: default_api_origin(),
            poll: PollConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

/// Refresh intervals for the background pollers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    pub feed: Duration,
    pub stories: Duration,
    pub notifications: Duration,
    pub conversations: Duration,
    pub messages: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        PollConfig::default().intervals()
    }
}

impl PollConfig {
    /// Zero intervals are clamped to 1ms so a timer can still be built.
    pub fn intervals(&self) -> PollIntervals {
        let ms = |v: u64| Duration::from_millis(v.max(1));
        PollIntervals {
            feed: ms(self.feed_ms),
            stories: ms(self.stories_ms),
            notifications: ms(self.notifications_ms),
            conversations: ms(self.conversations_ms),
            messages: ms(self.messages_ms),
        }
    }
}

impl Config {
    /// Loads configuration from the given state directory.
    ///
    /// A missing file yields the defaults.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let config_path = state_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Saves configuration to the given state directory.
    pub fn save(&self, state_dir: &Path) -> Result<()> {
        fs::create_dir_all(state_dir)?;
        let config_path = state_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// The API origin, honoring `SISAM_API_BASE`.
    pub fn origin(&self) -> Result<ApiOrigin> {
        self.resolve_origin(env::api_base())
    }

    /// The API origin with an explicit override in place of the environment.
    pub fn resolve_origin(&self, overridden: Option<String>) -> Result<ApiOrigin> {
        let raw = overridden.unwrap_or_else(|| self.api_origin.clone());
        Ok(ApiOrigin::parse(&raw)?)
    }

    pub fn poll_intervals(&self) -> PollIntervals {
        self.poll.intervals()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs.max(1))
    }
}

/// Directory holding `config.toml` and the persisted session keys.
///
/// Resolution order: `SISAM_STATE_DIR`, `$XDG_STATE_HOME/sisam`, the
/// platform state (or data) directory, then `~/.local/state/sisam`.
pub fn state_dir() -> PathBuf {
    resolve_state_dir(env::state_dir(), env::xdg_state_home())
}

fn resolve_state_dir(explicit: Option<PathBuf>, xdg: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    if let Some(xdg) = xdg {
        return xdg.join(STATE_DIR_NAME);
    }
    if let Some(dir) = dirs::state_dir().or_else(dirs::data_local_dir) {
        return dir.join(STATE_DIR_NAME);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local/state")
        .join(STATE_DIR_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
