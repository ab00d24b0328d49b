// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted client state: bearer token, username and theme.
//!
//! The [`TokenStore`] is the single owner of the current [`Session`]. Readers
//! (the API client, pollers) take a cheap `Arc<Session>` snapshot; login and
//! logout swap in a new value under a write lock, so a reader never observes
//! a half-updated session.
//!
//! Persistence failures are logged and ignored. The in-memory session stays
//! authoritative for the lifetime of the process.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use sisam_core::{Session, Theme};

use crate::error::Result;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the logged-in username.
pub const USERNAME_KEY: &str = "username";
/// Storage key for the theme preference.
pub const THEME_KEY: &str = "theme";

/// String key/value persistence.
pub trait KeyValueStorage: Send + Sync {
    /// Read a key. Missing keys are `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<()>;
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(content) => Ok(Some(content.trim_end_matches('\n').to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        // Write to a sibling temp file first so readers never see a torn value.
        let tmp = self.dir.join(format!(".{key}.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.path(key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Volatile storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set`/`remove` fail with an I/O error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Release);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::Acquire) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "storage is read-only").into());
        }
        Ok(())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_writable()?;
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

/// Holder of the current session, shared by the controller and API client.
pub struct TokenStore {
    session: RwLock<Arc<Session>>,
    storage: Arc<dyn KeyValueStorage>,
}

impl TokenStore {
    /// Start anonymous, persisting into `storage`.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        TokenStore {
            session: RwLock::new(Arc::new(Session::anonymous())),
            storage,
        }
    }

    /// Rehydrate the session persisted in `storage`.
    ///
    /// The token is trusted as-is; the server is the judge of its validity.
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let store = Self::new(storage);
        let token = store.read_key(TOKEN_KEY).filter(|t| !t.is_empty());
        if let Some(token) = token {
            let username = store.read_key(USERNAME_KEY).filter(|u| !u.is_empty());
            store.replace(Session::authenticated(token, username));
        }
        store
    }

    /// An anonymous store backed by [`MemoryStorage`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Arc<Session> {
        Arc::clone(&self.session.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Install `token` (and optionally `username`) and persist both.
    pub fn set_token(&self, token: &str, username: Option<&str>) {
        self.replace(Session::authenticated(token, username.map(String::from)));
        self.write_key(TOKEN_KEY, Some(token));
        self.write_key(USERNAME_KEY, username);
    }

    /// Forget the token and username, in memory and on disk.
    pub fn clear_token(&self) {
        self.replace(Session::anonymous());
        self.write_key(TOKEN_KEY, None);
        self.write_key(USERNAME_KEY, None);
    }

    pub fn current_token(&self) -> Option<String> {
        self.session().token.clone()
    }

    pub fn username(&self) -> Option<String> {
        self.session().username.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    /// Persisted theme, `dark` when unset or unreadable.
    pub fn theme(&self) -> Theme {
        self.read_key(THEME_KEY)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.write_key(THEME_KEY, Some(theme.as_str()));
    }

    fn replace(&self, session: Session) {
        let mut guard = self.session.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(session);
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("failed to read '{}' from storage: {}", key, e);
                None
            }
        }
    }

    fn write_key(&self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(v) => self.storage.set(key, v),
            None => self.storage.remove(key),
        };
        if let Err(e) = result {
            tracing::warn!("failed to persist '{}': {}", key, e);
        }
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("session", &self.session())
            .finish()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
