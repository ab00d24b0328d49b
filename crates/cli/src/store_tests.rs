// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tempfile::TempDir;

fn memory() -> Arc<MemoryStorage> {
    Arc::new(MemoryStorage::new())
}

#[test]
fn test_new_store_is_anonymous() {
    let store = TokenStore::in_memory();
    assert_eq!(store.current_token(), None);
    assert_eq!(store.username(), None);
    assert!(!store.is_authenticated());
}

#[test]
fn test_set_token_persists() {
    let storage = memory();
    let store = TokenStore::new(storage.clone());

    store.set_token("tok-1", Some("alice"));

    assert_eq!(store.current_token().as_deref(), Some("tok-1"));
    assert_eq!(store.username().as_deref(), Some("alice"));
    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
    assert_eq!(storage.get(USERNAME_KEY).unwrap().as_deref(), Some("alice"));
}

#[test]
fn test_clear_token_removes_keys() {
    let storage = memory();
    let store = TokenStore::new(storage.clone());
    store.set_token("tok-1", Some("alice"));

    store.clear_token();

    assert_eq!(store.current_token(), None);
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(USERNAME_KEY).unwrap(), None);
}

#[test]
fn test_load_rehydrates_persisted_session() {
    let storage = memory();
    storage.set(TOKEN_KEY, "persisted").unwrap();
    storage.set(USERNAME_KEY, "bob").unwrap();

    let store = TokenStore::load(storage);
    assert!(store.is_authenticated());
    assert_eq!(store.current_token().as_deref(), Some("persisted"));
    assert_eq!(store.username().as_deref(), Some("bob"));
}

#[test]
fn test_load_without_username() {
    let storage = memory();
    storage.set(TOKEN_KEY, "persisted").unwrap();

    let store = TokenStore::load(storage);
    assert!(store.is_authenticated());
    assert_eq!(store.username(), None);
}

#[test]
fn test_load_empty_token_is_anonymous() {
    let storage = memory();
    storage.set(TOKEN_KEY, "").unwrap();

    let store = TokenStore::load(storage);
    assert!(!store.is_authenticated());
}

#[test]
fn test_write_failures_are_ignored() {
    let storage = memory();
    storage.set_fail_writes(true);
    let store = TokenStore::new(storage.clone());

    store.set_token("tok-1", Some("alice"));

    // In-memory value is still authoritative.
    assert_eq!(store.current_token().as_deref(), Some("tok-1"));
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);

    store.clear_token();
    assert_eq!(store.current_token(), None);
}

#[test]
fn test_session_snapshots_are_immutable() {
    let store = TokenStore::in_memory();
    store.set_token("first", None);
    let before = store.session();

    store.set_token("second", None);

    assert_eq!(before.token.as_deref(), Some("first"));
    assert_eq!(store.session().token.as_deref(), Some("second"));
}

#[test]
fn test_theme_defaults_to_dark() {
    let store = TokenStore::in_memory();
    assert_eq!(store.theme(), Theme::Dark);
}

#[test]
fn test_theme_roundtrip_and_garbage() {
    let storage = memory();
    let store = TokenStore::new(storage.clone());

    store.set_theme(Theme::Light);
    assert_eq!(store.theme(), Theme::Light);

    storage.set(THEME_KEY, "neon").unwrap();
    assert_eq!(store.theme(), Theme::Dark);
}

#[test]
fn test_debug_hides_token() {
    let store = TokenStore::in_memory();
    store.set_token("secret-token", Some("alice"));
    let debug = format!("{:?}", store);
    assert!(!debug.contains("secret-token"));
}

#[test]
fn test_file_storage_roundtrip() {
    let temp = TempDir::new().unwrap();
    let storage = FileStorage::new(temp.path().join("state"));

    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);

    storage.set(TOKEN_KEY, "abc").unwrap();
    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    assert!(!storage.dir().join(".token.tmp").exists());

    storage.set(TOKEN_KEY, "def").unwrap();
    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("def"));

    storage.remove(TOKEN_KEY).unwrap();
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    storage.remove(TOKEN_KEY).unwrap();
}

#[test]
fn test_file_storage_survives_restart() {
    let temp = TempDir::new().unwrap();

    let first = TokenStore::new(Arc::new(FileStorage::new(temp.path())));
    first.set_token("tok-9", Some("carol"));
    first.set_theme(Theme::Light);

    let second = TokenStore::load(Arc::new(FileStorage::new(temp.path())));
    assert_eq!(second.current_token().as_deref(), Some("tok-9"));
    assert_eq!(second.username().as_deref(), Some("carol"));
    assert_eq!(second.theme(), Theme::Light);
}
