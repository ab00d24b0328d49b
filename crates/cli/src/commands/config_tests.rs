// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::config::DEFAULT_API_ORIGIN;
use tempfile::TempDir;

fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_show_defaults() {
    let mut out = Vec::new();

    show_impl(&Config::default(), &mut out, None).unwrap();

    let text = output(out);
    assert!(text.contains(&format!("api_origin = \"{}\"", DEFAULT_API_ORIGIN)));
    assert!(text.contains("[poll]"));
    assert!(text.contains("[http]"));
    assert!(!text.contains("SISAM_API_BASE"));
}

#[test]
fn test_show_notes_environment_override() {
    let mut out = Vec::new();

    show_impl(
        &Config::default(),
        &mut out,
        Some("http://localhost:8000/".to_string()),
    )
    .unwrap();

    assert!(output(out).ends_with("# SISAM_API_BASE overrides api_origin: http://localhost:8000\n"));
}

#[test]
fn test_show_rejects_bad_override() {
    let mut out = Vec::new();

    let err = show_impl(&Config::default(), &mut out, Some("nope".to_string())).unwrap_err();

    assert!(matches!(err, Error::InvalidOrigin(_)));
}

#[test]
fn test_set_origin_persists_normalized_value() {
    let dir = TempDir::new().unwrap();
    let mut out = Vec::new();

    set_origin_impl(dir.path(), &mut out, "http://localhost:8000/", None).unwrap();

    assert_eq!(output(out), "API origin set to http://localhost:8000\n");
    let config = Config::load(dir.path()).unwrap();
    assert_eq!(config.api_origin, "http://localhost:8000");
}

#[test]
fn test_set_origin_keeps_other_settings() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.http.timeout_secs = 3;
    config.save(dir.path()).unwrap();

    set_origin_impl(dir.path(), &mut Vec::new(), "https://example.org", None).unwrap();

    let config = Config::load(dir.path()).unwrap();
    assert_eq!(config.http.timeout_secs, 3);
    assert_eq!(config.api_origin, "https://example.org");
}

#[test]
fn test_set_origin_warns_about_override() {
    let dir = TempDir::new().unwrap();
    let mut out = Vec::new();

    set_origin_impl(
        dir.path(),
        &mut out,
        "https://example.org",
        Some("http://localhost:8000".to_string()),
    )
    .unwrap();

    assert!(output(out).contains("SISAM_API_BASE is set"));
}

#[test]
fn test_set_origin_rejects_relative() {
    let dir = TempDir::new().unwrap();

    let err = set_origin_impl(dir.path(), &mut Vec::new(), "api.example.org", None).unwrap_err();

    assert!(matches!(err, Error::InvalidOrigin(_)));
    assert!(!dir.path().join("config.toml").exists());
}
