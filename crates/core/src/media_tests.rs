// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

const ORIGIN: &str = "https://sisam-backend.onrender.com";

fn origin() -> ApiOrigin {
    ApiOrigin::parse(ORIGIN).unwrap()
}

#[parameterized(
    plain = { "https://api.example.com", "https://api.example.com" },
    trailing_slash = { "https://api.example.com/", "https://api.example.com" },
    many_trailing = { "https://api.example.com///", "https://api.example.com" },
    padded = { "  http://localhost:8000 ", "http://localhost:8000" },
    with_path = { "https://example.com/api/", "https://example.com/api" },
)]
fn origin_parse_valid(input: &str, expected: &str) {
    assert_eq!(ApiOrigin::parse(input).unwrap().as_str(), expected);
}

#[parameterized(
    empty = { "" },
    relative = { "api.example.com" },
    ftp = { "ftp://example.com" },
    mailto = { "mailto:someone@example.com" },
)]
fn origin_parse_invalid(input: &str) {
    assert!(ApiOrigin::parse(input).is_err());
}

#[test]
fn origin_join_uses_single_separator() {
    let o = origin();
    assert_eq!(o.join("/posts/feed"), format!("{ORIGIN}/posts/feed"));
    assert_eq!(o.join("posts/feed"), format!("{ORIGIN}/posts/feed"));
    assert_eq!(o.join("/posts/"), format!("{ORIGIN}/posts/"));
}

#[parameterized(
    filename = { "xyz.jpg" },
    nested = { "uploads/xyz.jpg" },
    deep = { "uploads/2024/01/a b.png" },
    with_query = { "uploads/a.jpg?size=small" },
)]
fn relative_path_is_prefixed_with_origin(path: &str) {
    assert_eq!(
        normalize_media_url(&origin(), path).unwrap(),
        format!("{ORIGIN}/{path}")
    );
}

#[parameterized(
    rooted = { "/uploads/a.jpg", "/uploads/a.jpg" },
    double_rooted = { "//uploads/a.jpg", "/uploads/a.jpg" },
    padded = { "  /uploads/a.jpg\n", "/uploads/a.jpg" },
)]
fn rooted_path_has_no_double_slash(raw: &str, path: &str) {
    assert_eq!(
        normalize_media_url(&origin(), raw).unwrap(),
        format!("{ORIGIN}{path}")
    );
}

#[parameterized(
    localhost = { "http://localhost:8000/uploads/a.jpg", "/uploads/a.jpg" },
    localhost_tls = { "https://localhost/uploads/a.jpg", "/uploads/a.jpg" },
    loopback_v4 = { "http://127.0.0.1:8000/uploads/a.jpg?v=2", "/uploads/a.jpg?v=2" },
    loopback_other = { "http://127.0.1.1/media/b.png", "/media/b.png" },
    loopback_v6 = { "http://[::1]:8000/media/b.png", "/media/b.png" },
    unspecified = { "http://0.0.0.0:8000/media/c.png", "/media/c.png" },
    empty_query = { "http://localhost:8000/a.jpg?", "/a.jpg" },
    fragment_dropped = { "http://localhost:8000/a.jpg#top", "/a.jpg" },
    bare_host = { "http://localhost:8000", "/" },
)]
fn loopback_url_is_rehosted(raw: &str, path_and_query: &str) {
    assert_eq!(
        normalize_media_url(&origin(), raw).unwrap(),
        format!("{ORIGIN}{path_and_query}")
    );
}

#[parameterized(
    cdn = { "https://cdn.example.com/img/a.jpg" },
    avatar = { "http://avatars.example.org/u/1?s=64" },
    data = { "data:image/png;base64,AAAA" },
)]
fn foreign_absolute_url_passes_through(raw: &str) {
    assert_eq!(normalize_media_url(&origin(), raw).unwrap(), raw);
}

#[parameterized(
    empty = { "" },
    spaces = { "   " },
    newline = { "\n\t" },
)]
fn blank_input_is_none(raw: &str) {
    assert!(normalize_media_url(&origin(), raw).is_none());
}

#[parameterized(
    relative = { "uploads/a.jpg" },
    rooted = { "/uploads/a.jpg" },
    loopback = { "http://127.0.0.1:8000/uploads/a.jpg?v=1" },
    foreign = { "https://cdn.example.com/a.jpg" },
)]
fn normalization_is_idempotent(raw: &str) {
    let once = normalize_media_url(&origin(), raw).unwrap();
    let twice = normalize_media_url(&origin(), &once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn normalization_is_idempotent_for_dev_origin() {
    let dev = ApiOrigin::parse("http://localhost:8000/").unwrap();
    let once = normalize_media_url(&dev, "uploads/a.jpg?v=1").unwrap();
    assert_eq!(once, "http://localhost:8000/uploads/a.jpg?v=1");
    assert_eq!(normalize_media_url(&dev, &once).unwrap(), once);
}
