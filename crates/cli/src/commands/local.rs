// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Commands that never talk to the server.

use std::io::{self, Write};

use sisam_core::{normalize_media_url, ApiOrigin, Theme};

use crate::error::Result;
use crate::store::TokenStore;

use super::open_context;

pub fn media_url(raw: &str) -> Result<()> {
    let ctx = open_context()?;
    media_url_impl(&ctx.origin()?, &mut io::stdout(), raw)
}

pub fn theme(value: Option<&str>) -> Result<()> {
    let ctx = open_context()?;
    theme_impl(&ctx.tokens, &mut io::stdout(), value)
}

/// Print the canonical form of `raw`; nothing when it is blank.
pub(crate) fn media_url_impl(origin: &ApiOrigin, out: &mut dyn Write, raw: &str) -> Result<()> {
    if let Some(url) = normalize_media_url(origin, raw) {
        writeln!(out, "{}", url)?;
    }
    Ok(())
}

/// Show the theme, set it, or flip it with `toggle`.
pub(crate) fn theme_impl(
    tokens: &TokenStore,
    out: &mut dyn Write,
    value: Option<&str>,
) -> Result<()> {
    let theme = match value.map(str::trim) {
        None => {
            writeln!(out, "{}", tokens.theme().as_str())?;
            return Ok(());
        }
        Some(v) if v.eq_ignore_ascii_case("toggle") => tokens.theme().toggled(),
        Some(v) => v.parse::<Theme>()?,
    };
    tokens.set_theme(theme);
    writeln!(out, "Theme set to {}", theme.as_str())?;
    Ok(())
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
