// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{self, Write};
use std::path::Path;

use sisam_core::ApiOrigin;

use crate::cli::ConfigCommand;
use crate::config::Config;
use crate::env;
use crate::error::{Error, Result};

use super::open_context;

/// Execute a config subcommand.
pub fn run(cmd: ConfigCommand) -> Result<()> {
    let ctx = open_context()?;
    let mut stdout = io::stdout();
    match cmd {
        ConfigCommand::Show => show_impl(&ctx.config, &mut stdout, env::api_base()),
        ConfigCommand::SetOrigin { origin } => {
            set_origin_impl(&ctx.state_dir, &mut stdout, &origin, env::api_base())
        }
    }
}

/// Print the config file contents, noting an environment override.
pub(crate) fn show_impl(
    config: &Config,
    out: &mut dyn Write,
    overridden: Option<String>,
) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
    write!(out, "{}", content)?;
    if let Some(raw) = overridden {
        let origin = config.resolve_origin(Some(raw))?;
        writeln!(out)?;
        writeln!(out, "# SISAM_API_BASE overrides api_origin: {}", origin.as_str())?;
    }
    Ok(())
}

/// Validate `origin` and store it as the configured backend.
pub(crate) fn set_origin_impl(
    state_dir: &Path,
    out: &mut dyn Write,
    origin: &str,
    overridden: Option<String>,
) -> Result<()> {
    let origin = ApiOrigin::parse(origin)?;
    let mut config = Config::load(state_dir)?;
    config.api_origin = origin.as_str().to_string();
    config.save(state_dir)?;

    writeln!(out, "API origin set to {}", origin.as_str())?;
    if overridden.is_some() {
        writeln!(out, "Note: SISAM_API_BASE is set and takes precedence.")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
