// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.
//!
//! These structs are used with `#[command(flatten)]` by commands that take
//! the same credentials, output or limit options.

use clap::Args;

use super::{non_empty_string, OutputFormat};

/// Username and password for `login` and `signup`.
#[derive(Args, Clone, Debug, Default)]
pub struct CredentialArgs {
    /// Account name
    #[arg(value_parser = non_empty_string)]
    pub username: String,

    /// Password (read from stdin when omitted)
    #[arg(long, short)]
    pub password: Option<String>,
}

/// Output format selection.
#[derive(Args, Clone, Debug, Default)]
pub struct OutputArgs {
    /// Output format (text, json)
    #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Limit arguments for long listings.
#[derive(Args, Clone, Debug, Default)]
pub struct LimitArgs {
    /// Maximum number of entries to show
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}
