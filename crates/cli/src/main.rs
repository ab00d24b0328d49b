// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::io::IsTerminal;

use clap::Parser;
use sisamrs::Cli;

fn main() {
    setup_logging();
    let cli = Cli::parse();
    if let Err(e) = sisamrs::run(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr, `warn` and above unless `RUST_LOG` says otherwise.
fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}
