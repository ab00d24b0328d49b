// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub fn sisam() -> Command {
    cargo_bin_cmd!("sisam")
}

/// `sisam` with its state kept in `state` and no inherited overrides.
pub fn sisam_in(state: &TempDir) -> Command {
    let mut cmd = sisam();
    cmd.env("SISAM_STATE_DIR", state.path())
        .env_remove("SISAM_API_BASE")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// `sisam` pointed at the backend `origin`.
pub fn sisam_against(state: &TempDir, origin: &str) -> Command {
    let mut cmd = sisam_in(state);
    cmd.env("SISAM_API_BASE", origin);
    cmd
}

/// A state directory holding a token for `alice`.
pub fn logged_in_state() -> TempDir {
    let state = TempDir::new().unwrap();
    std::fs::write(state.path().join("token"), "tok-alice").unwrap();
    std::fs::write(state.path().join("username"), "alice").unwrap();
    state
}
