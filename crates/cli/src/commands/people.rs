// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use sisam_core::{FollowState, ProfileUpdate};

use crate::api::HttpTransport;
use crate::cli::OutputFormat;
use crate::display::{format_post, format_profile, format_user};
use crate::error::{Error, Result};
use crate::poller::PollMode;
use crate::session::SessionController;

use super::{with_session, write_json};

pub fn profile(username: Option<String>, output: OutputFormat) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(async move { profile_impl(session, out, username.as_deref(), output).await })
    })
}

pub fn edit_profile(full_name: Option<String>) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(async move { edit_profile_impl(session, out, full_name).await })
    })
}

pub fn follow(username: String) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(async move { follow_impl(session, out, &username, true).await })
    })
}

pub fn unfollow(username: String) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(async move { follow_impl(session, out, &username, false).await })
    })
}

pub fn search(query: String, output: OutputFormat) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(async move { search_impl(session, out, &query, output).await })
    })
}

/// Show `username`'s profile, or the logged-in user's when none is given.
pub(crate) async fn profile_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    username: Option<&str>,
    output: OutputFormat,
) -> Result<()> {
    let username = match username {
        Some(name) => name.to_string(),
        None => session.username().ok_or(Error::NotAuthenticated)?,
    };
    let profile = session.profile(&username).await?;
    if output == OutputFormat::Json {
        return write_json(out, &profile);
    }
    for line in format_profile(&profile) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

pub(crate) async fn edit_profile_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    full_name: Option<String>,
) -> Result<()> {
    let full_name = full_name.ok_or(Error::FieldRequired {
        field: "--full-name",
    })?;
    let update = ProfileUpdate {
        full_name: Some(full_name.trim().to_string()),
    };
    session.update_profile(&update).await?;
    writeln!(out, "Profile updated.")?;
    Ok(())
}

pub(crate) async fn follow_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    username: &str,
    follow: bool,
) -> Result<()> {
    let state: FollowState = if follow {
        session.follow(username).await?
    } else {
        session.unfollow(username).await?
    };
    let verb = if state.following {
        "Following"
    } else {
        "Not following"
    };
    writeln!(
        out,
        "{} @{} ({} {})",
        verb,
        username.trim(),
        state.followers_count,
        if state.followers_count == 1 {
            "follower"
        } else {
            "followers"
        }
    )?;
    Ok(())
}

pub(crate) async fn search_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    query: &str,
    output: OutputFormat,
) -> Result<()> {
    let results = session.search(query).await?;
    if output == OutputFormat::Json {
        return write_json(out, &results);
    }
    if results.is_empty() {
        writeln!(out, "No results.")?;
        return Ok(());
    }
    if !results.users.is_empty() {
        writeln!(out, "Users:")?;
        for user in &results.users {
            writeln!(out, "  {}", format_user(user))?;
        }
    }
    if !results.posts.is_empty() {
        if !results.users.is_empty() {
            writeln!(out)?;
        }
        writeln!(out, "Posts:")?;
        for post in &results.posts {
            for line in format_post(post) {
                writeln!(out, "  {}", line)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "people_tests.rs"]
mod tests;
