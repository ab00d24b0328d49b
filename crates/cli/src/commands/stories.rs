// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::path::{Path, PathBuf};

use sisam_core::StoryId;

use crate::api::{HttpTransport, MediaFile};
use crate::cli::OutputFormat;
use crate::display::format_story;
use crate::error::Result;
use crate::poller::PollMode;
use crate::resources::Collection;
use crate::session::SessionController;

use super::{with_session, write_list};

pub fn list(output: OutputFormat) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(list_impl(session, out, output))
    })
}

pub fn create(file: PathBuf, caption: String) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(async move { create_impl(session, out, &file, &caption).await })
    })
}

pub fn edit(id: StoryId, caption: String) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(async move { edit_impl(session, out, id, &caption).await })
    })
}

pub fn delete(id: StoryId) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(delete_impl(session, out, id))
    })
}

pub(crate) async fn list_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    output: OutputFormat,
) -> Result<()> {
    session.refresh_one(Collection::Stories).await?;
    write_list(out, &session.stories(), output, "No stories right now.", format_story)
}

pub(crate) async fn create_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    file: &Path,
    caption: &str,
) -> Result<()> {
    let media = MediaFile::read(file)?;
    let name = media.file_name.clone();
    session.create_story(caption, Some(media)).await?;
    writeln!(out, "Story published from {}", name)?;
    Ok(())
}

pub(crate) async fn edit_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    id: StoryId,
    caption: &str,
) -> Result<()> {
    session.update_story(id, caption).await?;
    writeln!(out, "Updated story {}", id)?;
    Ok(())
}

pub(crate) async fn delete_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    id: StoryId,
) -> Result<()> {
    session.delete_story(id).await?;
    writeln!(out, "Deleted story {}", id)?;
    Ok(())
}

#[cfg(test)]
#[path = "stories_tests.rs"]
mod tests;
