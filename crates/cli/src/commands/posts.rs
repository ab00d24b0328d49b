// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::path::{Path, PathBuf};

use sisam_core::PostId;

use crate::api::{HttpTransport, MediaFile};
use crate::cli::OutputFormat;
use crate::display::{format_comment, format_post};
use crate::error::Result;
use crate::poller::PollMode;
use crate::resources::Collection;
use crate::session::SessionController;

use super::{apply_limit, with_session, write_list};

pub fn feed(limit: Option<usize>, output: OutputFormat) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(feed_impl(session, out, limit, output))
    })
}

pub fn like(id: PostId) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(like_impl(session, out, id))
    })
}

pub fn comments(id: PostId, output: OutputFormat) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(comments_impl(session, out, id, output))
    })
}

pub fn comment(id: PostId, text: String) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(async move { comment_impl(session, out, id, &text).await })
    })
}

pub fn post(file: PathBuf, caption: String) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(async move { post_impl(session, out, &file, &caption).await })
    })
}

pub fn edit(id: PostId, caption: String) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(async move { edit_impl(session, out, id, &caption).await })
    })
}

pub fn delete(id: PostId) -> Result<()> {
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(delete_impl(session, out, id))
    })
}

pub(crate) async fn feed_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    limit: Option<usize>,
    output: OutputFormat,
) -> Result<()> {
    session.refresh_one(Collection::Feed).await?;
    let posts = apply_limit(session.feed(), limit);
    write_list(out, &posts, output, "No posts yet.", format_post)
}

pub(crate) async fn like_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    id: PostId,
) -> Result<()> {
    let state = session.like(id).await?;
    let verb = if state.has_liked { "Liked" } else { "Unliked" };
    writeln!(
        out,
        "{} post {} ({} {})",
        verb,
        id,
        state.like_count,
        if state.like_count == 1 { "like" } else { "likes" }
    )?;
    Ok(())
}

pub(crate) async fn comments_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    id: PostId,
    output: OutputFormat,
) -> Result<()> {
    let comments = session.comments(id).await?;
    write_list(out, &comments, output, "No comments yet.", |c| {
        vec![format_comment(c)]
    })
}

pub(crate) async fn comment_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    id: PostId,
    text: &str,
) -> Result<()> {
    session.add_comment(id, text).await?;
    writeln!(out, "Commented on post {}", id)?;
    Ok(())
}

pub(crate) async fn post_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    file: &Path,
    caption: &str,
) -> Result<()> {
    let media = MediaFile::read(file)?;
    let name = media.file_name.clone();
    session.create_post(caption, Some(media)).await?;
    writeln!(out, "Posted {}", name)?;
    Ok(())
}

pub(crate) async fn edit_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    id: PostId,
    caption: &str,
) -> Result<()> {
    session.update_post(id, caption).await?;
    writeln!(out, "Updated post {}", id)?;
    Ok(())
}

pub(crate) async fn delete_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    id: PostId,
) -> Result<()> {
    session.delete_post(id).await?;
    writeln!(out, "Deleted post {}", id)?;
    Ok(())
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
