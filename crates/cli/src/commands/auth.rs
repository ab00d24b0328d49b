// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::{self, BufRead, Write};

use serde::Serialize;
use sisam_core::{ApiOrigin, Credentials, SessionState, Theme};

use crate::api::HttpTransport;
use crate::cli::{CredentialArgs, OutputFormat};
use crate::error::{Error, Result};
use crate::poller::PollMode;
use crate::session::SessionController;

use super::{open_context, with_session, write_json};

pub fn login(args: CredentialArgs) -> Result<()> {
    let credentials = credentials(args)?;
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(async move { login_impl(session, out, &credentials).await })
    })
}

pub fn signup(args: CredentialArgs) -> Result<()> {
    let credentials = credentials(args)?;
    with_session(PollMode::OnDemand, move |session, out| {
        Box::pin(async move { signup_impl(session, out, &credentials).await })
    })
}

pub fn logout() -> Result<()> {
    with_session(PollMode::OnDemand, |session, out| {
        Box::pin(async move { logout_impl(session, out) })
    })
}

pub fn status(output: OutputFormat) -> Result<()> {
    let ctx = open_context()?;
    let origin = ctx.origin()?;
    let theme = ctx.tokens.theme();
    let session = ctx.session(PollMode::OnDemand)?;
    status_impl(&session, &mut io::stdout(), &origin, theme, output)
}

fn credentials(args: CredentialArgs) -> Result<Credentials> {
    let password = match args.password {
        Some(password) => password,
        None => read_password(&mut io::stdin().lock())?,
    };
    Ok(Credentials::new(args.username, password))
}

/// Read the password from the first line of `input`.
pub(crate) fn read_password(input: &mut dyn BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let password = line.trim_end_matches(['\n', '\r']);
    if password.is_empty() {
        return Err(Error::FieldRequired { field: "password" });
    }
    Ok(password.to_string())
}

pub(crate) async fn login_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    credentials: &Credentials,
) -> Result<()> {
    session.login(credentials).await?;
    let username = session
        .username()
        .unwrap_or_else(|| credentials.username.clone());
    writeln!(out, "Logged in as {}", username)?;
    Ok(())
}

pub(crate) async fn signup_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
    credentials: &Credentials,
) -> Result<()> {
    session.signup(credentials).await?;
    writeln!(
        out,
        "Created account {}. Run 'sisam login {}' to sign in.",
        credentials.username, credentials.username
    )?;
    Ok(())
}

pub(crate) fn logout_impl<T: HttpTransport + 'static>(
    session: &mut SessionController<T>,
    out: &mut dyn Write,
) -> Result<()> {
    if !session.state().is_authenticated() {
        writeln!(out, "Not logged in.")?;
        return Ok(());
    }
    session.logout()?;
    writeln!(out, "Logged out.")?;
    Ok(())
}

#[derive(Serialize)]
struct Status<'a> {
    state: SessionState,
    username: Option<String>,
    api_origin: &'a str,
    theme: Theme,
}

pub(crate) fn status_impl<T: HttpTransport + 'static>(
    session: &SessionController<T>,
    out: &mut dyn Write,
    origin: &ApiOrigin,
    theme: Theme,
    output: OutputFormat,
) -> Result<()> {
    let status = Status {
        state: session.state(),
        username: session.username(),
        api_origin: origin.as_str(),
        theme,
    };
    match output {
        OutputFormat::Json => write_json(out, &status),
        OutputFormat::Text => {
            match &status.username {
                Some(name) if status.state.is_authenticated() => {
                    writeln!(out, "Logged in as {}", name)?
                }
                _ if status.state.is_authenticated() => writeln!(out, "Logged in")?,
                _ => writeln!(out, "Not logged in")?,
            }
            writeln!(out, "Server: {}", status.api_origin)?;
            writeln!(out, "Theme: {}", status.theme)?;
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
