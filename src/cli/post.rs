//! `post` and `meta` subcommands.

use color_eyre::{eyre::eyre, Result};
use std::io::Write;

use crate::traits::{ApiClient, Visibility};

pub async fn handle_post_command<W: Write>(
    api: &dyn ApiClient,
    visibility: Visibility,
    text: &str,
    out: &mut W,
) -> Result<()> {
    let id = api
        .create_post(visibility, text)
        .await
        .map_err(|err| eyre!("{} ({})", err.user_message(), err))?;
    writeln!(out, "Posted {} ({})", id, visibility)?;
    Ok(())
}

pub async fn handle_meta_command<W: Write>(api: &dyn ApiClient, out: &mut W) -> Result<()> {
    let meta = api
        .meta()
        .await
        .map_err(|err| eyre!("{} ({})", err.user_message(), err))?;
    let fields = [
        ("name", meta.name),
        ("version", meta.version),
        ("maintainer", meta.maintainer_name),
        ("description", meta.description),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            writeln!(out, "{:<12}{}", label, value)?;
        }
    }
    Ok(())
}
