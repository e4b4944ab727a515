//! Command-line entry points.
//!
//! [`parse_args`] turns the process arguments into a [`CliCommand`] and
//! [`run_cli_command`] carries it out. Only `stream` takes over the
//! terminal; the other commands print to stdout and exit.

pub mod accounts;
pub mod args;
pub mod post;
pub mod stream;
pub mod version;

pub use accounts::{
    handle_accounts_add, handle_accounts_list, handle_accounts_remove, select_account,
};
pub use args::{parse_args, CliCommand, USAGE};
pub use post::{handle_meta_command, handle_post_command};
pub use stream::run_stream;
pub use version::{version_line, VERSION};

use color_eyre::{eyre::eyre, Result};
use std::io::{self, Write};

use crate::adapters::ReqwestApiClient;
use crate::config::AppConfig;
use crate::error::AccountError;
use crate::models::Instance;
use crate::traits::{AccountStore, Visibility};

/// Run a parsed command.
pub async fn run_cli_command(
    command: CliCommand,
    config: &AppConfig,
    accounts: &dyn AccountStore,
) -> Result<()> {
    let mut out = io::stdout();
    match command {
        CliCommand::Version => writeln!(out, "{}", version_line())?,
        CliCommand::Help => write!(out, "{}", USAGE)?,
        CliCommand::Invalid(message) => return Err(eyre!("{}\n\n{}", message, USAGE)),
        CliCommand::AccountsList => handle_accounts_list(accounts, &mut out)?,
        CliCommand::AccountsAdd {
            key,
            base_url,
            username,
            token,
        } => handle_accounts_add(
            accounts,
            &key,
            Instance::new(base_url, username, token),
            &mut out,
        )?,
        CliCommand::AccountsRemove { key } => handle_accounts_remove(accounts, &key, &mut out)?,
        CliCommand::Meta { key } => {
            let instance = account(accounts, key.as_deref())?;
            let api = ReqwestApiClient::new(&instance, &config.http)?;
            handle_meta_command(&api, &mut out).await?;
        }
        CliCommand::Post {
            key,
            visibility,
            text,
        } => {
            let instance = account(accounts, key.as_deref())?;
            let api = ReqwestApiClient::new(&instance, &config.http)?;
            handle_post_command(&api, visibility, &text, &mut out).await?;
        }
        CliCommand::Stream { key } => {
            let instance = account(accounts, key.as_deref())?;
            run_stream(config, instance, Visibility::default()).await?;
        }
    }
    Ok(())
}

fn account(accounts: &dyn AccountStore, key: Option<&str>) -> Result<Instance> {
    select_account(accounts, key)
        .map(|(_, instance)| instance)
        .map_err(|err: AccountError| eyre!("{}", err.user_message()))
}
