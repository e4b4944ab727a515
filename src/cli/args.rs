//! Command-line argument parsing.
//!
//! Hand-rolled: the grammar is a handful of subcommands with one or two
//! flags each.

use crate::traits::Visibility;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Run the streaming TUI (default)
    Stream { key: Option<String> },
    /// Print server information
    Meta { key: Option<String> },
    /// Publish one post and exit
    Post {
        key: Option<String>,
        visibility: Visibility,
        text: String,
    },
    AccountsList,
    AccountsAdd {
        key: String,
        base_url: String,
        username: String,
        token: String,
    },
    AccountsRemove { key: String },
    Version,
    Help,
    /// Unusable input; the message says why
    Invalid(String),
}

/// Parse command-line arguments, including the program name.
///
/// # Examples
///
/// ```
/// use feedterm::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["feedterm".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();

    if args
        .iter()
        .any(|a| a == "--version" || a == "-V")
    {
        return CliCommand::Version;
    }
    if args.iter().any(|a| a == "--help" || a == "-h") {
        return CliCommand::Help;
    }

    match args.first().map(String::as_str) {
        None => CliCommand::Stream { key: None },
        Some("stream") => parse_stream(&args[1..]),
        Some("meta") => match parse_key_only(&args[1..]) {
            Ok(key) => CliCommand::Meta { key },
            Err(msg) => CliCommand::Invalid(msg),
        },
        Some("post") => parse_post(&args[1..]),
        Some("accounts") => parse_accounts(&args[1..]),
        Some(flag) if flag.starts_with('-') => parse_stream(&args),
        Some(other) => CliCommand::Invalid(format!("unknown command '{}'", other)),
    }
}

fn parse_stream(args: &[String]) -> CliCommand {
    match parse_key_only(args) {
        Ok(key) => CliCommand::Stream { key },
        Err(msg) => CliCommand::Invalid(msg),
    }
}

fn parse_key_only(args: &[String]) -> Result<Option<String>, String> {
    let mut key = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--key" | "-k" => key = Some(flag_value(arg, iter.next())?),
            other => return Err(format!("unexpected argument '{}'", other)),
        }
    }
    Ok(key)
}

fn parse_post(args: &[String]) -> CliCommand {
    let mut key = None;
    let mut visibility = Visibility::default();
    let mut words = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let parsed = match arg.as_str() {
            "--key" | "-k" => flag_value(arg, iter.next()).map(|v| key = Some(v)),
            "--visibility" | "-v" => flag_value(arg, iter.next()).and_then(|v| {
                visibility = v.parse()?;
                Ok(())
            }),
            "--" => {
                words.extend(iter.by_ref().cloned());
                Ok(())
            }
            other if other.starts_with('-') && other.len() > 1 => {
                Err(format!("unknown option '{}'", other))
            }
            word => {
                words.push(word.to_string());
                Ok(())
            }
        };
        if let Err(msg) = parsed {
            return CliCommand::Invalid(msg);
        }
    }

    let text = words.join(" ");
    if text.trim().is_empty() {
        return CliCommand::Invalid("post needs some text".to_string());
    }
    CliCommand::Post {
        key,
        visibility,
        text,
    }
}

fn parse_accounts(args: &[String]) -> CliCommand {
    let rest: Vec<&str> = args.iter().skip(1).map(String::as_str).collect();
    match (args.first().map(String::as_str), rest.as_slice()) {
        (Some("list") | None, []) => CliCommand::AccountsList,
        (Some("add"), [key, base_url, username, token]) => CliCommand::AccountsAdd {
            key: key.to_string(),
            base_url: base_url.to_string(),
            username: username.to_string(),
            token: token.to_string(),
        },
        (Some("add"), _) => {
            CliCommand::Invalid("usage: accounts add <key> <baseurl> <username> <token>".to_string())
        }
        (Some("remove"), [key]) => CliCommand::AccountsRemove {
            key: key.to_string(),
        },
        (Some("remove"), _) => CliCommand::Invalid("usage: accounts remove <key>".to_string()),
        (Some(other), _) => CliCommand::Invalid(format!("unknown accounts command '{}'", other)),
        (None, _) => CliCommand::AccountsList,
    }
}

fn flag_value(flag: &str, value: Option<&String>) -> Result<String, String> {
    match value {
        Some(v) if !v.starts_with('-') => Ok(v.clone()),
        _ => Err(format!("{} needs a value", flag)),
    }
}

/// Text printed for `--help`.
pub const USAGE: &str = "\
Usage: feedterm [command] [options]

Commands:
  stream [--key <account>]             stream the home timeline (default)
  meta [--key <account>]               show server information
  post [--key <account>] [--visibility public|home|followers|specified] <text...>
  accounts list                        list configured accounts
  accounts add <key> <baseurl> <username> <token>
  accounts remove <key>

Options:
  -k, --key <account>   account from accounts.toml (optional with one account)
  -h, --help            show this help
  -V, --version         show the version
";
