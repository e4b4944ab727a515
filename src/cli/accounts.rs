//! `accounts` subcommands and account selection.

use color_eyre::Result;
use std::io::Write;

use crate::error::AccountError;
use crate::models::Instance;
use crate::traits::AccountStore;

/// Pick the account to use.
///
/// With an explicit key the store must have it. Without one, the only
/// configured account is used.
pub fn select_account(
    store: &dyn AccountStore,
    key: Option<&str>,
) -> Result<(String, Instance), AccountError> {
    if let Some(key) = key {
        return store.resolve(key).map(|instance| (key.to_string(), instance));
    }
    let mut accounts = store.list()?;
    match accounts.len() {
        1 => Ok(accounts.remove(0)),
        0 => Err(AccountError::Invalid {
            field: "key",
            reason: "no accounts configured, add one with `feedterm accounts add`".to_string(),
        }),
        _ => Err(AccountError::Invalid {
            field: "key",
            reason: "several accounts configured, choose one with --key".to_string(),
        }),
    }
}

pub fn handle_accounts_list<W: Write>(store: &dyn AccountStore, out: &mut W) -> Result<()> {
    let accounts = store.list()?;
    if accounts.is_empty() {
        writeln!(out, "No accounts configured.")?;
        return Ok(());
    }
    for (key, instance) in accounts {
        writeln!(out, "{}\t@{}\t{}", key, instance.username, instance.base_url)?;
    }
    Ok(())
}

pub fn handle_accounts_add<W: Write>(
    store: &dyn AccountStore,
    key: &str,
    instance: Instance,
    out: &mut W,
) -> Result<()> {
    let label = format!("@{} on {}", instance.username, instance.base_url);
    store.add(key, instance)?;
    writeln!(out, "Added account '{}' ({})", key, label)?;
    Ok(())
}

pub fn handle_accounts_remove<W: Write>(
    store: &dyn AccountStore,
    key: &str,
    out: &mut W,
) -> Result<()> {
    store.remove(key)?;
    writeln!(out, "Removed account '{}'", key)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryAccounts;

    fn instance(user: &str) -> Instance {
        Instance::new("https://misskey.example", user, "tok")
    }

    #[test]
    fn test_select_single_account_without_key() {
        let store = InMemoryAccounts::new().with_account("only", instance("alice"));
        let (key, selected) = select_account(&store, None).unwrap();
        assert_eq!(key, "only");
        assert_eq!(selected.username, "alice");
    }

    #[test]
    fn test_select_needs_key_with_several_accounts() {
        let store = InMemoryAccounts::new()
            .with_account("a", instance("alice"))
            .with_account("b", instance("bob"));
        assert!(matches!(
            select_account(&store, None),
            Err(AccountError::Invalid { field: "key", .. })
        ));
        assert_eq!(select_account(&store, Some("b")).unwrap().1.username, "bob");
    }

    #[test]
    fn test_select_unknown_key() {
        let store = InMemoryAccounts::new();
        assert_eq!(
            select_account(&store, Some("nope")),
            Err(AccountError::NotFound {
                key: "nope".to_string()
            })
        );
        assert!(select_account(&store, None).is_err());
    }

    #[test]
    fn test_list_add_remove_output() {
        let store = InMemoryAccounts::new();
        let mut out = Vec::new();
        handle_accounts_list(&store, &mut out).unwrap();
        handle_accounts_add(&store, "w", instance("alice"), &mut out).unwrap();
        handle_accounts_list(&store, &mut out).unwrap();
        handle_accounts_remove(&store, "w", &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "No accounts configured.\n\
             Added account 'w' (@alice on https://misskey.example)\n\
             w\t@alice\thttps://misskey.example\n\
             Removed account 'w'\n"
        );
    }

    #[test]
    fn test_remove_missing_account_fails() {
        let store = InMemoryAccounts::new();
        let mut out = Vec::new();
        assert!(handle_accounts_remove(&store, "w", &mut out).is_err());
        assert!(out.is_empty());
    }
}
