//! Account store trait abstraction.

use crate::error::AccountError;
use crate::models::Instance;

/// Named accounts the user can stream from.
///
/// Implementations are synchronous: account files are small and only
/// touched at startup or from the `accounts` subcommand.
pub trait AccountStore: Send + Sync {
    /// Look up an account by key.
    ///
    /// # Errors
    /// [`AccountError::NotFound`] if no account has that key.
    fn resolve(&self, key: &str) -> Result<Instance, AccountError>;

    /// All accounts, sorted by key.
    fn list(&self) -> Result<Vec<(String, Instance)>, AccountError>;

    /// Store a new account. Fails with [`AccountError::AlreadyExists`]
    /// rather than overwriting.
    fn add(&self, key: &str, instance: Instance) -> Result<(), AccountError>;

    fn remove(&self, key: &str) -> Result<(), AccountError>;
}

/// Reject accounts that could never connect.
pub fn validate_account(key: &str, instance: &Instance) -> Result<(), AccountError> {
    let required = [
        ("key", key),
        ("baseurl", instance.base_url.as_str()),
        ("username", instance.username.as_str()),
        ("token", instance.access_token.as_str()),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AccountError::Invalid {
                field,
                reason: "must not be empty".to_string(),
            });
        }
    }
    Ok(())
}
