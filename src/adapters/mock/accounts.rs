//! In-memory account store for testing.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::AccountError;
use crate::models::Instance;
use crate::traits::{validate_account, AccountStore};

/// Account store that never touches the file system.
///
/// # Example
///
/// ```ignore
/// let accounts = InMemoryAccounts::new()
///     .with_account("work", Instance::new("https://a.example", "alice", "tok"));
/// assert!(accounts.resolve("work").is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccounts {
    accounts: Arc<Mutex<BTreeMap<String, Instance>>>,
}

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, key: &str, instance: Instance) -> Self {
        self.lock().insert(key.to_string(), instance);
        self
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Instance>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AccountStore for InMemoryAccounts {
    fn resolve(&self, key: &str) -> Result<Instance, AccountError> {
        self.lock()
            .get(key)
            .cloned()
            .ok_or_else(|| AccountError::NotFound {
                key: key.to_string(),
            })
    }

    fn list(&self) -> Result<Vec<(String, Instance)>, AccountError> {
        Ok(self
            .lock()
            .iter()
            .map(|(key, instance)| (key.clone(), instance.clone()))
            .collect())
    }

    fn add(&self, key: &str, instance: Instance) -> Result<(), AccountError> {
        validate_account(key, &instance)?;
        let mut accounts = self.lock();
        if accounts.contains_key(key) {
            return Err(AccountError::AlreadyExists {
                key: key.to_string(),
            });
        }
        accounts.insert(key.to_string(), instance);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AccountError> {
        self.lock()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| AccountError::NotFound {
                key: key.to_string(),
            })
    }
}
