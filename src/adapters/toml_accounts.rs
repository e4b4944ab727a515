//! TOML file account store.
//!
//! Layout of `accounts.toml`:
//!
//! ```toml
//! [instance.work]
//! baseurl = "https://misskey.example/api"
//! username = "alice"
//! token = "..."
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config;
use crate::error::AccountError;
use crate::models::Instance;
use crate::traits::{validate_account, AccountStore};

#[derive(Debug, Default, Serialize, Deserialize)]
struct AccountsFile {
    #[serde(default)]
    instance: BTreeMap<String, Instance>,
}

/// Account store backed by a TOML file.
///
/// The file is read on every call and rewritten whole on every change.
/// A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct TomlAccountStore {
    path: PathBuf,
}

impl TomlAccountStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/feedterm/accounts.toml`
    pub fn open_default() -> Result<Self, AccountError> {
        let dir = config::config_dir().map_err(|_| AccountError::NoConfigDirectory)?;
        Ok(Self::new(dir.join("accounts.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<AccountsFile, AccountError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AccountsFile::default()),
            Err(e) => {
                return Err(AccountError::Io {
                    path: self.path.clone(),
                    message: e.to_string(),
                })
            }
        };
        toml::from_str(&content).map_err(|e| AccountError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn write(&self, file: &AccountsFile) -> Result<(), AccountError> {
        let io_error = |e: std::io::Error| AccountError::Io {
            path: self.path.clone(),
            message: e.to_string(),
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = toml::to_string_pretty(file).map_err(|e| AccountError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&self.path, content).map_err(io_error)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(io_error)?;
        }
        Ok(())
    }
}

impl AccountStore for TomlAccountStore {
    fn resolve(&self, key: &str) -> Result<Instance, AccountError> {
        self.read()?
            .instance
            .remove(key)
            .ok_or_else(|| AccountError::NotFound {
                key: key.to_string(),
            })
    }

    fn list(&self) -> Result<Vec<(String, Instance)>, AccountError> {
        Ok(self.read()?.instance.into_iter().collect())
    }

    fn add(&self, key: &str, instance: Instance) -> Result<(), AccountError> {
        validate_account(key, &instance)?;
        let mut file = self.read()?;
        if file.instance.contains_key(key) {
            return Err(AccountError::AlreadyExists {
                key: key.to_string(),
            });
        }
        file.instance.insert(key.to_string(), instance);
        self.write(&file)
    }

    fn remove(&self, key: &str) -> Result<(), AccountError> {
        let mut file = self.read()?;
        if file.instance.remove(key).is_none() {
            return Err(AccountError::NotFound {
                key: key.to_string(),
            });
        }
        self.write(&file)
    }
}
