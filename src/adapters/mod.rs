//! Concrete implementations of the traits in `crate::traits`.
//!
//! # Adapters
//!
//! - [`TungsteniteConnector`] - stream transport using tokio-tungstenite
//! - [`ReqwestApiClient`] - REST client using reqwest
//! - [`TomlAccountStore`] - accounts in `accounts.toml`
//!
//! The [`mock`] submodule provides test doubles for each of them.

pub mod mock;
pub mod reqwest_api;
pub mod toml_accounts;
pub mod tungstenite_ws;

pub use mock::{InMemoryAccounts, MockApiClient, MockConnector};
pub use reqwest_api::ReqwestApiClient;
pub use toml_accounts::TomlAccountStore;
pub use tungstenite_ws::TungsteniteConnector;
