//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockConnector`] - scripted inbound frames, recorded outbound frames
//! - [`MockApiClient`] - recorded posts, configurable failures
//! - [`InMemoryAccounts`] - in-memory account storage

pub mod accounts;
pub mod api;
pub mod transport;

pub use accounts::InMemoryAccounts;
pub use api::{MockApiClient, RecordedPost};
pub use transport::MockConnector;
