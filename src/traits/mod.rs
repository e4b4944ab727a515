//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`TransportConnector`] / [`FrameSink`] / [`FrameStream`] - stream transport
//! - [`ApiClient`] - REST calls (posting, server info)
//! - [`AccountStore`] - named account lookup and management

pub mod accounts;
pub mod api;
pub mod transport;

pub use accounts::{validate_account, AccountStore};
pub use api::{ApiClient, InstanceMeta, Visibility};
pub use transport::{Frame, FrameSink, FrameStream, TransportConnector};
