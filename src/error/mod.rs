//! Error types for feedterm.
//!
//! Each layer has its own error enum; all of them expose `category()` so
//! callers can decide how to react without matching on concrete variants.
//!
//! | Error | Raised by | Effect |
//! |-------|-----------|--------|
//! | `ResolveError` | session construction | session never starts |
//! | `TransportError` | transport adapters | `ConnectError` / `Disconnected` event |
//! | `DecodeError` | frame codec | frame logged and dropped |
//! | `SessionError` | session lifecycle calls | returned to the caller |
//! | `LogIoError` | rotating logger | reported via tracing, swallowed |
//! | `ConfigError`, `AccountError` | startup | printed, process exits |
//! | `ApiError` | REST client | shown on the status line |

mod category;
mod network;
mod stream;
mod system;

pub use category::ErrorCategory;
pub use network::{classify_reqwest_error, ApiError};
pub use stream::{DecodeError, ResolveError, SessionError, TransportError};
pub use system::{AccountError, ConfigError, LogIoError};
