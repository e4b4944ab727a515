//! Streaming connection to the instance.
//!
//! - [`messages`] - channel protocol envelopes (pure encode/decode)
//! - [`endpoint`] - stream URL resolution
//! - [`session`] - the session state machine and receive loop

pub mod endpoint;
pub mod messages;
pub mod session;

pub use endpoint::resolve_stream_url;
pub use messages::{decode_inbound, encode_pong, encode_subscribe, encode_unsubscribe, ChannelPost};
pub use session::{SessionState, StreamingSession};
