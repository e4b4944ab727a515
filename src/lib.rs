//! feedterm - a terminal client for streaming social feeds
//!
//! The library holds everything; `main.rs` only parses arguments, loads
//! configuration and hands over to [`cli::run_cli_command`].
//!
//! Data flows from the transport through [`websocket::StreamingSession`],
//! over the bounded [`bus`] and into the [`app`] UI loop.

pub mod adapters;
pub mod app;
pub mod bus;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod logger;
pub mod models;
pub mod terminal;
pub mod traits;
pub mod ui;
pub mod websocket;
