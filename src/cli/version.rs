//! Version command.

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `feedterm <version>`
pub fn version_line() -> String {
    format!("feedterm {}", VERSION)
}
