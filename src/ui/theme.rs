//! Color theme constants for the feed UI

use ratatui::style::Color;

/// Border color for panels
pub const COLOR_BORDER: Color = Color::DarkGray;

/// Accent color for names and the active feed
pub const COLOR_ACCENT: Color = Color::White;

/// Connected indicator
pub const COLOR_ACTIVE: Color = Color::LightGreen;

/// Disconnected indicator and errors
pub const COLOR_ERROR: Color = Color::Red;

/// Dim text for handles, timestamps and hints
pub const COLOR_DIM: Color = Color::DarkGray;

/// Renote attribution line
pub const COLOR_RENOTE: Color = Color::Rgb(4, 181, 117);

/// Content warnings
pub const COLOR_WARNING: Color = Color::Yellow;
