//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Used for the active filter and focused input border.
pub const ACCENT: Color = Color::Rgb(175, 135, 0);
/// Used for completed tasks.
pub const DIM: Color = Color::DarkGray;
