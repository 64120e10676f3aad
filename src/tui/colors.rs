//! Color constants for the terminal user interface.

use ratatui::style::Color;

// Accent colours keyed to task type, plus the shared focus highlight.

/// Used for Features
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// Used for Bugs
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Used for Chores
pub const SLATE: Color = Color::Rgb(86, 60, 92);
/// Focused field / selected row highlight
pub const GOLD: Color = Color::Rgb(255, 215, 0);
