//! Theme and Colors
//!
//! The widget palette. The page underneath stays in the terminal's default
//! colors; everything the widget draws uses these.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Widget Chrome
// ============================================================================

/// Accent for the launcher, header and focused elements
pub const ACCENT: Color = Color::Rgb(37, 194, 160);

/// Panel background
pub const PANEL_BG: Color = Color::Rgb(24, 26, 32);

/// Panel border
pub const BORDER: Color = Color::Rgb(70, 76, 90);

/// Unread badge
pub const BADGE: Color = Color::Rgb(250, 56, 62);

// ============================================================================
// Transcript
// ============================================================================

/// Reader's questions
pub const USER_TEXT: Color = Color::Rgb(130, 200, 255);

/// Service answers
pub const ASSISTANT_TEXT: Color = Color::Rgb(225, 228, 235);

/// Inline code and code blocks
pub const CODE: Color = Color::Rgb(255, 203, 107);

/// Code block background
pub const CODE_BG: Color = Color::Rgb(40, 44, 52);

/// Citations, timestamps and hints
pub const DIM_GRAY: Color = Color::Rgb(120, 124, 135);

/// Error notices and banners
pub const ERROR_RED: Color = Color::Rgb(255, 95, 95);

/// Health "online" marker
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Input counter once past the warning threshold
pub const WARNING: Color = Color::Rgb(255, 184, 108);

// ============================================================================
// Styles
// ============================================================================

/// Base style for every cell of the panel
pub fn panel() -> Style {
    Style::default().fg(ASSISTANT_TEXT).bg(PANEL_BG)
}

/// Bold accent on the panel background
pub fn accent() -> Style {
    panel().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Dimmed text on the panel background
pub fn dim() -> Style {
    panel().fg(DIM_GRAY)
}
