//! Colors for the terminal view

use ratatui::style::Color;

/// Theme colors for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub border: Color,
    pub border_focused: Color,
    pub text_primary: Color,
    pub text_muted: Color,
    pub blue: Color,
    pub green: Color,
    pub yellow: Color,
    pub red: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

impl Theme {
    /// Catppuccin Mocha theme (default)
    pub fn catppuccin_mocha() -> Self {
        Self {
            border: Color::Rgb(49, 50, 68),
            border_focused: Color::Rgb(137, 180, 250),
            text_primary: Color::Rgb(205, 214, 244),
            text_muted: Color::Rgb(108, 112, 134),
            blue: Color::Rgb(137, 180, 250),
            green: Color::Rgb(166, 227, 161),
            yellow: Color::Rgb(249, 226, 175),
            red: Color::Rgb(243, 139, 168),
        }
    }
}
