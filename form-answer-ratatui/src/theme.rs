use ratatui::style::Color;

/// Color theme for the answer screens.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub text: Color,
    pub highlight: Color,
    pub error: Color,
    pub success: Color,
    pub border: Color,
    pub selected_bg: Color,
    /// Locked controls in read-only replays.
    pub disabled: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Cyan,
            text: Color::White,
            highlight: Color::Yellow,
            error: Color::Red,
            success: Color::Green,
            border: Color::Gray,
            selected_bg: Color::DarkGray,
            disabled: Color::DarkGray,
        }
    }
}
