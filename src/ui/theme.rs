use crate::ui::renderer::Mark;
use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub number: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub visited: Color,     // Teal for traversal
    pub highlight: Color,   // Yellow for focus/flash
    pub compare: Color,     // Pink for compare/swap
    pub accepted: Color,    // Green for MST edges
    pub rejected: Color,    // Dim red for discarded edges
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    number: Color::Rgb(250, 179, 135),         // Orange for numbers
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for current line
    visited: Color::Rgb(148, 226, 213),
    highlight: Color::Rgb(249, 226, 175),
    compare: Color::Rgb(245, 194, 231),
    accepted: Color::Rgb(166, 227, 161),
    rejected: Color::Rgb(150, 90, 110),
};

impl Theme {
    /// Foreground used for a marked subject
    pub fn mark_color(&self, mark: Option<Mark>) -> Color {
        match mark {
            None => self.fg,
            Some(Mark::Visited) | Some(Mark::Discovered) => self.visited,
            Some(Mark::Highlighted) => self.highlight,
            Some(Mark::Compared) => self.compare,
            Some(Mark::Found) | Some(Mark::Accepted) => self.accepted,
            Some(Mark::Rejected) => self.rejected,
        }
    }
}
