//! Command input line

use super::pane_block;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render_command_pane(frame: &mut Frame, area: Rect, input: &str, is_playing: bool) {
    let prompt_style = if is_playing {
        Style::default().fg(DEFAULT_THEME.comment)
    } else {
        Style::default().fg(DEFAULT_THEME.primary)
    };
    let line = Line::from(vec![
        Span::styled("> ", prompt_style),
        Span::styled(input.to_string(), Style::default().fg(DEFAULT_THEME.fg)),
        Span::styled("▏", Style::default().fg(DEFAULT_THEME.highlight)),
    ]);
    frame.render_widget(Paragraph::new(line).block(pane_block(" Command ", true)), area);
}
