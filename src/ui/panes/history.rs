//! Operation history pane

use super::pane_block;
use crate::snapshot::History;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Render past operations, keeping the selected one in view
pub fn render_history_pane(frame: &mut Frame, area: Rect, history: &History, is_focused: bool) {
    let block = pane_block(" History ", is_focused);

    if history.is_empty() {
        let paragraph = Paragraph::new("(no operations)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let selected = history.cursor().unwrap_or(0);
    let first = (selected + 1).saturating_sub(visible_height);

    let items: Vec<ListItem> = history
        .iter()
        .enumerate()
        .skip(first)
        .take(visible_height)
        .map(|(i, entry)| {
            let text = format!("{:>3} {:<6} {}", i + 1, entry.kind().name(), entry.label);
            let style = if i == selected {
                Style::default()
                    .bg(DEFAULT_THEME.primary)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };
            ListItem::new(text).style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
