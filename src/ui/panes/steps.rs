//! Step log pane

use super::pane_block;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the steps played so far; the newest one is bold
pub fn render_steps_pane(
    frame: &mut Frame,
    area: Rect,
    log: &[String],
    total: Option<usize>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = match total {
        Some(total) => format!(" Steps {}/{} ", log.len(), total),
        None => " Steps ".to_string(),
    };
    let block = pane_block(&title, is_focused);

    if log.is_empty() {
        let paragraph = Paragraph::new("(no steps)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let max_scroll = log.len().saturating_sub(visible_height);
    *scroll_offset = (*scroll_offset).min(max_scroll);

    let last = log.len() - 1;
    let items: Vec<ListItem> = log
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(i, line)| {
            let style = if i == last {
                Style::default()
                    .fg(DEFAULT_THEME.highlight)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };
            ListItem::new(format!("{:>3} {}", i + 1, line)).style(style)
        })
        .collect();

    let list = List::new(items).block(block.padding(Padding::new(1, 0, 0, 0)));
    frame.render_widget(list, area);
}
