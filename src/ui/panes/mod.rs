//! TUI pane rendering modules
//!
//! Each pane module exports a stateless `render_*` function.
//!
//! # Pane Modules
//!
//! - [`structure`]: the structure being replayed, with step marks as colours
//! - [`steps`]: log of the steps played so far
//! - [`history`]: past operations, with the selected one highlighted
//! - [`command`]: command input line
//! - [`status`]: status bar with keybindings and playback state

pub mod command;
pub mod history;
pub mod status;
pub mod steps;
pub mod structure;

pub use command::render_command_pane;
pub use history::render_history_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use steps::render_steps_pane;
pub use structure::render_structure_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered block, yellow and bold when focused
pub(crate) fn pane_block(title: &str, is_focused: bool) -> Block<'static> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(border_style)
}
