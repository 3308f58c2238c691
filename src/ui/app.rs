//! Main TUI application state and logic

use crate::controller::Session;
use crate::errors::VizError;
use crate::step::player::{Renderer, StepPlayer};
use crate::ui::panes::{self, StatusRenderData};
use crate::ui::renderer::StepView;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Structure,
    Steps,
    History,
}

impl FocusedPane {
    /// Move focus to the next pane (structure -> steps -> history)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Structure => FocusedPane::Steps,
            FocusedPane::Steps => FocusedPane::History,
            FocusedPane::History => FocusedPane::Structure,
        }
    }
}

/// The main application state
pub struct App {
    /// Every structure and the operation history
    pub session: Session,

    /// Paces steps of the sequence being shown
    pub player: StepPlayer,

    /// What the panes draw
    pub view: StepView,

    /// Command being typed
    pub input: String,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub structure_scroll: usize,
    pub steps_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether the status message reports a failure
    pub status_is_error: bool,
}

impl App {
    pub fn new(session: Session, player: StepPlayer) -> Self {
        let mut app = App {
            session,
            player,
            view: StepView::new(),
            input: String::new(),
            focused_pane: FocusedPane::Structure,
            structure_scroll: 0,
            steps_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready! Type a command, e.g. 'bst insert 5'"),
            status_is_error: false,
        };
        // Commands run from a script before start-up are shown in their final state
        if let Some(entry) = app.session.history().selected() {
            app.view.show(entry);
        }
        app
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.tick(Instant::now());

            // Use poll with timeout so playback keeps moving without input
            if event::poll(Duration::from_millis(20))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Feed the view with the next due step and close finished playback
    pub fn tick(&mut self, now: Instant) {
        let was_active = self.player.is_active();
        if let Some(step) = self.player.poll(now) {
            self.view.render(&step);
            self.steps_scroll = usize::MAX;
        }
        if was_active && !self.player.is_active() {
            let report = self.player.last_report().cloned();
            if let Some(report) = report {
                self.view.finished(&report.label, !report.cancelled);
            }
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_is_error = false;
    }

    fn set_error(&mut self, error: &VizError) {
        self.status_message = error.to_string();
        self.status_is_error = true;
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(main_chunks[0]);

        // Left column: Structure (top) | Command (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(columns[0]);

        // Right column: Steps (top) | History (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(columns[1]);

        panes::render_structure_pane(
            frame,
            left_rows[0],
            &self.view,
            self.focused_pane == FocusedPane::Structure,
            &mut self.structure_scroll,
        );

        panes::render_command_pane(frame, left_rows[1], &self.input, self.player.is_active());

        let total = self
            .player
            .progress()
            .map(|(_, _, total)| total)
            .or_else(|| self.session.history().selected().map(|e| e.steps.len()));
        panes::render_steps_pane(
            frame,
            right_rows[0],
            self.view.log(),
            total,
            self.focused_pane == FocusedPane::Steps,
            &mut self.steps_scroll,
        );

        panes::render_history_pane(
            frame,
            right_rows[1],
            self.session.history(),
            self.focused_pane == FocusedPane::History,
        );

        let history = self.session.history();
        let status = StatusRenderData {
            message: &self.status_message,
            is_error: self.status_is_error,
            position: history.cursor().map(|c| (c, history.len())),
            playback: self
                .player
                .progress()
                .map(|(_, emitted, total)| (emitted, total)),
        };
        panes::render_status_bar(frame, main_chunks[1], &status);
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
        {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => {
                if self.player.is_active() {
                    let dropped = self.player.cancel();
                    self.view.finished("", false);
                    self.set_status(format!("Stopped, skipped {} step(s)", dropped));
                } else {
                    self.input.clear();
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => self.browse(false),
            KeyCode::Right => self.browse(true),
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Structure => {
                    self.structure_scroll = self.structure_scroll.saturating_sub(1);
                }
                FocusedPane::Steps => {
                    self.steps_scroll = self.steps_scroll.saturating_sub(1);
                }
                FocusedPane::History => self.browse(false),
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Structure => {
                    self.structure_scroll = self.structure_scroll.saturating_add(1);
                }
                FocusedPane::Steps => {
                    self.steps_scroll = self.steps_scroll.saturating_add(1);
                }
                FocusedPane::History => self.browse(true),
            },
            KeyCode::Char(' ') if self.input.is_empty() => self.replay_selected(),
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    /// Run the typed command and start playing its steps
    fn submit(&mut self) {
        let line = self.input.trim().to_string();
        if line.is_empty() {
            return;
        }
        if let Err(e) = self.player.ensure_idle() {
            self.set_error(&e);
            return;
        }

        match self.session.execute_line(&line) {
            Ok(Some(report)) => {
                self.input.clear();
                if let Some(entry) = self.session.history().latest() {
                    self.view.load(entry);
                }
                self.structure_scroll = 0;
                self.steps_scroll = 0;
                match self.player.start(report.steps, Instant::now()) {
                    Ok(()) => self.set_status(report.message),
                    Err(e) => self.set_error(&e),
                }
                // Empty sequences finish at once
                if !self.player.is_active() {
                    self.view.finished("", true);
                }
            }
            Ok(None) => self.input.clear(),
            Err(e) => self.set_error(&e),
        }
    }

    /// Move through the history, showing each operation's result
    fn browse(&mut self, forward: bool) {
        if let Err(e) = self.player.ensure_idle() {
            self.set_error(&e);
            return;
        }
        let history = self.session.history_mut();
        let moved = if forward {
            history.select_next()
        } else {
            history.select_previous()
        };
        if let Some(entry) = self.session.history().selected() {
            self.view.show(entry);
            let label = entry.label.clone();
            self.steps_scroll = usize::MAX;
            if moved {
                self.set_status(label);
            }
        }
    }

    /// Play the selected operation again from its starting state
    fn replay_selected(&mut self) {
        if let Err(e) = self.player.ensure_idle() {
            self.set_error(&e);
            return;
        }
        let Some(entry) = self.session.history().selected() else {
            self.set_status("Nothing to replay");
            return;
        };
        self.view.load(entry);
        let steps = entry.steps.clone();
        let label = entry.label.clone();
        self.steps_scroll = 0;
        match self.player.start(steps, Instant::now()) {
            Ok(()) => self.set_status(format!("Replaying: {}", label)),
            Err(e) => self.set_error(&e),
        }
        if !self.player.is_active() {
            self.view.finished("", true);
        }
    }
}
