//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into four layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, command input
//! - **[`renderer`]**: step renderers; [`StepView`] applies played steps to what is drawn
//! - **[`panes`]**: stateless render functions for each visible pane
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a [`Session`] and a
//! [`StepPlayer`], then call [`App::run`] to start the event loop.
//!
//! [`Session`]: crate::controller::Session
//! [`StepPlayer`]: crate::step::player::StepPlayer
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod renderer;
pub mod theme;

pub use app::App;
pub use renderer::{JsonLines, StepView};
