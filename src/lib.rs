//! # Introduction
//!
//! structviz runs operations on classic data structures and algorithms, records
//! every comparison, visit and mutation as a replayable step, and plays those
//! steps back at a fixed pace in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Command → Session → Core (+ StepRecorder) → StepSequence → StepPlayer → Renderer
//! ```
//!
//! 1. [`controller`]: parses command lines and dispatches them to the cores,
//!    keeping a [`snapshot::History`] of every successful operation.
//! 2. [`structures`]: BST, binary heap, stack, queue and linked list.
//! 3. [`graph`]: graph core, BFS/DFS, Kruskal/Prim and the text importers.
//! 4. [`sorting`]: five array sorts and the [`sorting::ArrayState`] replayer.
//! 5. [`step`]: the step model and the paced [`step::player::StepPlayer`].
//! 6. [`snapshot`]: before/after snapshots under a memory limit.
//! 7. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! Cores never sleep and never draw. Timing lives in the player only, so every
//! operation is testable without a terminal.

pub mod controller;
pub mod errors;
pub mod graph;
pub mod snapshot;
pub mod sorting;
pub mod step;
pub mod structures;
pub mod ui;
