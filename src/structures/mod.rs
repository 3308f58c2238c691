//! Structure cores
//!
//! Each core owns its data exclusively and returns an [`Outcome`] (result plus
//! step sequence) from every mutation or query:
//! - [`bst`]: binary search tree over an id-keyed arena
//! - [`heap`]: array-backed binary heap (max by default, min on request)
//! - [`stack`], [`queue`], [`linked_list`]: linear structures of strings sharing
//!   the [`element`] store
//!
//! # Failure policy
//!
//! Read-only queries that miss report a `warn` step. Positional mutations that
//! cannot proceed return a typed [`crate::errors::VizError`] and change nothing.
//!
//! [`Outcome`]: crate::step::Outcome

pub mod bst;
pub mod element;
pub mod heap;
pub mod linked_list;
pub mod queue;
pub mod stack;

pub use bst::BinarySearchTree;
pub use heap::{Heap, HeapOrder};
pub use linked_list::LinkedList;
pub use queue::Queue;
pub use stack::Stack;
