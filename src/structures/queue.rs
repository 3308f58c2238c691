//! FIFO queue of string values
//!
//! `enqueue` appends at the tail and `dequeue` removes the head. `peek` is the
//! visual query (warns on empty), while [`Queue::front`] is the programmatic
//! one: an empty queue is a [`VizError::NotFound`] so callers can tell it apart
//! from a legitimately empty string at the head.

use super::element::ElementList;
use crate::errors::{Result, VizError};
use crate::step::{NodeId, Outcome, Step, StepRecorder};

#[derive(Debug, Clone, Default)]
pub struct Queue {
    elements: ElementList,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, value: impl Into<String>) -> Outcome<NodeId> {
        let mut rec = StepRecorder::new();
        let id = self.elements.push_back(value.into(), &mut rec);
        Outcome::new(id, rec.finish("queue enqueue"))
    }

    pub fn dequeue(&mut self) -> Outcome<Option<String>> {
        let mut rec = StepRecorder::new();
        let head = self.elements.pop_front(&mut rec).map(|e| e.value);
        if head.is_none() {
            rec.record(Step::warn("empty"));
        }
        Outcome::new(head, rec.finish("queue dequeue"))
    }

    /// Highlight the head without removing it
    pub fn peek(&self) -> Outcome<Option<String>> {
        let mut rec = StepRecorder::new();
        let head = match self.elements.first() {
            Some(head) => {
                self.elements.flash(0, &mut rec);
                Some(head.value.clone())
            }
            None => {
                rec.record(Step::warn("empty"));
                None
            }
        };
        Outcome::new(head, rec.finish("queue peek"))
    }

    /// Head value, or `NotFound` when the queue is empty
    pub fn front(&self) -> Result<String> {
        self.elements
            .first()
            .map(|e| e.value.clone())
            .ok_or_else(|| VizError::not_found("queue is empty"))
    }

    pub fn search(&self, value: &str) -> Outcome<Option<usize>> {
        let mut rec = StepRecorder::new();
        let found = self.elements.search(value, &mut rec);
        Outcome::new(found, rec.finish("queue search"))
    }

    pub fn clear(&mut self) -> Outcome<()> {
        let mut rec = StepRecorder::new();
        self.elements.clear(&mut rec);
        Outcome::new((), rec.finish("queue clear"))
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn is_empty_report(&self) -> Outcome<bool> {
        let mut rec = StepRecorder::new();
        let empty = self.elements.report_empty(&mut rec);
        Outcome::new(empty, rec.finish("queue is-empty"))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Head to tail
    pub fn elements(&self) -> &ElementList {
        &self.elements
    }
}
