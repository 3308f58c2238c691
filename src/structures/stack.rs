//! LIFO stack of string values
//!
//! `push` appends, `pop` removes the tail and `peek` reads the tail. Popping or
//! peeking an empty stack is a reported no-op: the sequence holds a single
//! `warn("empty")` step and the value is `None`.

use super::element::ElementList;
use crate::step::{NodeId, Outcome, Step, StepRecorder};

#[derive(Debug, Clone, Default)]
pub struct Stack {
    elements: ElementList,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: impl Into<String>) -> Outcome<NodeId> {
        let mut rec = StepRecorder::new();
        let id = self.elements.push_back(value.into(), &mut rec);
        Outcome::new(id, rec.finish("stack push"))
    }

    pub fn pop(&mut self) -> Outcome<Option<String>> {
        let mut rec = StepRecorder::new();
        let popped = self.elements.pop_back(&mut rec).map(|e| e.value);
        if popped.is_none() {
            rec.record(Step::warn("empty"));
        }
        Outcome::new(popped, rec.finish("stack pop"))
    }

    pub fn peek(&self) -> Outcome<Option<String>> {
        let mut rec = StepRecorder::new();
        let top = match self.elements.last() {
            Some(top) => {
                self.elements.flash(self.elements.len() - 1, &mut rec);
                Some(top.value.clone())
            }
            None => {
                rec.record(Step::warn("empty"));
                None
            }
        };
        Outcome::new(top, rec.finish("stack peek"))
    }

    /// Position from the bottom of the first matching value
    pub fn search(&self, value: &str) -> Outcome<Option<usize>> {
        let mut rec = StepRecorder::new();
        let found = self.elements.search(value, &mut rec);
        Outcome::new(found, rec.finish("stack search"))
    }

    pub fn clear(&mut self) -> Outcome<()> {
        let mut rec = StepRecorder::new();
        self.elements.clear(&mut rec);
        Outcome::new((), rec.finish("stack clear"))
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn is_empty_report(&self) -> Outcome<bool> {
        let mut rec = StepRecorder::new();
        let empty = self.elements.report_empty(&mut rec);
        Outcome::new(empty, rec.finish("stack is-empty"))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Bottom to top
    pub fn elements(&self) -> &ElementList {
        &self.elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepKind;

    #[test]
    fn test_lifo_order() {
        let mut stack = Stack::new();
        stack.push("a");
        stack.push("b");
        assert_eq!(stack.peek().value.as_deref(), Some("b"));
        assert_eq!(stack.pop().value.as_deref(), Some("b"));
        assert_eq!(stack.pop().value.as_deref(), Some("a"));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_empty_warns() {
        let mut stack = Stack::new();
        let out = stack.pop();
        assert_eq!(out.value, None);
        assert_eq!(out.steps.kinds(), vec![StepKind::Warn]);
        assert_eq!(out.steps.steps()[0].warning_text(), Some("empty"));
    }

    #[test]
    fn test_push_links_to_previous_top() {
        let mut stack = Stack::new();
        stack.push("a");
        let out = stack.push("b");
        assert_eq!(out.steps.kinds(), vec![StepKind::Add, StepKind::Relink]);
    }
}
