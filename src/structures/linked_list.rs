//! Singly linked list of string values
//!
//! Positions are 0-based. `insert_at` accepts `0..=len` (`len` appends) and
//! `remove_at` accepts `0..len`; anything else fails with
//! [`VizError::OutOfRange`] and leaves the list as it was.

use super::element::ElementList;
use crate::errors::{Result, VizError};
use crate::step::{NodeId, Outcome, StepRecorder};

#[derive(Debug, Clone, Default)]
pub struct LinkedList {
    elements: ElementList,
}

impl LinkedList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the tail
    pub fn add_node(&mut self, value: impl Into<String>) -> Outcome<NodeId> {
        let mut rec = StepRecorder::new();
        let id = self.elements.push_back(value.into(), &mut rec);
        Outcome::new(id, rec.finish("list add"))
    }

    pub fn insert_at(&mut self, value: impl Into<String>, index: usize) -> Result<Outcome<NodeId>> {
        let mut rec = StepRecorder::new();
        let id = self.elements.insert(index, value.into(), &mut rec)?;
        self.elements.flash(index, &mut rec);
        Ok(Outcome::new(id, rec.finish("list insert")))
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Outcome<String>> {
        let mut rec = StepRecorder::new();
        let removed = self.elements.remove(index, &mut rec)?;
        Ok(Outcome::new(removed.value, rec.finish("list remove")))
    }

    pub fn remove_last(&mut self) -> Result<Outcome<String>> {
        let mut rec = StepRecorder::new();
        let removed = self
            .elements
            .pop_back(&mut rec)
            .ok_or_else(|| VizError::not_found("list is empty"))?;
        Ok(Outcome::new(removed.value, rec.finish("list remove last")))
    }

    /// First position holding `value`, with a `warn("not found")` on a miss
    pub fn search(&self, value: &str) -> Outcome<Option<usize>> {
        let mut rec = StepRecorder::new();
        let found = self.elements.search(value, &mut rec);
        Outcome::new(found, rec.finish("list search"))
    }

    pub fn clear(&mut self) -> Outcome<()> {
        let mut rec = StepRecorder::new();
        self.elements.clear(&mut rec);
        Outcome::new((), rec.finish("list clear"))
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn is_empty_report(&self) -> Outcome<bool> {
        let mut rec = StepRecorder::new();
        let empty = self.elements.report_empty(&mut rec);
        Outcome::new(empty, rec.finish("list is-empty"))
    }

    pub fn size(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &ElementList {
        &self.elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::{Phase, StepKind};

    fn list_of(values: &[&str]) -> LinkedList {
        let mut list = LinkedList::new();
        for v in values {
            list.add_node(*v);
        }
        list
    }

    #[test]
    fn test_insert_at_bounds() {
        let mut list = list_of(&["a", "c"]);
        list.insert_at("b", 1).unwrap();
        list.insert_at("d", 3).unwrap();
        assert_eq!(list.elements().values(), vec!["a", "b", "c", "d"]);

        let err = list.insert_at("z", 5).unwrap_err();
        assert_eq!(err, VizError::OutOfRange { index: 5, len: 4 });
        assert_eq!(list.size(), 4);
    }

    #[test]
    fn test_remove_at_bridges_neighbours() {
        let mut list = list_of(&["a", "b", "c"]);
        let out = list.remove_at(1).unwrap();
        assert_eq!(out.value, "b");
        assert_eq!(
            out.steps.kinds(),
            vec![
                StepKind::Highlight,
                StepKind::Highlight,
                StepKind::Remove,
                StepKind::Relink
            ]
        );
        let phases: Vec<_> = out.steps.of_kind(StepKind::Highlight).map(|s| s.phase).collect();
        assert_eq!(phases, vec![Some(Phase::Start), Some(Phase::End)]);
        assert!(list.remove_at(2).is_err());
        assert_eq!(list.elements().values(), vec!["a", "c"]);
    }

    #[test]
    fn test_search_returns_first_match() {
        let list = list_of(&["x", "y", "y"]);
        let out = list.search("y");
        assert_eq!(out.value, Some(1));
        assert_eq!(out.steps.of_kind(StepKind::Visit).count(), 2);

        let out = list.search("q");
        assert_eq!(out.value, None);
        assert!(out.steps.has_warning());
    }

    #[test]
    fn test_remove_last_on_empty() {
        let mut list = LinkedList::new();
        assert!(list.remove_last().unwrap_err().is_not_found());
    }
}
