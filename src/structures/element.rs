//! Shared storage for the linear structures (stack, queue, linked list)
//!
//! Elements keep a stable [`NodeId`] for their whole life, independent of the
//! position they currently occupy. Position-based operations report
//! [`VizError::OutOfRange`] without touching the store.

use crate::errors::{Result, VizError};
use crate::step::{NodeId, Phase, Step, StepKind, StepRecorder};

/// One cell of a linear structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: NodeId,
    pub value: String,
}

/// Ordered cells plus the id allocator
#[derive(Debug, Clone, Default)]
pub struct ElementList {
    cells: Vec<Element>,
    next_id: u32,
}

impl ElementList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.cells.get(index)
    }

    pub fn first(&self) -> Option<&Element> {
        self.cells.first()
    }

    pub fn last(&self) -> Option<&Element> {
        self.cells.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.cells.iter()
    }

    pub fn values(&self) -> Vec<String> {
        self.cells.iter().map(|e| e.value.clone()).collect()
    }

    fn link_step(from: NodeId, to: Option<NodeId>) -> Step {
        let step = Step::new(StepKind::Relink).node(from);
        match to {
            Some(to) => step.node(to),
            None => step,
        }
    }

    /// Insert `value` at `index` (`index == len` appends)
    ///
    /// Records `add` for the new cell followed by one `relink` per changed
    /// adjacency.
    pub fn insert(&mut self, index: usize, value: String, rec: &mut StepRecorder) -> Result<NodeId> {
        if index > self.cells.len() {
            return Err(VizError::OutOfRange {
                index,
                len: self.cells.len(),
            });
        }
        Ok(self.insert_in_range(index, value, rec))
    }

    /// Append at the tail
    pub fn push_back(&mut self, value: String, rec: &mut StepRecorder) -> NodeId {
        self.insert_in_range(self.cells.len(), value, rec)
    }

    fn insert_in_range(&mut self, index: usize, value: String, rec: &mut StepRecorder) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        rec.record(Step::new(StepKind::Add).node(id).index(index).text(value.clone()));
        self.cells.insert(index, Element { id, value });

        if index > 0 {
            rec.record(Self::link_step(self.cells[index - 1].id, Some(id)));
        }
        if let Some(next) = self.cells.get(index + 1) {
            rec.record(Self::link_step(id, Some(next.id)));
        }
        id
    }

    /// Remove the cell at `index`, recording `highlight`, `remove` and the
    /// bridging `relink`
    pub fn remove(&mut self, index: usize, rec: &mut StepRecorder) -> Result<Element> {
        if index >= self.cells.len() {
            return Err(VizError::OutOfRange {
                index,
                len: self.cells.len(),
            });
        }
        Ok(self.remove_in_range(index, rec))
    }

    pub fn pop_front(&mut self, rec: &mut StepRecorder) -> Option<Element> {
        if self.cells.is_empty() {
            return None;
        }
        Some(self.remove_in_range(0, rec))
    }

    pub fn pop_back(&mut self, rec: &mut StepRecorder) -> Option<Element> {
        let last = self.cells.len().checked_sub(1)?;
        Some(self.remove_in_range(last, rec))
    }

    fn remove_in_range(&mut self, index: usize, rec: &mut StepRecorder) -> Element {
        let removed = self.cells.remove(index);
        rec.record(
            Step::new(StepKind::Highlight)
                .node(removed.id)
                .phase(Phase::Start),
        );
        rec.record(Step::new(StepKind::Highlight).node(removed.id).phase(Phase::End));
        rec.record(
            Step::new(StepKind::Remove)
                .node(removed.id)
                .index(index)
                .text(removed.value.clone()),
        );

        if index > 0 {
            let prev = self.cells[index - 1].id;
            let next = self.cells.get(index).map(|e| e.id);
            rec.record(Self::link_step(prev, next));
        }
        removed
    }

    /// Transient highlight on one cell
    pub fn flash(&self, index: usize, rec: &mut StepRecorder) {
        if let Some(cell) = self.cells.get(index) {
            rec.record(Step::new(StepKind::Highlight).node(cell.id).index(index).phase(Phase::Start));
            rec.record(Step::new(StepKind::Highlight).node(cell.id).index(index).phase(Phase::End));
        }
    }

    /// First position holding `value`; visits every cell examined
    pub fn search(&self, value: &str, rec: &mut StepRecorder) -> Option<usize> {
        for (i, cell) in self.cells.iter().enumerate() {
            rec.record(Step::new(StepKind::Visit).node(cell.id).index(i));
            if cell.value == value {
                rec.record(Step::new(StepKind::Found).node(cell.id).index(i));
                self.flash(i, rec);
                return Some(i);
            }
        }
        rec.record(Step::warn("not found"));
        None
    }

    /// Drop every cell, head first
    pub fn clear(&mut self, rec: &mut StepRecorder) {
        for (i, cell) in self.cells.iter().enumerate() {
            rec.record(Step::new(StepKind::Remove).node(cell.id).index(i).text(cell.value.clone()));
        }
        self.cells.clear();
    }

    /// `status` step answering "is it empty?"
    pub fn report_empty(&self, rec: &mut StepRecorder) -> bool {
        let empty = self.cells.is_empty();
        rec.record(Step::new(StepKind::Status).text(if empty { "empty" } else { "not empty" }));
        empty
    }

    pub fn estimated_size(&self) -> usize {
        self.cells
            .iter()
            .map(|e| std::mem::size_of::<Element>() + e.value.len())
            .sum()
    }
}
