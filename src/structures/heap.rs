//! Binary heap over a dense array
//!
//! Position `i` has children `2i+1` and `2i+2` and parent `(i-1)/2`. After every
//! public operation the heap property holds: each parent outranks (or equals)
//! its children, where "outranks" is `>` for [`HeapOrder::Max`] and `<` for
//! [`HeapOrder::Min`].
//!
//! # Steps
//!
//! All subjects are array positions, so the sequence can be replayed on a copy
//! of the array (see [`crate::sorting::ArrayState`]):
//! - `insert`: `add [i]`, then `compare`/`swap` per level moved up
//! - `remove_max`: `highlight+ [0]`, `swap [0] [last]`, `remove [last]`, then
//!   `compare`/`swap` while sifting down

use crate::step::{Comparison, Outcome, Payload, Phase, Step, StepKind, StepRecorder};
use serde::{Deserialize, Serialize};

/// Which end of the ordering sits at the root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeapOrder {
    #[default]
    Max,
    Min,
}

impl HeapOrder {
    /// Strictly higher priority; equal values never move
    fn outranks(self, a: i64, b: i64) -> bool {
        match self {
            HeapOrder::Max => a > b,
            HeapOrder::Min => a < b,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HeapOrder::Max => "max",
            HeapOrder::Min => "min",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Heap {
    order: HeapOrder,
    items: Vec<i64>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(order: HeapOrder) -> Self {
        Heap {
            order,
            items: Vec::new(),
        }
    }

    pub fn order(&self) -> HeapOrder {
        self.order
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn compare(&self, a: usize, b: usize, rec: &mut StepRecorder) {
        rec.record(
            Step::new(StepKind::Compare)
                .index(a)
                .index(b)
                .payload(Payload::Ordering(Comparison::from(self.items[a].cmp(&self.items[b])))),
        );
    }

    fn swap(&mut self, a: usize, b: usize, rec: &mut StepRecorder) {
        self.items.swap(a, b);
        rec.record(Step::new(StepKind::Swap).index(a).index(b));
    }

    fn sift_up(&mut self, mut i: usize, rec: &mut StepRecorder) -> usize {
        while i > 0 {
            let parent = (i - 1) / 2;
            self.compare(i, parent, rec);
            if !self.order.outranks(self.items[i], self.items[parent]) {
                break;
            }
            self.swap(i, parent, rec);
            i = parent;
        }
        i
    }

    /// Move `i` down, choosing the higher-priority child (left wins ties)
    fn sift_down(&mut self, mut i: usize, rec: &mut StepRecorder) {
        let len = self.items.len();
        loop {
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            let mut best = i;

            if left < len {
                self.compare(left, best, rec);
                if self.order.outranks(self.items[left], self.items[best]) {
                    best = left;
                }
            }
            if right < len {
                self.compare(right, best, rec);
                if self.order.outranks(self.items[right], self.items[best]) {
                    best = right;
                }
            }
            if best == i {
                break;
            }
            self.swap(i, best, rec);
            i = best;
        }
    }

    /// Append then sift up; the value is the final position of the new item
    pub fn insert(&mut self, value: i64) -> Outcome<usize> {
        let mut rec = StepRecorder::new();
        self.items.push(value);
        let at = self.items.len() - 1;
        rec.record(Step::new(StepKind::Add).index(at).int(value));

        let settled = self.sift_up(at, &mut rec);
        rec.record(Step::new(StepKind::Highlight).index(settled).phase(Phase::Start));
        rec.record(Step::new(StepKind::Highlight).index(settled).phase(Phase::End));
        Outcome::new(settled, rec.finish("heap insert"))
    }

    /// Remove and return the root (`None` plus `warn("empty")` on an empty heap)
    pub fn remove_max(&mut self) -> Outcome<Option<i64>> {
        let mut rec = StepRecorder::new();
        let Some(&root) = self.items.first() else {
            rec.record(Step::warn("empty"));
            return Outcome::new(None, rec.finish("heap remove"));
        };

        rec.record(Step::new(StepKind::Highlight).index(0).int(root).phase(Phase::Start));
        rec.record(Step::new(StepKind::Highlight).index(0).phase(Phase::End));
        let last = self.items.len() - 1;
        if last > 0 {
            self.swap(0, last, &mut rec);
        }
        self.items.pop();
        rec.record(Step::new(StepKind::Remove).index(last).int(root));

        self.sift_down(0, &mut rec);
        Outcome::new(Some(root), rec.finish("heap remove"))
    }

    pub fn peek_max(&self) -> Outcome<Option<i64>> {
        let mut rec = StepRecorder::new();
        let root = self.items.first().copied();
        match root {
            Some(v) => {
                rec.record(Step::new(StepKind::Highlight).index(0).int(v).phase(Phase::Start));
                rec.record(Step::new(StepKind::Highlight).index(0).int(v).phase(Phase::End));
            }
            None => rec.record(Step::warn("empty")),
        }
        Outcome::new(root, rec.finish("heap peek"))
    }

    pub fn is_empty_report(&self) -> Outcome<bool> {
        let mut rec = StepRecorder::new();
        let empty = self.items.is_empty();
        rec.record(Step::new(StepKind::Status).text(if empty { "empty" } else { "not empty" }));
        Outcome::new(empty, rec.finish("heap is-empty"))
    }

    pub fn clear(&mut self) -> Outcome<()> {
        let mut rec = StepRecorder::new();
        // Tail first so every recorded index is valid when replayed in order
        for i in (0..self.items.len()).rev() {
            rec.record(Step::new(StepKind::Remove).index(i).int(self.items[i]));
        }
        self.items.clear();
        Outcome::new((), rec.finish("heap clear"))
    }

    /// Switch between max and min ordering, re-heapifying bottom-up
    pub fn set_order(&mut self, order: HeapOrder) -> Outcome<()> {
        let mut rec = StepRecorder::new();
        if order != self.order {
            self.order = order;
            for i in (0..self.items.len() / 2).rev() {
                self.sift_down(i, &mut rec);
            }
        }
        rec.record(Step::new(StepKind::Status).text(format!("{}-heap", order.name())));
        Outcome::new((), rec.finish("heap order"))
    }

    /// True when every parent outranks or equals its children
    pub fn is_valid(&self) -> bool {
        (1..self.items.len()).all(|c| {
            let p = (c - 1) / 2;
            !self.order.outranks(self.items[c], self.items[p])
        })
    }

    pub fn estimated_size(&self) -> usize {
        self.items.len() * std::mem::size_of::<i64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heap_of(values: &[i64]) -> Heap {
        let mut heap = Heap::new();
        for &v in values {
            heap.insert(v);
        }
        heap
    }

    #[test]
    fn test_remove_max_scenario() {
        let mut heap = heap_of(&[3, 1, 4, 1, 5]);
        assert_eq!(heap.as_slice()[0], 5);

        let out = heap.remove_max();
        assert_eq!(out.value, Some(5));
        assert!(heap.is_valid());
        assert_eq!(heap.len(), 4);
        assert_eq!(heap.as_slice()[0], 4);
    }

    #[test]
    fn test_remove_max_closes_its_highlight() {
        let mut heap = heap_of(&[6, 2, 4]);
        let out = heap.remove_max();
        let phases: Vec<_> = out.steps.of_kind(StepKind::Highlight).map(|s| s.phase).collect();
        assert_eq!(phases, vec![Some(Phase::Start), Some(Phase::End)]);

        let kinds = out.steps.kinds();
        let end = kinds.iter().rposition(|k| *k == StepKind::Highlight).unwrap();
        let remove = kinds.iter().position(|k| *k == StepKind::Remove).unwrap();
        assert!(end < remove);
    }

    #[test]
    fn test_equal_values_do_not_swap_on_insert() {
        let mut heap = heap_of(&[7]);
        let out = heap.insert(7);
        assert_eq!(out.value, 1);
        assert_eq!(out.steps.of_kind(StepKind::Swap).count(), 0);
    }

    #[test]
    fn test_sift_down_prefers_left_on_tie() {
        let heap = heap_of(&[9, 5, 5, 1]);
        // 1 moves to the root and both children are 5
        assert_eq!(heap_swaps(&heap), vec![(0, 3), (0, 1)]);
    }

    fn heap_swaps(heap: &Heap) -> Vec<(usize, usize)> {
        let mut heap = heap.clone();
        heap.remove_max()
            .steps
            .of_kind(StepKind::Swap)
            .map(|s| {
                (
                    s.subjects[0].as_index().unwrap(),
                    s.subjects[1].as_index().unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_heap_warns() {
        let mut heap = Heap::new();
        let out = heap.remove_max();
        assert_eq!(out.value, None);
        assert!(out.steps.has_warning());
        assert!(heap.peek_max().steps.has_warning());
    }

    #[test]
    fn test_min_order() {
        let mut heap = Heap::with_order(HeapOrder::Min);
        for v in [4, 2, 8, 1] {
            heap.insert(v);
        }
        assert_eq!(heap.remove_max().value, Some(1));
        assert!(heap.is_valid());
    }

    #[test]
    fn test_set_order_reheapifies() {
        let mut heap = heap_of(&[1, 2, 3, 4, 5, 6]);
        heap.set_order(HeapOrder::Min);
        assert!(heap.is_valid());
        assert_eq!(heap.as_slice()[0], 1);
    }
}
