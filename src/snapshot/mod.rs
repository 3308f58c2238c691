// Snapshot history for stepping back through past operations

use crate::graph::Graph;
use crate::sorting::SortInput;
use crate::step::StepSequence;
use crate::structures::{BinarySearchTree, Heap, LinkedList, Queue, Stack};
use std::collections::VecDeque;
use std::fmt;
use tracing::debug;

/// Default memory bound for the operation history (64 MiB)
pub const SNAPSHOT_MEMORY_LIMIT: usize = 64 * 1024 * 1024;

/// Which structure an operation ran on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    Bst,
    Heap,
    Stack,
    Queue,
    List,
    Graph,
    Array,
}

impl StructureKind {
    pub const ALL: [StructureKind; 7] = [
        StructureKind::Bst,
        StructureKind::Heap,
        StructureKind::Stack,
        StructureKind::Queue,
        StructureKind::List,
        StructureKind::Graph,
        StructureKind::Array,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StructureKind::Bst => "bst",
            StructureKind::Heap => "heap",
            StructureKind::Stack => "stack",
            StructureKind::Queue => "queue",
            StructureKind::List => "list",
            StructureKind::Graph => "graph",
            StructureKind::Array => "sort",
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Copy of one structure at a point in time
#[derive(Debug, Clone)]
pub enum StructureSnapshot {
    Bst(BinarySearchTree),
    Heap(Heap),
    Stack(Stack),
    Queue(Queue),
    List(LinkedList),
    Graph(Graph),
    Array(SortInput),
}

impl StructureSnapshot {
    pub fn kind(&self) -> StructureKind {
        match self {
            StructureSnapshot::Bst(_) => StructureKind::Bst,
            StructureSnapshot::Heap(_) => StructureKind::Heap,
            StructureSnapshot::Stack(_) => StructureKind::Stack,
            StructureSnapshot::Queue(_) => StructureKind::Queue,
            StructureSnapshot::List(_) => StructureKind::List,
            StructureSnapshot::Graph(_) => StructureKind::Graph,
            StructureSnapshot::Array(_) => StructureKind::Array,
        }
    }

    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        match self {
            StructureSnapshot::Bst(tree) => tree.estimated_size(),
            StructureSnapshot::Heap(heap) => heap.estimated_size(),
            StructureSnapshot::Stack(stack) => stack.elements().estimated_size(),
            StructureSnapshot::Queue(queue) => queue.elements().estimated_size(),
            StructureSnapshot::List(list) => list.elements().estimated_size(),
            StructureSnapshot::Graph(graph) => graph.estimated_size(),
            StructureSnapshot::Array(array) => array.estimated_size(),
        }
    }
}

/// One successful operation: the structure before and after, and its steps
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub label: String,
    pub before: StructureSnapshot,
    pub after: StructureSnapshot,
    pub steps: StepSequence,
}

impl HistoryEntry {
    pub fn kind(&self) -> StructureKind {
        self.after.kind()
    }

    pub fn estimated_size(&self) -> usize {
        self.label.len()
            + self.before.estimated_size()
            + self.after.estimated_size()
            + self.steps.estimated_size()
    }
}

/// Memory-bounded operation history with a selection cursor
///
/// When a new entry would exceed the limit, the oldest entries are dropped.
#[derive(Debug)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    max_memory: usize,
    current_memory: usize,
    cursor: Option<usize>,
}

impl History {
    pub fn new(max_memory: usize) -> Self {
        History {
            entries: VecDeque::new(),
            max_memory,
            current_memory: 0,
            cursor: None,
        }
    }

    /// Add an entry and select it
    pub fn push(&mut self, entry: HistoryEntry) {
        let size = entry.estimated_size();

        while !self.entries.is_empty() && self.current_memory + size > self.max_memory {
            if let Some(dropped) = self.entries.pop_front() {
                self.current_memory -= dropped.estimated_size();
                debug!(label = %dropped.label, "history entry evicted");
            }
        }

        self.current_memory += size;
        self.entries.push_back(entry);
        self.cursor = Some(self.entries.len() - 1);
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn selected(&self) -> Option<&HistoryEntry> {
        self.cursor.and_then(|i| self.entries.get(i))
    }

    /// Move the cursor one entry back; false at the oldest entry
    pub fn select_previous(&mut self) -> bool {
        match self.cursor {
            Some(i) if i > 0 => {
                self.cursor = Some(i - 1);
                true
            }
            _ => false,
        }
    }

    /// Move the cursor one entry forward; false at the newest entry
    pub fn select_next(&mut self) -> bool {
        match self.cursor {
            Some(i) if i + 1 < self.entries.len() => {
                self.cursor = Some(i + 1);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(SNAPSHOT_MEMORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepRecorder;

    fn entry(label: &str, values: Vec<i64>) -> HistoryEntry {
        HistoryEntry {
            label: label.to_string(),
            before: StructureSnapshot::Array(SortInput::default()),
            after: StructureSnapshot::Array(SortInput::from_values(values)),
            steps: StepRecorder::new().finish(label),
        }
    }

    #[test]
    fn test_cursor_moves_within_bounds() {
        let mut history = History::default();
        assert!(!history.select_previous());
        history.push(entry("a", vec![1]));
        history.push(entry("b", vec![2]));
        assert_eq!(history.cursor(), Some(1));
        assert!(history.select_previous());
        assert_eq!(history.selected().unwrap().label, "a");
        assert!(!history.select_previous());
        assert!(history.select_next());
        assert!(!history.select_next());
    }

    #[test]
    fn test_oldest_entries_evicted() {
        let one = entry("x", vec![0; 10]).estimated_size();
        let mut history = History::new(one * 2);
        history.push(entry("x", vec![0; 10]));
        history.push(entry("y", vec![0; 10]));
        history.push(entry("z", vec![0; 10]));
        assert_eq!(history.len(), 2);
        assert_eq!(history.get(0).unwrap().label, "y");
        assert!(history.memory_usage() <= history.memory_limit());
    }

    #[test]
    fn test_entry_kind_follows_snapshot() {
        assert_eq!(entry("s", vec![]).kind(), StructureKind::Array);
        assert_eq!(StructureKind::Array.to_string(), "sort");
    }
}
