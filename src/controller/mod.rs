//! Controller: turns commands into typed core calls
//!
//! A [`Session`] owns one instance of every structure plus the sort array. Each
//! successful command is recorded in the [`History`] together with a snapshot of
//! the structure before and after, so any past operation can be replayed. A
//! failed command leaves both the structure and the history untouched.

pub mod command;

pub use command::{parse_line, Command};

use crate::errors::{Result, VizError};
use crate::graph::{algorithms, import, Graph};
use crate::snapshot::{History, HistoryEntry, StructureKind, StructureSnapshot};
use crate::sorting::{self, SortInput, DEFAULT_ARRAY_LEN};
use crate::step::{Outcome, Step, StepKind, StepRecorder, StepSequence};
use crate::structures::{BinarySearchTree, Heap, LinkedList, Queue, Stack};
use command::{
    BstCommand, GraphCommand, HeapCommand, ImportFormat, ListCommand, QueueCommand, SortCommand,
    StackCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt::Display;
use std::fs;
use tracing::{debug, info};

/// What a command did: a one-line message and the steps to play back
#[derive(Debug, Clone)]
pub struct Report {
    pub kind: StructureKind,
    pub message: String,
    pub steps: StepSequence,
}

fn report<T>(kind: StructureKind, outcome: Outcome<T>, message: impl Into<String>) -> (Report, T) {
    let Outcome { value, steps } = outcome;
    (
        Report {
            kind,
            message: message.into(),
            steps,
        },
        value,
    )
}

fn found_or_missing<T: Display>(what: &str, found: Option<T>) -> String {
    match found {
        Some(v) => format!("{}: found at {}", what, v),
        None => format!("{}: not found", what),
    }
}

fn taken(op: &str, value: Option<String>) -> String {
    match value {
        Some(v) => format!("{} -> {}", op, v),
        None => format!("{}: empty", op),
    }
}

fn emptiness(empty: bool) -> String {
    (if empty { "empty" } else { "not empty" }).to_string()
}

/// Every structure the tool can show, plus the operation history
#[derive(Debug)]
pub struct Session {
    pub bst: BinarySearchTree,
    pub heap: Heap,
    pub stack: Stack,
    pub queue: Queue,
    pub list: LinkedList,
    pub graph: Graph,
    pub array: SortInput,
    history: History,
    rng: StdRng,
}

impl Session {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic array generation
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut rng: StdRng) -> Self {
        let array = SortInput::random(DEFAULT_ARRAY_LEN, &mut rng);
        Session {
            bst: BinarySearchTree::new(),
            heap: Heap::new(),
            stack: Stack::new(),
            queue: Queue::new(),
            list: LinkedList::new(),
            graph: Graph::new(),
            array,
            history: History::default(),
            rng,
        }
    }

    pub fn with_history(mut self, history: History) -> Self {
        self.history = history;
        self
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// Copy of the current state of one structure
    pub fn snapshot(&self, kind: StructureKind) -> StructureSnapshot {
        match kind {
            StructureKind::Bst => StructureSnapshot::Bst(self.bst.clone()),
            StructureKind::Heap => StructureSnapshot::Heap(self.heap.clone()),
            StructureKind::Stack => StructureSnapshot::Stack(self.stack.clone()),
            StructureKind::Queue => StructureSnapshot::Queue(self.queue.clone()),
            StructureKind::List => StructureSnapshot::List(self.list.clone()),
            StructureKind::Graph => StructureSnapshot::Graph(self.graph.clone()),
            StructureKind::Array => StructureSnapshot::Array(self.array.clone()),
        }
    }

    /// Parse and run one line; `None` for blank lines and comments
    pub fn execute_line(&mut self, line: &str) -> Result<Option<Report>> {
        match parse_line(line)? {
            Some(command) => self.execute(command).map(Some),
            None => Ok(None),
        }
    }

    /// Run a command and record it in the history
    pub fn execute(&mut self, command: Command) -> Result<Report> {
        let kind = command.kind();
        let before = self.snapshot(kind);

        let report = match command {
            Command::Bst(cmd) => self.run_bst(cmd),
            Command::Heap(cmd) => self.run_heap(cmd),
            Command::Stack(cmd) => self.run_stack(cmd),
            Command::Queue(cmd) => self.run_queue(cmd)?,
            Command::List(cmd) => self.run_list(cmd)?,
            Command::Graph(cmd) => self.run_graph(cmd)?,
            Command::Sort(cmd) => self.run_sort(cmd)?,
        };

        debug!(
            structure = %kind,
            label = report.steps.label(),
            steps = report.steps.len(),
            "command executed"
        );
        self.history.push(HistoryEntry {
            label: report.message.clone(),
            before,
            after: self.snapshot(kind),
            steps: report.steps.clone(),
        });
        Ok(report)
    }

    fn run_bst(&mut self, cmd: BstCommand) -> Report {
        let kind = StructureKind::Bst;
        match cmd {
            BstCommand::Insert(v) => report(kind, self.bst.insert(v), format!("inserted {}", v)).0,
            BstCommand::Delete(v) => {
                let (mut r, removed) = report(kind, self.bst.delete(v), String::new());
                r.message = if removed {
                    format!("deleted {}", v)
                } else {
                    format!("delete {}: not found", v)
                };
                r
            }
            BstCommand::Search(v) => {
                let (mut r, found) = report(kind, self.bst.search(v), String::new());
                r.message = found_or_missing(&format!("search {}", v), found);
                r
            }
            BstCommand::Clear => report(kind, self.bst.clear(), "cleared tree").0,
        }
    }

    fn run_heap(&mut self, cmd: HeapCommand) -> Report {
        let kind = StructureKind::Heap;
        match cmd {
            HeapCommand::Insert(v) => {
                let (mut r, at) = report(kind, self.heap.insert(v), String::new());
                r.message = format!("inserted {} at [{}]", v, at);
                r
            }
            HeapCommand::Remove => {
                let (mut r, root) = report(kind, self.heap.remove_max(), String::new());
                r.message = taken("remove", root.map(|v| v.to_string()));
                r
            }
            HeapCommand::Peek => {
                let (mut r, root) = report(kind, self.heap.peek_max(), String::new());
                r.message = taken("peek", root.map(|v| v.to_string()));
                r
            }
            HeapCommand::Empty => {
                let (mut r, empty) = report(kind, self.heap.is_empty_report(), String::new());
                r.message = emptiness(empty);
                r
            }
            HeapCommand::Clear => report(kind, self.heap.clear(), "cleared heap").0,
            HeapCommand::Order(order) => report(
                kind,
                self.heap.set_order(order),
                format!("{}-heap", order.name()),
            )
            .0,
        }
    }

    fn run_stack(&mut self, cmd: StackCommand) -> Report {
        let kind = StructureKind::Stack;
        match cmd {
            StackCommand::Push(v) => {
                let message = format!("pushed {}", v);
                report(kind, self.stack.push(v), message).0
            }
            StackCommand::Pop => {
                let (mut r, top) = report(kind, self.stack.pop(), String::new());
                r.message = taken("pop", top);
                r
            }
            StackCommand::Peek => {
                let (mut r, top) = report(kind, self.stack.peek(), String::new());
                r.message = taken("peek", top);
                r
            }
            StackCommand::Search(v) => {
                let (mut r, at) = report(kind, self.stack.search(&v), String::new());
                r.message = found_or_missing(&format!("search {}", v), at);
                r
            }
            StackCommand::Empty => {
                let (mut r, empty) = report(kind, self.stack.is_empty_report(), String::new());
                r.message = emptiness(empty);
                r
            }
            StackCommand::Clear => report(kind, self.stack.clear(), "cleared stack").0,
        }
    }

    fn run_queue(&mut self, cmd: QueueCommand) -> Result<Report> {
        let kind = StructureKind::Queue;
        Ok(match cmd {
            QueueCommand::Enqueue(v) => {
                let message = format!("enqueued {}", v);
                report(kind, self.queue.enqueue(v), message).0
            }
            QueueCommand::Dequeue => {
                let (mut r, head) = report(kind, self.queue.dequeue(), String::new());
                r.message = taken("dequeue", head);
                r
            }
            QueueCommand::Peek => {
                let (mut r, head) = report(kind, self.queue.peek(), String::new());
                r.message = taken("peek", head);
                r
            }
            QueueCommand::Front => {
                let head = self.queue.front()?;
                report(kind, self.queue.peek(), format!("front -> {}", head)).0
            }
            QueueCommand::Search(v) => {
                let (mut r, at) = report(kind, self.queue.search(&v), String::new());
                r.message = found_or_missing(&format!("search {}", v), at);
                r
            }
            QueueCommand::Empty => {
                let (mut r, empty) = report(kind, self.queue.is_empty_report(), String::new());
                r.message = emptiness(empty);
                r
            }
            QueueCommand::Clear => report(kind, self.queue.clear(), "cleared queue").0,
        })
    }

    fn run_list(&mut self, cmd: ListCommand) -> Result<Report> {
        let kind = StructureKind::List;
        Ok(match cmd {
            ListCommand::Add(v) => {
                let message = format!("added {}", v);
                report(kind, self.list.add_node(v), message).0
            }
            ListCommand::Insert(v, index) => {
                let message = format!("inserted {} at {}", v, index);
                report(kind, self.list.insert_at(v, index)?, message).0
            }
            ListCommand::Remove(index) => {
                let (mut r, value) = report(kind, self.list.remove_at(index)?, String::new());
                r.message = format!("removed {} from {}", value, index);
                r
            }
            ListCommand::RemoveLast => {
                let (mut r, value) = report(kind, self.list.remove_last()?, String::new());
                r.message = format!("removed {}", value);
                r
            }
            ListCommand::Search(v) => {
                let (mut r, at) = report(kind, self.list.search(&v), String::new());
                r.message = found_or_missing(&format!("search {}", v), at);
                r
            }
            ListCommand::Empty => {
                let (mut r, empty) = report(kind, self.list.is_empty_report(), String::new());
                r.message = emptiness(empty);
                r
            }
            ListCommand::Clear => report(kind, self.list.clear(), "cleared list").0,
        })
    }

    fn run_graph(&mut self, cmd: GraphCommand) -> Result<Report> {
        let kind = StructureKind::Graph;
        Ok(match cmd {
            GraphCommand::Node(label) => {
                let (mut r, id) = report(kind, self.graph.add_node(label), String::new());
                r.message = format!("added node {}", id);
                r
            }
            GraphCommand::Edge { from, to, directed } => {
                let (mut r, id) =
                    report(kind, self.graph.add_edge(from, to, directed)?, String::new());
                let arrow = if directed { "->" } else { "--" };
                r.message = format!("edge {}: {} {} {}", id, from, arrow, to);
                r
            }
            GraphCommand::Weight { edge, weight } => {
                let (mut r, set) = report(kind, self.graph.set_weight(edge, weight)?, String::new());
                r.message = match set {
                    Some(w) => format!("edge {} weight {}", edge, w),
                    None => format!("edge {} unweighted", edge),
                };
                r
            }
            GraphCommand::RemoveNode(id) => {
                let (mut r, node) = report(kind, self.graph.remove_node(id)?, String::new());
                r.message = format!("removed node {} ({})", id, node.label);
                r
            }
            GraphCommand::RemoveEdge(id) => {
                report(kind, self.graph.remove_edge(id)?, format!("removed edge {}", id)).0
            }
            GraphCommand::Clear => report(kind, self.graph.clear(), "cleared graph").0,
            GraphCommand::Import { format, path } => {
                let text = fs::read_to_string(&path).map_err(|e| {
                    VizError::invalid(format!("cannot read {}: {}", path.display(), e))
                })?;
                let imported = match format {
                    ImportFormat::Matrix => import::parse_adjacency_matrix(&text)?,
                    ImportFormat::List => import::parse_adjacency_list(&text)?,
                    ImportFormat::Edges => import::parse_edge_list(&text)?,
                };
                info!(path = %path.display(), "graph imported");
                self.replace_graph(imported)
            }
            GraphCommand::Bfs(start) => {
                let (mut r, order) = report(kind, algorithms::bfs(&self.graph, start)?, String::new());
                r.message = format!("bfs visited {} node(s)", order.len());
                r
            }
            GraphCommand::Dfs(start) => {
                let (mut r, order) = report(kind, algorithms::dfs(&self.graph, start)?, String::new());
                r.message = format!("dfs visited {} node(s)", order.len());
                r
            }
            GraphCommand::Kruskal => {
                let (mut r, mst) = report(kind, algorithms::kruskal(&self.graph), String::new());
                r.message = format!("kruskal: {} edge(s), weight {}", mst.edges.len(), mst.total_weight);
                r
            }
            GraphCommand::Prim => {
                let (mut r, mst) = report(kind, algorithms::prim(&self.graph), String::new());
                r.message = format!("prim: {} edge(s), weight {}", mst.edges.len(), mst.total_weight);
                r
            }
        })
    }

    /// Swap in an imported graph, recording the old graph's removal and the new contents
    fn replace_graph(&mut self, graph: Graph) -> Report {
        let mut rec = StepRecorder::new();
        for step in &self.graph.clear().steps {
            rec.record(step.clone());
        }
        for node in graph.nodes() {
            rec.record(Step::new(StepKind::Add).node(node.id).text(node.label.clone()));
        }
        for edge in graph.edges() {
            rec.record(Step::new(StepKind::Add).edge(edge.id).node(edge.from).node(edge.to));
        }
        let message = format!(
            "imported {} node(s), {} edge(s)",
            graph.node_count(),
            graph.edge_count()
        );
        self.graph = graph;
        Report {
            kind: StructureKind::Graph,
            message,
            steps: rec.finish("graph import"),
        }
    }

    fn run_sort(&mut self, cmd: SortCommand) -> Result<Report> {
        let kind = StructureKind::Array;
        Ok(match cmd {
            SortCommand::Generate(len) => {
                let len = len.unwrap_or(DEFAULT_ARRAY_LEN);
                sorting::check_len(len)?;
                let fresh = SortInput::random(len, &mut self.rng);
                self.replace_array(fresh, "sort generate")
            }
            SortCommand::Set(values) => {
                sorting::check_len(values.len())?;
                self.replace_array(SortInput::from_values(values), "sort set")
            }
            SortCommand::Run(algorithm) => {
                let (mut r, sorted) = report(kind, sorting::sort(algorithm, &self.array), String::new());
                r.message = format!("{} sort: {} step(s)", algorithm, r.steps.len());
                self.array = sorted;
                r
            }
        })
    }

    /// Remove every current bar (tail first), then add the new ones in order
    fn replace_array(&mut self, fresh: SortInput, label: &str) -> Report {
        let mut rec = StepRecorder::new();
        for i in (0..self.array.len()).rev() {
            rec.record(Step::new(StepKind::Remove).index(i));
        }
        for (i, &v) in fresh.values().iter().enumerate() {
            rec.record(Step::new(StepKind::Add).index(i).int(v));
        }
        let message = format!("{} bar(s)", fresh.len());
        self.array = fresh;
        Report {
            kind: StructureKind::Array,
            message,
            steps: rec.finish(label),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sorting::replay;

    #[test]
    fn test_failed_command_leaves_history_untouched() {
        let mut session = Session::with_seed(1);
        session.execute_line("list add a").unwrap();
        let err = session.execute_line("list remove 3").unwrap_err();
        assert_eq!(err, VizError::OutOfRange { index: 3, len: 1 });
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.list.size(), 1);
    }

    #[test]
    fn test_history_keeps_before_and_after() {
        let mut session = Session::with_seed(1);
        session.execute_line("heap insert 4").unwrap();
        session.execute_line("heap insert 9").unwrap();
        let entry = session.history().latest().unwrap();
        match (&entry.before, &entry.after) {
            (StructureSnapshot::Heap(before), StructureSnapshot::Heap(after)) => {
                assert_eq!(before.as_slice(), &[4]);
                assert_eq!(after.as_slice(), &[9, 4]);
            }
            other => panic!("unexpected snapshots {:?}", other),
        }
    }

    #[test]
    fn test_sort_set_then_run_replays() {
        let mut session = Session::with_seed(1);
        session.execute_line("sort set 5 3 4").unwrap();
        let before = session.array.clone();
        let report = session.execute_line("sort selection").unwrap().unwrap();
        assert_eq!(session.array.values(), &[3, 4, 5]);

        let states = replay(&before, &report.steps).unwrap();
        assert_eq!(states.last().unwrap().values, vec![3, 4, 5]);
    }

    #[test]
    fn test_generate_steps_rebuild_array() {
        let mut session = Session::with_seed(9);
        let old = session.array.clone();
        let report = session.execute_line("sort generate 5").unwrap().unwrap();
        let states = replay(&old, &report.steps).unwrap();
        assert_eq!(states.last().unwrap().values, session.array.values());
        assert_eq!(session.array.len(), 5);
    }

    #[test]
    fn test_graph_commands_flow() {
        let mut session = Session::with_seed(1);
        for line in ["graph node a", "graph node b", "graph edge 0 1", "graph weight 0 3"] {
            session.execute_line(line).unwrap();
        }
        let report = session.execute_line("graph kruskal").unwrap().unwrap();
        assert_eq!(report.message, "kruskal: 1 edge(s), weight 3");
        assert!(session.execute_line("graph weight 0 -2").is_err());
        assert!(session.execute_line("graph bfs 5").unwrap_err().is_not_found());
    }

    #[test]
    fn test_queue_front_and_peek_on_empty_queue() {
        let mut session = Session::with_seed(1);
        assert!(session.execute_line("queue front").unwrap_err().is_not_found());

        let report = session.execute_line("queue peek").unwrap().unwrap();
        assert_eq!(report.message, "peek: empty");
        assert!(report.steps.has_warning());

        session.execute_line("queue enqueue a").unwrap();
        session.execute_line("queue enqueue b").unwrap();
        let report = session.execute_line("queue front").unwrap().unwrap();
        assert_eq!(report.message, "front -> a");
    }

    #[test]
    fn test_oversized_array_is_rejected() {
        let mut session = Session::with_seed(1);
        session.execute_line("sort set 3 1 2").unwrap();

        let err = session
            .execute_line("sort generate 4611686018427387904")
            .unwrap_err();
        assert!(matches!(err, VizError::InvalidArgument(_)));

        let too_many = format!("sort generate {}", sorting::MAX_ARRAY_LEN + 1);
        assert!(session.execute_line(&too_many).is_err());
        assert_eq!(session.array.values(), &[3, 1, 2]);
        assert_eq!(session.history().len(), 1);

        let at_limit = format!("sort generate {}", sorting::MAX_ARRAY_LEN);
        session.execute_line(&at_limit).unwrap();
        assert_eq!(session.array.len(), sorting::MAX_ARRAY_LEN);
    }
}
