// Integration tests for the structure cores, algorithms and controller

use std::fs;
use std::time::{Duration, Instant};

use structviz::controller::Session;
use structviz::errors::VizError;
use structviz::graph::{algorithms, import, Graph};
use structviz::snapshot::{StructureKind, StructureSnapshot};
use structviz::sorting::{self, SortAlgorithm, SortInput};
use structviz::step::player::{PlayerConfig, Renderer, StepPlayer};
use structviz::step::{NodeId, Step, StepKind};
use structviz::structures::{BinarySearchTree, Heap, LinkedList, Queue, Stack};

#[test]
fn test_bst_search_visits_path() {
    let mut bst = BinarySearchTree::new();
    for v in [5, 3, 8, 1] {
        bst.insert(v);
    }

    let outcome = bst.search(8);
    let found = outcome.value.expect("8 should be found");
    assert_eq!(bst.value_of(found), Some(8));

    let path: Vec<i64> = outcome
        .steps
        .visited_nodes()
        .into_iter()
        .filter_map(|id| bst.value_of(id))
        .collect();
    assert_eq!(path, vec![5, 8]);
    assert_eq!(outcome.steps.of_kind(StepKind::Found).count(), 1);
}

#[test]
fn test_bst_search_miss_is_a_warning() {
    let mut bst = BinarySearchTree::new();
    for v in [5, 3, 8] {
        bst.insert(v);
    }
    let outcome = bst.search(4);
    assert_eq!(outcome.value, None);
    assert!(outcome.steps.has_warning());
    assert_eq!(bst.in_order(), vec![3, 5, 8]);
}

#[test]
fn test_heap_remove_max_keeps_invariant() {
    let mut heap = Heap::new();
    for v in [3, 1, 4, 1, 5] {
        heap.insert(v);
    }

    let outcome = heap.remove_max();
    assert_eq!(outcome.value, Some(5));
    assert!(heap.is_valid());
    assert_eq!(heap.len(), 4);
    assert_eq!(heap.peek_max().value, Some(4));
}

#[test]
fn test_heap_remove_from_empty_warns() {
    let mut heap = Heap::new();
    let outcome = heap.remove_max();
    assert_eq!(outcome.value, None);
    assert!(outcome.steps.has_warning());
}

#[test]
fn test_adjacency_list_bfs_order() {
    let graph = import::parse_adjacency_list("0: 1 2\n1:\n2:").expect("valid adjacency list");
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);

    let outcome = algorithms::bfs(&graph, NodeId(0)).expect("node 0 exists");
    assert_eq!(outcome.value, vec![NodeId(0), NodeId(1), NodeId(2)]);
    assert_eq!(outcome.steps.visited_nodes(), outcome.value);
}

#[test]
fn test_bfs_from_unknown_node_fails() {
    let graph = import::parse_adjacency_list("0: 1\n1:").expect("valid adjacency list");
    let err = algorithms::bfs(&graph, NodeId(9)).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_matrix_rejects_non_square_input() {
    let err = import::parse_adjacency_matrix("0 1\n1 0 1").unwrap_err();
    assert!(matches!(err, VizError::Parse { line: 2, .. }));

    let err = import::parse_adjacency_matrix("0 2\n1 0").unwrap_err();
    assert!(matches!(err, VizError::Parse { line: 1, .. }));
}

#[test]
fn test_edge_list_expands_bidirectional_arrows() {
    let graph = import::parse_edge_list("0 1\n1->2\n2<->3").expect("valid edge list");
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 4);
    assert!(graph.edges().iter().all(|e| e.directed));
}

#[test]
fn test_queue_is_fifo() {
    let mut queue = Queue::new();
    for v in ["a", "b", "c"] {
        queue.enqueue(v);
    }
    assert_eq!(queue.front().as_deref(), Ok("a"));
    assert_eq!(queue.dequeue().value.as_deref(), Some("a"));
    assert_eq!(queue.dequeue().value.as_deref(), Some("b"));
    assert_eq!(queue.len(), 1);
}

#[test]
fn test_queue_front_on_empty_is_not_found() {
    let queue = Queue::new();
    assert!(queue.front().unwrap_err().is_not_found());
    assert!(queue.peek().steps.has_warning());
}

#[test]
fn test_stack_is_lifo() {
    let mut stack = Stack::new();
    stack.push("x");
    stack.push("y");
    assert_eq!(stack.peek().value.as_deref(), Some("y"));
    assert_eq!(stack.pop().value.as_deref(), Some("y"));
    assert_eq!(stack.pop().value.as_deref(), Some("x"));
    let empty = stack.pop();
    assert_eq!(empty.value, None);
    assert!(empty.steps.has_warning());
}

#[test]
fn test_linked_list_index_errors_leave_list_unchanged() {
    let mut list = LinkedList::new();
    list.add_node("a");
    list.add_node("b");

    let err = list.insert_at("z", 5).unwrap_err();
    assert_eq!(err, VizError::OutOfRange { index: 5, len: 2 });
    assert!(list.remove_at(2).is_err());
    assert_eq!(list.elements().values(), vec!["a", "b"]);

    list.insert_at("m", 1).expect("index 1 is valid");
    assert_eq!(list.elements().values(), vec!["a", "m", "b"]);
    assert_eq!(list.remove_last().expect("not empty").value, "b");
}

#[test]
fn test_every_sort_replays_to_sorted_array() {
    let input = SortInput::from_values(vec![9, 4, 7, 1, 4, 0, 12, 3]);
    for algorithm in SortAlgorithm::ALL {
        let outcome = sorting::sort(algorithm, &input);
        assert!(outcome.value.is_sorted(), "{} did not sort", algorithm);

        let states = sorting::replay(&input, &outcome.steps).expect("steps apply cleanly");
        assert_eq!(states.len(), outcome.steps.len() + 1);
        let last = states.last().expect("initial state is always present");
        assert_eq!(last.values, outcome.value.values(), "{} replay diverged", algorithm);
    }
}

#[test]
fn test_kruskal_and_prim_agree_on_weight() {
    let mut graph = Graph::new();
    let ids: Vec<NodeId> = (0..4).map(|i| graph.add_node(i.to_string()).value).collect();
    let weighted = [(0, 1, 4), (1, 2, 1), (2, 3, 2), (0, 3, 5), (0, 2, 3)];
    for (a, b, w) in weighted {
        let edge = graph.add_edge(ids[a], ids[b], false).expect("endpoints exist").value;
        graph.set_weight(edge, w).expect("non-negative weight");
    }

    let kruskal = algorithms::kruskal(&graph).value;
    let prim = algorithms::prim(&graph).value;
    assert_eq!(kruskal.edges.len(), 3);
    assert_eq!(prim.edges.len(), 3);
    assert_eq!(kruskal.total_weight, 6);
    assert_eq!(prim.total_weight, 6);
}

#[test]
fn test_negative_weight_rejected() {
    let mut graph = Graph::new();
    let a = graph.add_node("a").value;
    let b = graph.add_node("b").value;
    let edge = graph.add_edge(a, b, false).expect("endpoints exist").value;

    let err = graph.set_weight(edge, -3).unwrap_err();
    assert!(matches!(err, VizError::InvalidArgument(_)));
    assert_eq!(graph.edge(edge).and_then(|e| e.weight), None);
}

#[test]
fn test_session_script_builds_history() {
    let mut session = Session::with_seed(11);
    let script = "\
# build a small tree
bst insert 5
bst insert 3
bst search 3
heap insert 2
stack push top
";
    for line in script.lines() {
        session.execute_line(line).expect("every line is valid");
    }

    assert_eq!(session.history().len(), 5);
    assert_eq!(session.bst.in_order(), vec![3, 5]);
    assert_eq!(session.history().get(2).map(|e| e.kind()), Some(StructureKind::Bst));
    assert_eq!(session.history().latest().map(|e| e.kind()), Some(StructureKind::Stack));
}

#[test]
fn test_session_failure_leaves_history_alone() {
    let mut session = Session::with_seed(1);
    session.execute_line("list add a").expect("valid");
    assert!(session.execute_line("list remove 4").is_err());
    assert!(session.execute_line("nonsense").is_err());
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_session_imports_graph_file() {
    let path = std::env::temp_dir().join(format!("structviz-import-{}.txt", std::process::id()));
    fs::write(&path, "0 1 0\n0 0 1\n1 0 0\n").expect("temp dir is writable");

    let mut session = Session::with_seed(2);
    let report = session
        .execute_line(&format!("graph import matrix {}", path.display()))
        .expect("import succeeds")
        .expect("not a comment");
    fs::remove_file(&path).ok();

    assert_eq!(session.graph.node_count(), 3);
    assert_eq!(session.graph.edge_count(), 3);
    assert!(report.steps.of_kind(StepKind::Add).count() >= 6);

    let entry = session.history().latest().expect("import recorded");
    match &entry.after {
        StructureSnapshot::Graph(g) => assert_eq!(g.node_count(), 3),
        other => panic!("unexpected snapshot {:?}", other.kind()),
    }
}

#[test]
fn test_session_bad_import_keeps_current_graph() {
    let path = std::env::temp_dir().join(format!("structviz-bad-{}.txt", std::process::id()));
    fs::write(&path, "0: 1\n1 2\n").expect("temp dir is writable");

    let mut session = Session::with_seed(4);
    for line in ["graph node a", "graph node b", "graph edge 0 1"] {
        session.execute_line(line).expect("valid");
    }
    let history_len = session.history().len();

    let err = session
        .execute_line(&format!("graph import list {}", path.display()))
        .unwrap_err();
    fs::remove_file(&path).ok();

    assert!(matches!(err, VizError::Parse { line: 2, .. }));
    assert_eq!(session.graph.node_count(), 2);
    assert_eq!(session.graph.edge_count(), 1);
    assert_eq!(session.graph.nodes()[0].label, "a");
    assert_eq!(session.history().len(), history_len);

    let missing = session.execute_line("graph import edges /nonexistent/structviz.txt");
    assert!(matches!(missing, Err(VizError::InvalidArgument(_))));
    assert_eq!(session.graph.edge_count(), 1);
}

#[test]
fn test_session_sort_updates_array() {
    let mut session = Session::with_seed(3);
    session.execute_line("sort set 5 2 9 1").expect("valid");
    session.execute_line("sort merge").expect("valid");
    assert_eq!(session.array.values(), &[1, 2, 5, 9]);
}

#[derive(Default)]
struct Collect {
    steps: Vec<Step>,
    finished: Option<bool>,
}

impl Renderer for Collect {
    fn render(&mut self, step: &Step) {
        self.steps.push(step.clone());
    }

    fn finished(&mut self, _label: &str, completed: bool) {
        self.finished = Some(completed);
    }
}

#[test]
fn test_player_delivers_every_step_in_order() {
    let mut bst = BinarySearchTree::new();
    for v in [4, 2, 6] {
        bst.insert(v);
    }
    let outcome = bst.insert(5);
    let expected = outcome.steps.steps().to_vec();

    let mut player = StepPlayer::new(PlayerConfig::with_interval_ms(10));
    let mut collect = Collect::default();
    let report = player.play(outcome.steps, &mut collect).expect("player idle");

    assert_eq!(collect.steps, expected);
    assert_eq!(collect.finished, Some(true));
    assert_eq!(report.emitted, expected.len());
}

#[test]
fn test_player_cancel_stops_pending_steps() {
    let mut heap = Heap::new();
    for v in [1, 2, 3, 4, 5] {
        heap.insert(v);
    }
    let outcome = heap.remove_max();
    let total = outcome.steps.len();
    assert!(total > 1);

    let mut player = StepPlayer::new(PlayerConfig::with_interval_ms(100));
    let t0 = Instant::now();
    player.start(outcome.steps, t0).expect("player idle");
    assert!(player.poll(t0).is_some());
    assert!(player.poll(t0 + Duration::from_millis(10)).is_none());

    assert_eq!(player.cancel(), total - 1);
    assert!(!player.is_active());
    assert!(player.last_report().map(|r| r.cancelled).unwrap_or(false));
}
