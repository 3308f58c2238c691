//! Traversals and minimum spanning trees over a [`Graph`]
//!
//! None of these functions mutate the graph; they only read it and record steps.
//! Neighbours are always examined in edge insertion order, which makes every
//! sequence deterministic.
//!
//! Direction handling:
//! - BFS/DFS leave a node along its outgoing directed edges and along both
//!   directions of undirected edges
//! - Kruskal/Prim treat every edge as undirected

use super::{Graph, GraphEdge};
use crate::errors::{Result, VizError};
use crate::step::{EdgeId, NodeId, Outcome, Payload, Step, StepKind, StepRecorder};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use tracing::debug;

/// Edges chosen for a spanning tree (or forest) and their summed weight
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MstOutcome {
    pub edges: Vec<EdgeId>,
    pub total_weight: u64,
}

fn check_start(graph: &Graph, start: NodeId) -> Result<()> {
    if graph.contains_node(start) {
        Ok(())
    } else {
        Err(VizError::not_found(format!("start node {}", start)))
    }
}

fn discover(edge: &GraphEdge, node: NodeId) -> Step {
    Step::new(StepKind::Discover).edge(edge.id).node(node)
}

/// Breadth-first traversal; `visit` on dequeue, `discover` when a neighbour is first seen
pub fn bfs(graph: &Graph, start: NodeId) -> Result<Outcome<Vec<NodeId>>> {
    check_start(graph, start)?;
    let mut rec = StepRecorder::new();
    let mut order = Vec::new();
    let mut seen = FxHashSet::default();
    let mut frontier = VecDeque::new();

    seen.insert(start);
    frontier.push_back(start);

    while let Some(node) = frontier.pop_front() {
        rec.record(Step::new(StepKind::Visit).node(node));
        order.push(node);

        for edge in graph.edges() {
            let Some(next) = edge.leads_from(node) else {
                continue;
            };
            if seen.insert(next) {
                rec.record(discover(edge, next));
                frontier.push_back(next);
            }
        }
    }

    debug!(start = %start, visited = order.len(), "bfs");
    Ok(Outcome::new(order, rec.finish("graph bfs")))
}

/// Recursive pre-order depth-first traversal
pub fn dfs(graph: &Graph, start: NodeId) -> Result<Outcome<Vec<NodeId>>> {
    check_start(graph, start)?;
    let mut rec = StepRecorder::new();
    let mut order = Vec::new();
    let mut seen = FxHashSet::default();

    dfs_from(graph, start, &mut seen, &mut order, &mut rec);

    debug!(start = %start, visited = order.len(), "dfs");
    Ok(Outcome::new(order, rec.finish("graph dfs")))
}

fn dfs_from(
    graph: &Graph,
    node: NodeId,
    seen: &mut FxHashSet<NodeId>,
    order: &mut Vec<NodeId>,
    rec: &mut StepRecorder,
) {
    seen.insert(node);
    rec.record(Step::new(StepKind::Visit).node(node));
    order.push(node);

    for edge in graph.edges() {
        let Some(next) = edge.leads_from(node) else {
            continue;
        };
        if !seen.contains(&next) {
            rec.record(discover(edge, next));
            dfs_from(graph, next, seen, order, rec);
        }
    }
}

/// Union-find keyed by node id; attach-on-union with path compression
struct DisjointSet {
    parent: FxHashMap<NodeId, NodeId>,
}

impl DisjointSet {
    fn new(graph: &Graph) -> Self {
        DisjointSet {
            parent: graph.nodes().iter().map(|n| (n.id, n.id)).collect(),
        }
    }

    fn find(&mut self, node: NodeId) -> NodeId {
        let mut root = node;
        while let Some(&p) = self.parent.get(&root) {
            if p == root {
                break;
            }
            root = p;
        }

        let mut current = node;
        while current != root {
            let next = self.parent.get(&current).copied().unwrap_or(root);
            self.parent.insert(current, root);
            current = next;
        }
        root
    }

    /// Attach the first root under the second; false when already joined
    fn union(&mut self, a: NodeId, b: NodeId) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        self.parent.insert(ra, rb);
        true
    }
}

fn accept(edge: &GraphEdge) -> Step {
    Step::new(StepKind::Accept)
        .edge(edge.id)
        .payload(Payload::Weight(edge.weight.unwrap_or(0)))
}

/// Kruskal over edges stably sorted by weight; unweighted edges weigh 0
pub fn kruskal(graph: &Graph) -> Outcome<MstOutcome> {
    let mut rec = StepRecorder::new();
    let mut sorted: Vec<&GraphEdge> = graph.edges().iter().collect();
    sorted.sort_by_key(|e| e.cost());

    let mut sets = DisjointSet::new(graph);
    let mut mst = MstOutcome::default();

    for edge in sorted {
        if sets.union(edge.from, edge.to) {
            rec.record(accept(edge));
            mst.edges.push(edge.id);
            mst.total_weight += edge.cost();
        } else {
            rec.record(Step::new(StepKind::Reject).edge(edge.id));
        }
    }

    debug!(accepted = mst.edges.len(), weight = mst.total_weight, "kruskal");
    Outcome::new(mst, rec.finish("graph kruskal"))
}

/// Prim from the first node added; an empty graph yields an empty tree
pub fn prim(graph: &Graph) -> Outcome<MstOutcome> {
    match graph.nodes().first() {
        Some(first) => prim_tree(graph, first.id),
        None => Outcome::new(MstOutcome::default(), StepRecorder::new().finish("graph prim")),
    }
}

/// Prim from a chosen start node
pub fn prim_from(graph: &Graph, start: NodeId) -> Result<Outcome<MstOutcome>> {
    check_start(graph, start)?;
    Ok(prim_tree(graph, start))
}

fn prim_tree(graph: &Graph, start: NodeId) -> Outcome<MstOutcome> {
    let mut rec = StepRecorder::new();
    let mut visited = FxHashSet::default();
    let mut mst = MstOutcome::default();
    // (weight, push order, edge position); push order keeps equal weights FIFO
    let mut frontier: BinaryHeap<Reverse<(u64, usize, usize)>> = BinaryHeap::new();
    let mut pushed = 0usize;

    let mut expand = |node: NodeId,
                      visited: &FxHashSet<NodeId>,
                      frontier: &mut BinaryHeap<Reverse<(u64, usize, usize)>>| {
        for (pos, edge) in graph.edges().iter().enumerate() {
            if let Some(other) = edge.other(node) {
                if !visited.contains(&other) {
                    frontier.push(Reverse((edge.cost(), pushed, pos)));
                    pushed += 1;
                }
            }
        }
    };

    visited.insert(start);
    rec.record(Step::new(StepKind::Visit).node(start));
    expand(start, &visited, &mut frontier);

    while let Some(Reverse((_, _, pos))) = frontier.pop() {
        let edge = &graph.edges()[pos];
        let from_in = visited.contains(&edge.from);
        let to_in = visited.contains(&edge.to);
        if from_in && to_in {
            rec.record(Step::new(StepKind::Reject).edge(edge.id));
            continue;
        }

        let reached = if from_in { edge.to } else { edge.from };
        rec.record(accept(edge));
        mst.edges.push(edge.id);
        mst.total_weight += edge.cost();

        visited.insert(reached);
        rec.record(Step::new(StepKind::Visit).node(reached));
        expand(reached, &visited, &mut frontier);
    }

    debug!(start = %start, accepted = mst.edges.len(), weight = mst.total_weight, "prim");
    Outcome::new(mst, rec.finish("graph prim"))
}
