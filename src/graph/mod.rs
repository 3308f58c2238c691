//! Graph core: labelled nodes and optionally weighted, optionally directed edges
//!
//! Nodes and edges keep the order they were added in; that order is what the
//! traversal and MST algorithms iterate over, and what breaks weight ties.
//!
//! # Invariants
//!
//! - No two edges share `(from, to, directed)`; adding one again returns the
//!   existing id
//! - Removing a node removes every incident edge
//! - A weight of `0` means "unset"; negative weights are rejected
//!
//! Submodules:
//! - [`algorithms`]: BFS, DFS, Kruskal, Prim
//! - [`import`]: adjacency matrix / adjacency list / edge list parsers

pub mod algorithms;
pub mod import;

use crate::errors::{Result, VizError};
use crate::step::{EdgeId, NodeId, Outcome, Payload, Step, StepKind, StepRecorder};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: NodeId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub weight: Option<u32>,
    pub directed: bool,
}

impl GraphEdge {
    /// Weight used for ordering; unset counts as 0
    pub fn cost(&self) -> u64 {
        u64::from(self.weight.unwrap_or(0))
    }

    /// The endpoint opposite `node`, if `node` is an endpoint
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if self.from == node {
            Some(self.to)
        } else if self.to == node {
            Some(self.from)
        } else {
            None
        }
    }

    /// Endpoint reached when leaving `node` along this edge, honouring direction
    pub fn leads_from(&self, node: NodeId) -> Option<NodeId> {
        if self.from == node {
            Some(self.to)
        } else if !self.directed && self.to == node {
            Some(self.from)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    index: FxHashMap<NodeId, usize>,
    next_node: u32,
    next_edge: u32,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn edge(&self, id: EdgeId) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Node whose label is `label`, first added wins
    pub fn find_by_label(&self, label: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.label == label).map(|n| n.id)
    }

    /// Edges touching `node` in insertion order
    pub fn incident_edges(&self, node: NodeId) -> impl Iterator<Item = &GraphEdge> {
        self.edges
            .iter()
            .filter(move |e| e.from == node || e.to == node)
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id, i))
            .collect();
    }

    pub fn add_node(&mut self, label: impl Into<String>) -> Outcome<NodeId> {
        let mut rec = StepRecorder::new();
        let id = NodeId(self.next_node);
        self.next_node += 1;
        let label = label.into();

        rec.record(Step::new(StepKind::Add).node(id).text(label.clone()));
        self.index.insert(id, self.nodes.len());
        self.nodes.push(GraphNode { id, label });
        Outcome::new(id, rec.finish("graph add node"))
    }

    /// Connect two existing nodes; an identical edge is returned instead of duplicated
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, directed: bool) -> Result<Outcome<EdgeId>> {
        for endpoint in [from, to] {
            if !self.contains_node(endpoint) {
                return Err(VizError::not_found(format!("node {}", endpoint)));
            }
        }

        let mut rec = StepRecorder::new();
        if let Some(existing) = self
            .edges
            .iter()
            .find(|e| e.from == from && e.to == to && e.directed == directed)
        {
            rec.record(Step::new(StepKind::Highlight).edge(existing.id));
            return Ok(Outcome::new(existing.id, rec.finish("graph add edge")));
        }

        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        self.edges.push(GraphEdge {
            id,
            from,
            to,
            weight: None,
            directed,
        });
        rec.record(Step::new(StepKind::Add).edge(id).node(from).node(to));
        Ok(Outcome::new(id, rec.finish("graph add edge")))
    }

    /// Remove a node and every edge incident to it
    pub fn remove_node(&mut self, id: NodeId) -> Result<Outcome<GraphNode>> {
        let position = *self
            .index
            .get(&id)
            .ok_or_else(|| VizError::not_found(format!("node {}", id)))?;

        let mut rec = StepRecorder::new();
        for edge in self.edges.iter().filter(|e| e.from == id || e.to == id) {
            rec.record(Step::new(StepKind::Remove).edge(edge.id));
        }
        self.edges.retain(|e| e.from != id && e.to != id);

        let node = self.nodes.remove(position);
        self.rebuild_index();
        rec.record(Step::new(StepKind::Remove).node(id).text(node.label.clone()));
        Ok(Outcome::new(node, rec.finish("graph remove node")))
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Outcome<GraphEdge>> {
        let position = self
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| VizError::not_found(format!("edge {}", id)))?;

        let mut rec = StepRecorder::new();
        let edge = self.edges.remove(position);
        rec.record(Step::new(StepKind::Remove).edge(id));
        Ok(Outcome::new(edge, rec.finish("graph remove edge")))
    }

    /// Set an edge weight; `0` clears it, negative values are rejected
    pub fn set_weight(&mut self, id: EdgeId, weight: i64) -> Result<Outcome<Option<u32>>> {
        if weight < 0 {
            return Err(VizError::invalid(format!("negative weight {} not allowed", weight)));
        }
        let weight = u32::try_from(weight)
            .map_err(|_| VizError::invalid(format!("weight {} too large", weight)))?;

        let edge = self
            .edges
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| VizError::not_found(format!("edge {}", id)))?;
        edge.weight = (weight != 0).then_some(weight);

        let mut rec = StepRecorder::new();
        let step = Step::new(StepKind::Status).edge(id);
        rec.record(match edge.weight {
            Some(w) => step.payload(Payload::Weight(w)),
            None => step.text("unweighted"),
        });
        Ok(Outcome::new(edge.weight, rec.finish("graph set weight")))
    }

    pub fn clear(&mut self) -> Outcome<()> {
        let mut rec = StepRecorder::new();
        for edge in &self.edges {
            rec.record(Step::new(StepKind::Remove).edge(edge.id));
        }
        for node in &self.nodes {
            rec.record(Step::new(StepKind::Remove).node(node.id));
        }
        *self = Graph::default();
        Outcome::new((), rec.finish("graph clear"))
    }

    pub fn estimated_size(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| std::mem::size_of::<GraphNode>() + n.label.len())
            .sum::<usize>()
            + self.edges.len() * std::mem::size_of::<GraphEdge>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> (Graph, [NodeId; 3]) {
        let mut g = Graph::new();
        let a = g.add_node("a").value;
        let b = g.add_node("b").value;
        let c = g.add_node("c").value;
        g.add_edge(a, b, false).unwrap();
        g.add_edge(b, c, false).unwrap();
        g.add_edge(c, a, true).unwrap();
        (g, [a, b, c])
    }

    #[test]
    fn test_duplicate_edge_returns_existing() {
        let (mut g, [a, b, _]) = triangle();
        let first = g.edges()[0].id;
        let again = g.add_edge(a, b, false).unwrap();
        assert_eq!(again.value, first);
        assert_eq!(g.edge_count(), 3);

        // Same endpoints but directed is a different edge
        g.add_edge(a, b, true).unwrap();
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn test_remove_node_cascades() {
        let (mut g, [a, b, c]) = triangle();
        let out = g.remove_node(a).unwrap();
        assert_eq!(out.value.label, "a");
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edges()[0].from, b);
        assert_eq!(g.edges()[0].to, c);
        assert!(g.remove_node(a).unwrap_err().is_not_found());
    }

    #[test]
    fn test_set_weight_rules() {
        let (mut g, _) = triangle();
        let e = g.edges()[0].id;
        assert_eq!(g.set_weight(e, 4).unwrap().value, Some(4));
        assert_eq!(g.set_weight(e, 0).unwrap().value, None);
        assert!(matches!(g.set_weight(e, -1), Err(VizError::InvalidArgument(_))));
        assert_eq!(g.edge(e).unwrap().weight, None);
    }

    #[test]
    fn test_add_edge_unknown_node() {
        let (mut g, [a, ..]) = triangle();
        assert!(g.add_edge(a, NodeId(99), false).is_err());
    }
}
