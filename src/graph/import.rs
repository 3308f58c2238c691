//! Plain-text graph import
//!
//! Three formats, each parsed completely before any node is created, so a bad
//! line aborts the import and no partial graph is returned:
//!
//! ```text
//! adjacency matrix      adjacency list      edge list
//! 0 1 1                 0: 1 2              0 1
//! 0 0 1                 1:                  1->2
//! 0 0 0                 2:                  2<->0
//! ```
//!
//! Ids read from the text become node labels. Nodes are created in ascending id
//! order, so the k-th smallest id gets `NodeId(k)`. Every imported edge is
//! directed; `u<->v` expands to the two edges `u->v` and `v->u`.

use super::Graph;
use crate::errors::{Result, VizError};
use crate::step::NodeId;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use tracing::info;

fn parse_error(line: usize, message: impl Into<String>) -> VizError {
    VizError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_id(token: &str, line: usize) -> Result<u32> {
    token
        .trim()
        .parse::<u32>()
        .map_err(|_| parse_error(line, format!("'{}' is not a node id", token.trim())))
}

/// Create one node per id (ascending) and add the directed edges in order
fn build(ids: BTreeSet<u32>, edges: &[(u32, u32)]) -> Result<Graph> {
    let mut graph = Graph::new();
    let mut by_id: FxHashMap<u32, NodeId> = FxHashMap::default();
    for id in ids {
        by_id.insert(id, graph.add_node(id.to_string()).value);
    }
    for (u, v) in edges {
        let (Some(&from), Some(&to)) = (by_id.get(u), by_id.get(v)) else {
            continue;
        };
        graph.add_edge(from, to, true)?;
    }
    Ok(graph)
}

/// `n` lines of `n` whitespace-separated `0`/`1` entries; row `i` column `j` set
/// means an edge `i -> j`
pub fn parse_adjacency_matrix(text: &str) -> Result<Graph> {
    let rows: Vec<&str> = text.trim().lines().collect();
    let n = rows.len();
    if text.trim().is_empty() {
        return Err(parse_error(1, "matrix is empty"));
    }

    let mut edges = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let line = i + 1;
        let cells: Vec<&str> = row.split_whitespace().collect();
        if cells.len() != n {
            return Err(parse_error(
                line,
                format!("matrix is not square: {} entries, expected {}", cells.len(), n),
            ));
        }
        for (j, cell) in cells.iter().enumerate() {
            match *cell {
                "0" => {}
                "1" => edges.push((i as u32, j as u32)),
                other => {
                    return Err(parse_error(line, format!("entry '{}' must be 0 or 1", other)))
                }
            }
        }
    }

    let graph = build((0..n as u32).collect(), &edges)?;
    info!(nodes = graph.node_count(), edges = graph.edge_count(), "imported adjacency matrix");
    Ok(graph)
}

/// One `<id>: <neighbour ids...>` per line; blank lines are skipped
pub fn parse_adjacency_list(text: &str) -> Result<Graph> {
    let mut ids = BTreeSet::new();
    let mut edges = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (head, tail) = trimmed
            .split_once(':')
            .ok_or_else(|| parse_error(line, "expected '<id>: <neighbours>'"))?;

        let node = parse_id(head, line)?;
        ids.insert(node);
        for token in tail.split_whitespace() {
            let neighbour = parse_id(token, line)?;
            ids.insert(neighbour);
            edges.push((node, neighbour));
        }
    }

    let graph = build(ids, &edges)?;
    info!(nodes = graph.node_count(), edges = graph.edge_count(), "imported adjacency list");
    Ok(graph)
}

/// One edge per line: `u v`, `u->v` or `u<->v`
pub fn parse_edge_list(text: &str) -> Result<Graph> {
    let mut ids = BTreeSet::new();
    let mut edges = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (u, v, both) = if let Some((a, b)) = trimmed.split_once("<->") {
            (parse_id(a, line)?, parse_id(b, line)?, true)
        } else if let Some((a, b)) = trimmed.split_once("->") {
            (parse_id(a, line)?, parse_id(b, line)?, false)
        } else {
            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() != 2 {
                return Err(parse_error(line, "expected 'u v', 'u->v' or 'u<->v'"));
            }
            (parse_id(parts[0], line)?, parse_id(parts[1], line)?, false)
        };

        ids.insert(u);
        ids.insert(v);
        edges.push((u, v));
        if both {
            edges.push((v, u));
        }
    }

    let graph = build(ids, &edges)?;
    info!(nodes = graph.node_count(), edges = graph.edge_count(), "imported edge list");
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(graph: &Graph) -> Vec<&str> {
        graph.nodes().iter().map(|n| n.label.as_str()).collect()
    }

    #[test]
    fn test_matrix_import() {
        let g = parse_adjacency_matrix("0 1 1\n0 0 1\n0 0 0\n").unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert!(g.edges().iter().all(|e| e.directed));
    }

    #[test]
    fn test_matrix_rejects_bad_shape_and_values() {
        let err = parse_adjacency_matrix("0 1\n0 0 1\n").unwrap_err();
        assert!(matches!(err, VizError::Parse { line: 2, .. }));

        let err = parse_adjacency_matrix("0 2\n0 0\n").unwrap_err();
        assert!(matches!(err, VizError::Parse { line: 1, .. }));

        assert!(parse_adjacency_matrix("   ").is_err());
    }

    #[test]
    fn test_list_creates_neighbour_only_nodes() {
        let g = parse_adjacency_list("3: 7\n\n1: 3\n").unwrap();
        assert_eq!(labels(&g), vec!["1", "3", "7"]);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_list_rejects_missing_colon() {
        let err = parse_adjacency_list("0: 1\n1 2\n").unwrap_err();
        assert_eq!(
            err,
            VizError::Parse {
                line: 2,
                message: "expected '<id>: <neighbours>'".to_string()
            }
        );
    }

    #[test]
    fn test_edge_list_formats() {
        let g = parse_edge_list("0 1\n1->2\n2<->0\n").unwrap();
        assert_eq!(labels(&g), vec!["0", "1", "2"]);
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn test_edge_list_duplicates_collapse() {
        let g = parse_edge_list("0 1\n0->1\n").unwrap();
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_edge_list_bad_token_is_all_or_nothing() {
        let err = parse_edge_list("0 1\n1 -> x\n").unwrap_err();
        assert!(matches!(err, VizError::Parse { line: 2, .. }));
        assert!(parse_edge_list("0 1 2").is_err());
    }
}
