//! Binary search tree stored as an arena keyed by [`NodeId`]
//!
//! Nodes hold only child links; there are no parent back-pointers. Anything
//! that needs a parent re-descends from the root or threads it through the
//! recursion.
//!
//! Duplicates route right: a value equal to a node's value descends into its
//! right subtree. Misses on `delete`/`search` are reported with a
//! `warn("not found")` step and leave the tree untouched.

use crate::step::{NodeId, Outcome, Phase, Step, StepKind, StepRecorder};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BstNode {
    pub value: i64,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

/// Which child link of a parent changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn name(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BinarySearchTree {
    nodes: FxHashMap<NodeId, BstNode>,
    root: Option<NodeId>,
    next_id: u32,
}

impl BinarySearchTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&BstNode> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn value_of(&self, id: NodeId) -> Option<i64> {
        self.nodes.get(&id).map(|n| n.value)
    }

    fn visit(&self, id: NodeId, rec: &mut StepRecorder) {
        if let Some(node) = self.nodes.get(&id) {
            rec.record(Step::new(StepKind::Visit).node(id).int(node.value));
        }
    }

    fn relink(parent: NodeId, side: Side, child: Option<NodeId>, rec: &mut StepRecorder) {
        let step = Step::new(StepKind::Relink).node(parent);
        let step = match child {
            Some(child) => step.node(child),
            None => step,
        };
        rec.record(step.text(side.name()));
    }

    fn set_child(&mut self, parent: NodeId, side: Side, child: Option<NodeId>) {
        if let Some(node) = self.nodes.get_mut(&parent) {
            match side {
                Side::Left => node.left = child,
                Side::Right => node.right = child,
            }
        }
    }

    /// Descend from the root and attach a new leaf
    pub fn insert(&mut self, value: i64) -> Outcome<NodeId> {
        let mut rec = StepRecorder::new();
        let id = NodeId(self.next_id);
        self.next_id += 1;

        let mut parent = None;
        let mut current = self.root;
        while let Some(cur) = current {
            self.visit(cur, &mut rec);
            let node = &self.nodes[&cur];
            let side = if value < node.value { Side::Left } else { Side::Right };
            current = match side {
                Side::Left => node.left,
                Side::Right => node.right,
            };
            parent = Some((cur, side));
        }

        self.nodes.insert(
            id,
            BstNode {
                value,
                left: None,
                right: None,
            },
        );
        rec.record(Step::new(StepKind::Insert).node(id).int(value));

        match parent {
            Some((p, side)) => {
                self.set_child(p, side, Some(id));
                Self::relink(p, side, Some(id), &mut rec);
            }
            None => self.root = Some(id),
        }
        Outcome::new(id, rec.finish("bst insert"))
    }

    /// Node holding `value`, visiting every node on the path
    pub fn search(&self, value: i64) -> Outcome<Option<NodeId>> {
        let mut rec = StepRecorder::new();
        let mut current = self.root;
        while let Some(cur) = current {
            self.visit(cur, &mut rec);
            let node = &self.nodes[&cur];
            if node.value == value {
                rec.record(Step::new(StepKind::Found).node(cur).int(value));
                return Outcome::new(Some(cur), rec.finish("bst search"));
            }
            current = if value < node.value { node.left } else { node.right };
        }
        rec.record(Step::warn("not found"));
        Outcome::new(None, rec.finish("bst search"))
    }

    /// Remove the first node on the search path holding `value`
    ///
    /// A node with two children takes its in-order successor's value, and the
    /// successor's own node is unlinked from the right subtree. The value is
    /// `true` when something was removed.
    pub fn delete(&mut self, value: i64) -> Outcome<bool> {
        let mut rec = StepRecorder::new();
        let mut parent: Option<(NodeId, Side)> = None;
        let mut current = self.root;

        while let Some(cur) = current {
            self.visit(cur, &mut rec);
            let node = &self.nodes[&cur];
            if node.value == value {
                break;
            }
            let side = if value < node.value { Side::Left } else { Side::Right };
            current = match side {
                Side::Left => node.left,
                Side::Right => node.right,
            };
            parent = Some((cur, side));
        }

        let Some(target) = current else {
            rec.record(Step::warn("not found"));
            return Outcome::new(false, rec.finish("bst delete"));
        };
        rec.record(Step::new(StepKind::Highlight).node(target).int(value).phase(Phase::Start));

        let (left, right) = {
            let node = &self.nodes[&target];
            (node.left, node.right)
        };

        match (left, right) {
            (Some(_), Some(right)) => {
                if let Some(successor) = self.detach_min(target, right, &mut rec) {
                    if let Some(node) = self.nodes.get_mut(&target) {
                        node.value = successor.value;
                    }
                    rec.record(Step::new(StepKind::Update).node(target).int(successor.value));
                }
                rec.record(Step::new(StepKind::Highlight).node(target).phase(Phase::End));
            }
            (only, None) | (None, only) => {
                self.nodes.remove(&target);
                rec.record(Step::new(StepKind::Remove).node(target).int(value));
                self.replace_link(parent, only, &mut rec);
            }
        }
        Outcome::new(true, rec.finish("bst delete"))
    }

    /// Point `parent`'s link (or the root) at `child`
    fn replace_link(&mut self, parent: Option<(NodeId, Side)>, child: Option<NodeId>, rec: &mut StepRecorder) {
        match parent {
            Some((p, side)) => {
                self.set_child(p, side, child);
                Self::relink(p, side, child, rec);
            }
            None => self.root = child,
        }
    }

    /// Unlink the leftmost node of the subtree at `subtree`, whose parent is
    /// `owner` (on its right side); returns the removed node
    fn detach_min(&mut self, owner: NodeId, subtree: NodeId, rec: &mut StepRecorder) -> Option<BstNode> {
        let mut parent = (owner, Side::Right);
        let mut current = subtree;
        self.visit(current, rec);
        while let Some(left) = self.nodes[&current].left {
            parent = (current, Side::Left);
            current = left;
            self.visit(current, rec);
        }

        let removed = self.nodes.remove(&current)?;
        rec.record(Step::new(StepKind::Remove).node(current).int(removed.value));
        self.replace_link(Some(parent), removed.right, rec);
        Some(removed)
    }

    pub fn clear(&mut self) -> Outcome<()> {
        let mut rec = StepRecorder::new();
        for id in self.preorder() {
            rec.record(Step::new(StepKind::Remove).node(id));
        }
        self.nodes.clear();
        self.root = None;
        Outcome::new((), rec.finish("bst clear"))
    }

    /// Node ids in pre-order (root, left, right)
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            let node = &self.nodes[&id];
            if let Some(r) = node.right {
                stack.push(r);
            }
            if let Some(l) = node.left {
                stack.push(l);
            }
        }
        out
    }

    /// `(id, depth)` pairs in pre-order, for drawing
    pub fn preorder_with_depth(&self) -> Vec<(NodeId, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|r| (r, 0)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            let node = &self.nodes[&id];
            if let Some(r) = node.right {
                stack.push((r, depth + 1));
            }
            if let Some(l) = node.left {
                stack.push((l, depth + 1));
            }
        }
        out
    }

    /// Values in sorted (in-order) order
    pub fn in_order(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut current = self.root;
        while current.is_some() || !stack.is_empty() {
            while let Some(id) = current {
                stack.push(id);
                current = self.nodes[&id].left;
            }
            if let Some(id) = stack.pop() {
                let node = &self.nodes[&id];
                out.push(node.value);
                current = node.right;
            }
        }
        out
    }

    pub fn height(&self) -> usize {
        self.preorder_with_depth()
            .iter()
            .map(|(_, d)| d + 1)
            .max()
            .unwrap_or(0)
    }

    /// Every reachable node is in the arena and every arena node is reachable
    pub fn is_consistent(&self) -> bool {
        let reachable = self.preorder();
        reachable.len() == self.nodes.len()
            && reachable.iter().all(|id| self.nodes.contains_key(id))
    }

    pub fn estimated_size(&self) -> usize {
        self.nodes.len() * (std::mem::size_of::<NodeId>() + std::mem::size_of::<BstNode>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(values: &[i64]) -> BinarySearchTree {
        let mut tree = BinarySearchTree::new();
        for &v in values {
            tree.insert(v);
        }
        tree
    }

    fn visited_values(tree: &BinarySearchTree, steps: &crate::step::StepSequence) -> Vec<i64> {
        steps
            .visited_nodes()
            .into_iter()
            .filter_map(|id| tree.value_of(id))
            .collect()
    }

    #[test]
    fn test_search_visit_path() {
        let tree = tree_of(&[5, 3, 8, 1]);
        let out = tree.search(8);
        assert!(out.value.is_some());
        assert_eq!(visited_values(&tree, &out.steps), vec![5, 8]);
        assert_eq!(out.steps.of_kind(StepKind::Found).count(), 1);
    }

    #[test]
    fn test_duplicates_go_right() {
        let tree = tree_of(&[5, 5]);
        let root = tree.root().unwrap();
        let right = tree.node(root).unwrap().right;
        assert!(right.is_some());
        assert_eq!(tree.value_of(right.unwrap()), Some(5));
    }

    #[test]
    fn test_delete_two_children_uses_successor() {
        let mut tree = tree_of(&[5, 3, 8, 7, 9, 6]);
        let root = tree.root().unwrap();
        let out = tree.delete(5);
        assert!(out.value);

        // Root keeps its id but takes the successor's value
        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.value_of(root), Some(6));
        assert_eq!(tree.in_order(), vec![3, 6, 7, 8, 9]);
        assert!(tree.is_consistent());
        assert!(out.steps.of_kind(StepKind::Update).count() == 1);
        assert!(out.steps.of_kind(StepKind::Remove).count() == 1);
    }

    #[test]
    fn test_delete_successor_with_right_child() {
        let mut tree = tree_of(&[10, 5, 20, 15, 17]);
        tree.delete(10);
        assert_eq!(tree.in_order(), vec![5, 15, 17, 20]);
        assert!(tree.is_consistent());
    }

    #[test]
    fn test_delete_missing_warns_and_keeps_tree() {
        let mut tree = tree_of(&[2, 1, 3]);
        let out = tree.delete(4);
        assert!(!out.value);
        assert!(out.steps.has_warning());
        assert_eq!(tree.in_order(), vec![1, 2, 3]);

        let mut empty = BinarySearchTree::new();
        assert!(empty.delete(1).steps.has_warning());
    }

    #[test]
    fn test_delete_root_leaf() {
        let mut tree = tree_of(&[4]);
        tree.delete(4);
        assert!(tree.root().is_none());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_insert_emits_visits_then_insert() {
        let mut tree = tree_of(&[5, 3]);
        let out = tree.insert(4);
        assert_eq!(
            out.steps.kinds(),
            vec![StepKind::Visit, StepKind::Visit, StepKind::Insert, StepKind::Relink]
        );
    }
}
