// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! View trees: a search tree annotated with how each node should be drawn.

use std::fmt;

use strum_macros::{Display, EnumString};

use crate::store::BacktrackNode;

/// Whether a node, and what is below it, is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum NodeState {
    /// Shown with its children.
    #[default]
    Open,
    /// Shown, but its children are hidden.
    Closed,
    /// Not shown at all.
    Ignored,
}

/// How wide a node is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ViewType {
    #[default]
    Full,
    Compact,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewNode {
    pub node_id: u64,
    pub value: Option<u32>,
    pub state: NodeState,
    pub view_type: ViewType,
    /// Distance from the root.
    pub depth: usize,
    children: Vec<usize>,
}

impl ViewNode {
    /// Arena indices of the children, in order.
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena of view nodes in preorder; the root is at index 0.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTree {
    nodes: Vec<ViewNode>,
}

impl ViewTree {
    /// Mirror `root`, every node open and full width.
    pub fn from_tree(root: &BacktrackNode) -> Self {
        let count = usize::try_from(root.node_count()).unwrap_or(0);
        let mut nodes = Vec::with_capacity(count);
        Self::add(&mut nodes, root, 0);
        Self { nodes }
    }

    fn add(nodes: &mut Vec<ViewNode>, node: &BacktrackNode, depth: usize) -> usize {
        let index = nodes.len();
        nodes.push(ViewNode {
            node_id: node.id,
            value: node.value,
            state: NodeState::Open,
            view_type: ViewType::Full,
            depth,
            children: Vec::new(),
        });
        let children: Vec<usize> = node
            .children
            .iter()
            .map(|child| Self::add(nodes, child, depth + 1))
            .collect();
        nodes[index].children = children;
        index
    }

    pub const ROOT: usize = 0;

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> &ViewNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, index: usize) -> Option<&ViewNode> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> &[ViewNode] {
        &self.nodes
    }

    /// Arena index of the node created with `node_id`.
    pub fn find(&self, node_id: u64) -> Option<usize> {
        // Ids increase in preorder, which is also the arena order.
        self.nodes
            .binary_search_by_key(&node_id, |node| node.node_id)
            .ok()
    }

    /// Returns false when `index` is out of range.
    pub fn set_state(&mut self, index: usize, state: NodeState) -> bool {
        match self.nodes.get_mut(index) {
            Some(node) => {
                node.state = state;
                true
            }
            None => false,
        }
    }

    pub fn set_view_type(&mut self, index: usize, view_type: ViewType) -> bool {
        match self.nodes.get_mut(index) {
            Some(node) => {
                node.view_type = view_type;
                true
            }
            None => false,
        }
    }

    pub fn set_all_view_types(&mut self, view_type: ViewType) {
        for node in &mut self.nodes {
            node.view_type = view_type;
        }
    }

    /// Ignore every branch whose deepest leaf is not at `depth`.
    ///
    /// Leaves above `depth` are dead ends of the search, and an inner node
    /// is kept only if some leaf below it reaches exactly `depth`.
    pub fn ignore_short_branches(&mut self, depth: usize) {
        self.ignore_from(Self::ROOT, depth);
    }

    /// Returns the number of levels from `index` down to its deepest leaf, inclusive.
    fn ignore_from(&mut self, index: usize, depth: usize) -> usize {
        let level = self.nodes[index].depth;
        if self.nodes[index].children.is_empty() {
            if level < depth {
                self.nodes[index].state = NodeState::Ignored;
            }
            return 1;
        }
        let mut height = 0;
        for i in 0..self.nodes[index].children.len() {
            let child = self.nodes[index].children[i];
            height = height.max(self.ignore_from(child, depth));
        }
        if level + height != depth {
            self.nodes[index].state = NodeState::Ignored;
        }
        height + 1
    }

    /// Nodes a layout would draw: reachable through open, non-ignored nodes.
    pub fn visible_count(&self) -> usize {
        self.count_visible(Self::ROOT)
    }

    fn count_visible(&self, index: usize) -> usize {
        let node = &self.nodes[index];
        if node.state != NodeState::Open {
            return 1;
        }
        1 + node
            .children
            .iter()
            .filter(|&&c| self.nodes[c].state != NodeState::Ignored)
            .map(|&c| self.count_visible(c))
            .sum::<usize>()
    }
}

impl fmt::Display for ViewTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{:depth$}[{}] s: {}, val: ", "", node.node_id, node.state, depth = node.depth)?;
            match node.value {
                Some(value) => writeln!(f, "{}", value)?,
                None => writeln!(f, "root")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SequenceStore;

    /// R -> 1 -> {2 -> 3, 4}, 5 -> 6 -> 7
    fn sample() -> ViewTree {
        let mut store = SequenceStore::tree(3);
        for &(value, level) in &[(1, 0), (2, 1), (3, 2), (4, 1), (5, 0), (6, 1), (7, 2)] {
            store.push(value, level).unwrap();
        }
        let root = store.finish().unwrap().output.into_tree().unwrap();
        ViewTree::from_tree(&root)
    }

    #[test]
    fn test_from_tree_preorder() {
        let view = sample();
        assert_eq!(view.len(), 8);
        let ids: Vec<u64> = view.nodes().iter().map(|n| n.node_id).collect();
        assert_eq!(ids, (0..8).collect::<Vec<u64>>());
        let values: Vec<Option<u32>> = view.nodes().iter().map(|n| n.value).collect();
        assert_eq!(values[0], None);
        assert_eq!(values[4], Some(4));
        assert_eq!(view.root().children(), &[1, 5]);
        assert_eq!(view.node(3).unwrap().depth, 3);
        assert_eq!(view.find(6), Some(6));
        assert_eq!(view.find(42), None);
    }

    #[test]
    fn test_ignore_short_branches() {
        let mut view = sample();
        view.ignore_short_branches(3);
        let ignored: Vec<u64> = view
            .nodes()
            .iter()
            .filter(|n| n.state == NodeState::Ignored)
            .map(|n| n.node_id)
            .collect();
        // Leaf 4 stops at depth 2.
        assert_eq!(ignored, vec![4]);

        let mut view = sample();
        view.ignore_short_branches(2);
        // Nothing ends at depth 2 except leaf 4; every other branch is too deep.
        assert_eq!(view.root().state, NodeState::Ignored);
        assert_eq!(view.node(4).unwrap().state, NodeState::Open);
    }

    #[test]
    fn test_visible_count() {
        let mut view = sample();
        assert_eq!(view.visible_count(), 8);
        assert!(view.set_state(1, NodeState::Closed));
        assert_eq!(view.visible_count(), 5);
        assert!(view.set_state(5, NodeState::Ignored));
        assert_eq!(view.visible_count(), 2);
        assert!(!view.set_state(99, NodeState::Open));
    }

    #[test]
    fn test_display() {
        let mut view = sample();
        view.set_state(4, NodeState::Closed);
        let text = view.to_string();
        assert!(text.starts_with("[0] s: open, val: root\n [1] s: open, val: 1\n"));
        assert!(text.contains("  [4] s: closed, val: 4\n"));
    }

    #[test]
    fn test_state_names() {
        assert_eq!("compact".parse::<ViewType>().unwrap(), ViewType::Compact);
        assert_eq!(NodeState::Ignored.to_string(), "ignored");
    }
}
