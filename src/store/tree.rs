// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Explicit search trees.
//!
//! The builder keeps one open node per level of the current path. When the
//! path shrinks, finished nodes move their children into an exactly sized
//! boxed slice and attach themselves to their parent, so a completed tree
//! never carries spare capacity.

use std::fmt;
use std::mem::size_of;

use crate::error::{Result, SearchError};

/// One node of a search tree. Only the root has no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacktrackNode {
    /// Creation order; the root is 0 and ids increase in preorder.
    pub id: u64,
    pub value: Option<u32>,
    pub children: Box<[BacktrackNode]>,
}

/// Which leaves [`BacktrackNode::sequences`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    /// Only leaves at exactly the requested depth.
    Exact,
    /// Every leaf at or above the requested depth.
    Full,
}

impl BacktrackNode {
    /// Bytes occupied by a materialized tree of `nodes` nodes, root included.
    pub fn footprint(nodes: u64) -> u64 {
        nodes * size_of::<BacktrackNode>() as u64
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn node_count(&self) -> u64 {
        1 + self.children.iter().map(|c| c.node_count()).sum::<u64>()
    }

    /// Leaves below the root.
    pub fn leaf_count(&self) -> u64 {
        self.children
            .iter()
            .map(|c| if c.is_leaf() { 1 } else { c.leaf_count() })
            .sum()
    }

    /// Levels below this node.
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.height() + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn max_children(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.max_children())
            .fold(self.children.len(), usize::max)
    }

    /// Node count at each depth, this node at depth 0.
    pub fn nodes_per_level(&self) -> Vec<u64> {
        let mut counts = vec![0; self.height() + 1];
        self.count_levels(0, &mut counts);
        counts
    }

    fn count_levels(&self, depth: usize, counts: &mut [u64]) {
        counts[depth] += 1;
        for child in self.children.iter() {
            child.count_levels(depth + 1, counts);
        }
    }

    /// Bytes held by this node and everything below it.
    pub fn heap_size(&self) -> u64 {
        size_of::<BacktrackNode>() as u64
            + self.children.iter().map(|c| c.heap_size()).sum::<u64>()
    }

    /// Root-to-leaf value paths in preorder, filtered by length.
    pub fn sequences(&self, len: usize, mode: PrintMode) -> Vec<Vec<u32>> {
        let mut out = Vec::new();
        let mut path = Vec::with_capacity(len);
        for child in self.children.iter() {
            child.collect_sequences(len, mode, &mut path, &mut out);
        }
        out
    }

    fn collect_sequences(
        &self,
        len: usize,
        mode: PrintMode,
        path: &mut Vec<u32>,
        out: &mut Vec<Vec<u32>>,
    ) {
        if path.len() >= len {
            return;
        }
        if let Some(value) = self.value {
            path.push(value);
        }
        if self.is_leaf() {
            let wanted = match mode {
                PrintMode::Exact => path.len() == len,
                PrintMode::Full => true,
            };
            if wanted {
                out.push(path.clone());
            }
        } else {
            for child in self.children.iter() {
                child.collect_sequences(len, mode, path, out);
            }
        }
        path.pop();
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        match self.value {
            Some(value) => writeln!(f, "{:depth$}[{}] : {}", "", self.id, value, depth = depth)?,
            None => writeln!(f, "{:depth$}[{}] : root", "", self.id, depth = depth)?,
        }
        for child in self.children.iter() {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for BacktrackNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[derive(Debug)]
struct OpenNode {
    id: u64,
    value: Option<u32>,
    children: Vec<BacktrackNode>,
}

impl OpenNode {
    fn finalize(self) -> BacktrackNode {
        BacktrackNode {
            id: self.id,
            value: self.value,
            children: self.children.into_boxed_slice(),
        }
    }
}

/// Stack of open nodes along the current path, root at the bottom.
#[derive(Debug)]
pub(crate) struct TreeBuilder {
    open: Vec<OpenNode>,
    max_depth: usize,
}

impl TreeBuilder {
    pub(crate) fn new(max_depth: usize) -> Self {
        let mut open = Vec::with_capacity(max_depth + 1);
        open.push(OpenNode {
            id: 0,
            value: None,
            children: Vec::new(),
        });
        Self { open, max_depth }
    }

    /// Open a node one level below the current path.
    pub(crate) fn open(&mut self, id: u64, value: u32) -> Result<()> {
        let depth = self.open.len();
        if depth > self.max_depth {
            return Err(SearchError::DepthExceeded {
                depth,
                max: self.max_depth,
            });
        }
        self.open.push(OpenNode {
            id,
            value: Some(value),
            children: Vec::new(),
        });
        Ok(())
    }

    /// Finalize the deepest open node and attach it to its parent.
    pub(crate) fn close(&mut self) {
        if self.open.len() < 2 {
            return;
        }
        if let Some(node) = self.open.pop() {
            let node = node.finalize();
            if let Some(parent) = self.open.last_mut() {
                parent.children.push(node);
            }
        }
    }

    /// Close everything and return the root.
    pub(crate) fn finish(mut self) -> BacktrackNode {
        while self.open.len() > 1 {
            self.close();
        }
        match self.open.pop() {
            Some(root) => root.finalize(),
            None => BacktrackNode {
                id: 0,
                value: None,
                children: Box::new([]),
            },
        }
    }
}
