// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Shape tracking without materializing the tree.
//!
//! A stack holds the child count of every open node on the current path.
//! Closing a node folds its count into the running maximum; this is all a dry
//! run keeps, and the other modes use the same stack for their statistics.

/// Per-level child counters along the current path, root at the bottom.
#[derive(Debug, Clone)]
pub(crate) struct ChildCounts {
    stack: Vec<u32>,
    max_children: u32,
}

impl ChildCounts {
    pub(crate) fn new(max_depth: usize) -> Self {
        let mut stack = Vec::with_capacity(max_depth.saturating_add(1).min(1024));
        stack.push(0);
        Self {
            stack,
            max_children: 0,
        }
    }

    /// A child was opened under the deepest open node.
    pub(crate) fn open(&mut self) {
        if let Some(parent) = self.stack.last_mut() {
            *parent += 1;
        }
        self.stack.push(0);
    }

    /// The deepest open node is finished.
    pub(crate) fn close(&mut self) {
        if let Some(count) = self.stack.pop() {
            self.max_children = self.max_children.max(count);
        }
    }

    /// Close every open node, the root included.
    pub(crate) fn close_all(&mut self) {
        while !self.stack.is_empty() {
            self.close();
        }
    }

    pub(crate) fn max_children(&self) -> u32 {
        self.max_children
    }
}
