// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Tidy tree layout in linear time.
//!
//! This follows Buchheim, Jünger and Leipert, "Drawing rooted trees in
//! linear time" (Softw. Pract. Exper. 36, 2006). The first walk runs bottom
//! up: every node gets a preliminary x relative to its subtree, and each new
//! subtree is pushed right until its left contour clears the right contour
//! of the siblings before it. Contours are followed through `thread` links,
//! and the shifts of intermediate siblings are spread lazily through
//! `shift`/`change`, so one pass over the children settles them. The second
//! walk runs top down and adds up the modifiers into absolute positions.
//!
//! Positions are left edges: a node occupies `[x, x + width)`. No two nodes
//! at the same depth overlap, and every parent sits at the midpoint of its
//! leftmost and rightmost visible child.

pub mod view;

pub use view::{NodeState, ViewNode, ViewTree, ViewType};

use serde::Serialize;
use tracing::debug;

/// Node sizes and spacing, in drawing units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutOptions {
    pub full_width: f64,
    pub compact_width: f64,
    /// Horizontal gap added after every node.
    pub sibling_separation: f64,
    /// Vertical distance between consecutive depths.
    pub level_separation: f64,
    pub node_height: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            full_width: 40.0,
            compact_width: 10.0,
            sibling_separation: 10.0,
            level_separation: 60.0,
            node_height: 30.0,
        }
    }
}

impl LayoutOptions {
    fn node_width(&self, view_type: ViewType) -> f64 {
        match view_type {
            ViewType::Full => self.full_width,
            ViewType::Compact => self.compact_width,
        }
    }
}

/// Where one visible node is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodePlacement {
    pub node_id: u64,
    pub value: Option<u32>,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    fn include(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x + width);
        self.max_y = self.max_y.max(y + height);
    }
}

/// Positions of every visible node, in preorder, and their bounding box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeLayout {
    pub placements: Vec<NodePlacement>,
    pub bounds: BoundingBox,
}

impl TreeLayout {
    /// Lay out the visible part of `view`.
    pub fn compute(view: &ViewTree, options: &LayoutOptions) -> Self {
        let mut walker = Walker::new(view, options);
        walker.first_walk(0);
        let root_prelim = walker.nodes[0].prelim;

        let mut layout = TreeLayout {
            placements: Vec::with_capacity(walker.nodes.len()),
            bounds: BoundingBox {
                min_x: f64::INFINITY,
                min_y: f64::INFINITY,
                max_x: f64::NEG_INFINITY,
                max_y: f64::NEG_INFINITY,
            },
        };
        walker.second_walk(0, -root_prelim, view, options, &mut layout);
        debug!(
            nodes = layout.placements.len(),
            width = layout.bounds.width(),
            height = layout.bounds.height(),
            "tree layout computed"
        );
        layout
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn get(&self, node_id: u64) -> Option<&NodePlacement> {
        self.placements.iter().find(|p| p.node_id == node_id)
    }
}

/// Layout scratch for one node; indices point into `Walker::nodes`.
#[derive(Debug)]
struct LayoutNode {
    view: usize,
    parent: Option<usize>,
    /// Position among the visible siblings.
    child_id: usize,
    children: Vec<usize>,
    prelim: f64,
    modifier: f64,
    change: f64,
    shift: f64,
    /// Node width plus the sibling separation.
    width: f64,
    ancestor: usize,
    thread: Option<usize>,
}

struct Walker {
    nodes: Vec<LayoutNode>,
}

impl Walker {
    fn new(view: &ViewTree, options: &LayoutOptions) -> Self {
        let mut walker = Walker {
            nodes: Vec::with_capacity(view.visible_count()),
        };
        walker.add(view, options, ViewTree::ROOT, None, 0);
        walker
    }

    fn add(
        &mut self,
        view: &ViewTree,
        options: &LayoutOptions,
        view_index: usize,
        parent: Option<usize>,
        child_id: usize,
    ) -> usize {
        let index = self.nodes.len();
        let view_node = &view.nodes()[view_index];
        self.nodes.push(LayoutNode {
            view: view_index,
            parent,
            child_id,
            children: Vec::new(),
            prelim: 0.0,
            modifier: 0.0,
            change: 0.0,
            shift: 0.0,
            width: options.node_width(view_node.view_type) + options.sibling_separation,
            ancestor: index,
            thread: None,
        });
        if view_node.state == NodeState::Open {
            let visible = view_node
                .children()
                .iter()
                .copied()
                .filter(|&c| view.nodes()[c].state != NodeState::Ignored);
            let mut children = Vec::new();
            for (id, child) in visible.enumerate() {
                children.push(self.add(view, options, child, Some(index), id));
            }
            self.nodes[index].children = children;
        }
        index
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.nodes[v].children.first().copied().or(self.nodes[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.nodes[v].children.last().copied().or(self.nodes[v].thread)
    }

    fn left_sibling(&self, v: usize) -> Option<usize> {
        let node = &self.nodes[v];
        match (node.parent, node.child_id) {
            (Some(parent), id) if id > 0 => Some(self.nodes[parent].children[id - 1]),
            _ => None,
        }
    }

    fn first_walk(&mut self, v: usize) {
        let child_count = self.nodes[v].children.len();
        if child_count == 0 {
            let prelim = match self.left_sibling(v) {
                Some(w) => self.nodes[w].prelim + self.nodes[w].width,
                None => 0.0,
            };
            self.nodes[v].prelim = prelim;
            return;
        }

        let mut default_ancestor = self.nodes[v].children[0];
        for i in 0..child_count {
            let w = self.nodes[v].children[i];
            self.first_walk(w);
            self.apportion(w, &mut default_ancestor);
        }
        self.execute_shifts(v);

        let leftmost = self.nodes[v].children[0];
        let rightmost = self.nodes[v].children[child_count - 1];
        let midpoint = (self.nodes[leftmost].prelim + self.nodes[rightmost].prelim) / 2.0;
        match self.left_sibling(v) {
            Some(w) => {
                let prelim = self.nodes[w].prelim + self.nodes[w].width;
                self.nodes[v].prelim = prelim;
                self.nodes[v].modifier = prelim - midpoint;
            }
            None => self.nodes[v].prelim = midpoint,
        }
    }

    /// Push the subtree of `v` right until it clears its left siblings.
    fn apportion(&mut self, v: usize, default_ancestor: &mut usize) {
        let (Some(mut v_i_m), Some(parent)) = (self.left_sibling(v), self.nodes[v].parent) else {
            return;
        };
        let mut v_i_p = v;
        let mut v_o_p = v;
        let mut v_o_m = self.nodes[parent].children[0];
        let mut s_i_p = self.nodes[v_i_p].modifier;
        let mut s_o_p = self.nodes[v_o_p].modifier;
        let mut s_i_m = self.nodes[v_i_m].modifier;
        let mut s_o_m = self.nodes[v_o_m].modifier;

        while let (Some(next_i_m), Some(next_i_p)) = (self.next_right(v_i_m), self.next_left(v_i_p)) {
            let (Some(next_o_m), Some(next_o_p)) = (self.next_left(v_o_m), self.next_right(v_o_p))
            else {
                break;
            };
            v_i_m = next_i_m;
            v_i_p = next_i_p;
            v_o_m = next_o_m;
            v_o_p = next_o_p;
            self.nodes[v_o_p].ancestor = v;

            let shift = (self.nodes[v_i_m].prelim + s_i_m) - (self.nodes[v_i_p].prelim + s_i_p)
                + self.nodes[v_i_m].width;
            if shift > 0.0 {
                let ancestor = self.ancestor(v_i_m, v, *default_ancestor);
                self.move_subtree(ancestor, v, shift);
                s_i_p += shift;
                s_o_p += shift;
            }
            s_i_m += self.nodes[v_i_m].modifier;
            s_i_p += self.nodes[v_i_p].modifier;
            s_o_m += self.nodes[v_o_m].modifier;
            s_o_p += self.nodes[v_o_p].modifier;
        }

        if self.next_right(v_i_m).is_some() && self.next_right(v_o_p).is_none() {
            self.nodes[v_o_p].thread = self.next_right(v_i_m);
            self.nodes[v_o_p].modifier += s_i_m - s_o_p;
        }
        if self.next_left(v_i_p).is_some() && self.next_left(v_o_m).is_none() {
            self.nodes[v_o_m].thread = self.next_left(v_i_p);
            self.nodes[v_o_m].modifier += s_i_p - s_o_m;
            *default_ancestor = v;
        }
    }

    /// The sibling of `v` whose subtree `v_i_m` belongs to.
    fn ancestor(&self, v_i_m: usize, v: usize, default_ancestor: usize) -> usize {
        let candidate = self.nodes[v_i_m].ancestor;
        if candidate != v && self.nodes[candidate].parent == self.nodes[v].parent {
            candidate
        } else {
            default_ancestor
        }
    }

    fn move_subtree(&mut self, w_m: usize, w_p: usize, shift: f64) {
        let subtrees = (self.nodes[w_p].child_id - self.nodes[w_m].child_id) as f64;
        self.nodes[w_p].change -= shift / subtrees;
        self.nodes[w_p].shift += shift;
        self.nodes[w_m].change += shift / subtrees;
        self.nodes[w_p].prelim += shift;
        self.nodes[w_p].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for i in (0..self.nodes[v].children.len()).rev() {
            let w = self.nodes[v].children[i];
            let node = &mut self.nodes[w];
            node.prelim += shift;
            node.modifier += shift;
            change += node.change;
            shift += node.shift + change;
        }
    }

    fn second_walk(
        &self,
        v: usize,
        m: f64,
        view: &ViewTree,
        options: &LayoutOptions,
        layout: &mut TreeLayout,
    ) {
        let node = &self.nodes[v];
        let view_node = &view.nodes()[node.view];
        let x = node.prelim + m;
        let y = view_node.depth as f64 * options.level_separation;
        let width = options.node_width(view_node.view_type);
        layout.bounds.include(x, y, width, options.node_height);
        layout.placements.push(NodePlacement {
            node_id: view_node.node_id,
            value: view_node.value,
            depth: view_node.depth,
            x,
            y,
            width,
        });
        for &w in &node.children {
            self.second_walk(w, m + node.modifier, view, options, layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SequenceStore;

    const EPS: f64 = 1e-9;

    fn view_of(events: &[(u32, usize)], depth: usize) -> ViewTree {
        let mut store = SequenceStore::tree(depth);
        for &(value, level) in events {
            store.push(value, level).unwrap();
        }
        let root = store.finish().unwrap().output.into_tree().unwrap();
        ViewTree::from_tree(&root)
    }

    fn assert_tidy(layout: &TreeLayout, view: &ViewTree) {
        let placements = &layout.placements;
        for (i, a) in placements.iter().enumerate() {
            for b in &placements[i + 1..] {
                if a.depth == b.depth {
                    let apart = a.x + a.width <= b.x + EPS || b.x + b.width <= a.x + EPS;
                    assert!(apart, "nodes {} and {} overlap", a.node_id, b.node_id);
                }
            }
        }
        for p in placements {
            let index = view.find(p.node_id).unwrap();
            let node = view.node(index).unwrap();
            if node.state != NodeState::Open {
                continue;
            }
            let children: Vec<&NodePlacement> = node
                .children()
                .iter()
                .filter_map(|&c| layout.get(view.node(c).unwrap().node_id))
                .collect();
            if let (Some(first), Some(last)) = (children.first(), children.last()) {
                let mid = (first.x + last.x) / 2.0;
                assert!((p.x - mid).abs() < EPS, "node {} not centred", p.node_id);
            }
        }
    }

    #[test]
    fn test_single_node() {
        let view = view_of(&[], 1);
        let layout = TreeLayout::compute(&view, &LayoutOptions::default());
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.placements[0].x, 0.0);
        assert_eq!(layout.bounds.width(), 40.0);
        assert_eq!(layout.bounds.height(), 30.0);
    }

    #[test]
    fn test_fan() {
        let view = view_of(&[(1, 0), (2, 0), (3, 0)], 1);
        let layout = TreeLayout::compute(&view, &LayoutOptions::default());
        let xs: Vec<f64> = layout.placements.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, -50.0, 0.0, 50.0]);
        assert_eq!(layout.placements[1].y, 60.0);
        assert_eq!(layout.bounds.min_x, -50.0);
        assert_eq!(layout.bounds.max_x, 90.0);
        assert_tidy(&layout, &view);
    }

    #[test]
    fn test_uneven_subtrees_do_not_collide() {
        // A wide left subtree, a bare middle leaf and a wide right subtree.
        let events = [
            (1, 0),
            (2, 1),
            (3, 2),
            (4, 2),
            (5, 2),
            (6, 1),
            (7, 2),
            (8, 0),
            (9, 0),
            (10, 1),
            (11, 2),
            (12, 2),
            (13, 1),
            (14, 2),
            (15, 2),
            (16, 2),
        ];
        let view = view_of(&events, 3);
        let layout = TreeLayout::compute(&view, &LayoutOptions::default());
        assert_eq!(layout.len(), 17);
        assert_tidy(&layout, &view);
    }

    #[test]
    fn test_compact_nodes_are_narrower() {
        let mut view = view_of(&[(1, 0), (2, 0), (3, 0)], 1);
        let wide = TreeLayout::compute(&view, &LayoutOptions::default());
        view.set_all_view_types(ViewType::Compact);
        let narrow = TreeLayout::compute(&view, &LayoutOptions::default());
        assert!(narrow.bounds.width() < wide.bounds.width());
        assert_eq!(narrow.placements[2].x - narrow.placements[1].x, 20.0);
        assert_tidy(&narrow, &view);
    }

    #[test]
    fn test_closed_and_ignored_nodes() {
        let mut view = view_of(&[(1, 0), (2, 1), (3, 1), (4, 0), (5, 1)], 2);
        view.set_state(1, NodeState::Closed);
        let layout = TreeLayout::compute(&view, &LayoutOptions::default());
        let ids: Vec<u64> = layout.placements.iter().map(|p| p.node_id).collect();
        assert_eq!(ids, vec![0, 1, 4, 5]);
        assert_tidy(&layout, &view);

        view.set_state(view.find(4).unwrap(), NodeState::Ignored);
        let layout = TreeLayout::compute(&view, &LayoutOptions::default());
        let ids: Vec<u64> = layout.placements.iter().map(|p| p.node_id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(layout.placements[0].x, layout.placements[1].x);
    }

    #[test]
    fn test_ignore_short_branches_layout() {
        let mut view = view_of(&[(1, 0), (2, 1), (3, 0), (4, 0), (5, 1)], 2);
        view.ignore_short_branches(2);
        let layout = TreeLayout::compute(&view, &LayoutOptions::default());
        let ids: Vec<u64> = layout.placements.iter().map(|p| p.node_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 4, 5]);
        assert_tidy(&layout, &view);
    }
}
