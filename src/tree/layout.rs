//! Tree layout: rank order, distances, and canvas coordinates.
//!
//! Layout is ephemeral. It is recomputed in full whenever the collapse state
//! or the dataset changes, and a computation that fails leaves nothing
//! half-built behind.

use std::collections::{HashMap, HashSet};

use super::model::{Tree, TreeError};
use super::{CollapseState, is_collapsed};

/// Geometry parameters for a layout pass.
#[derive(Debug, Clone, Copy)]
pub struct LayoutParams {
    /// Vertical pixel span of one visible row.
    pub generic_row_height: f64,
    /// Total width of the tree panel in pixels.
    pub tree_width: f64,
    /// Radius of clickable node handles.
    pub node_handle_radius: f64,
    /// Branch stroke width.
    pub stroke_width: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            generic_row_height: 24.0,
            tree_width: 200.0,
            node_handle_radius: 4.0,
            stroke_width: 1.0,
        }
    }
}

impl LayoutParams {
    /// Horizontal span available for scaling branch distances. The handle
    /// radius and stroke margins are reserved at the left edge.
    pub fn available_width(&self) -> f64 {
        self.tree_width - self.node_handle_radius - 2.0 * self.stroke_width
    }
}

/// Placement of a single node, in rank order within [`Layout::nodes`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub id: String,
    pub rank: usize,
    /// Sum of branch lengths from the root.
    pub dist_from_root: f64,
    /// Hidden because some strict ancestor is collapsed.
    pub ancestor_collapsed: bool,
    pub x: f64,
    pub y: f64,
    /// Zero for hidden rows and rows with neither alignment data nor a
    /// collapsed-summary role.
    pub row_height: f64,
}

/// Derived placement for every node reachable from the root.
#[derive(Debug, Clone)]
pub struct Layout {
    nodes: Vec<PlacedNode>,
    index: HashMap<String, usize>,
    max_dist_from_root: f64,
    total_height: f64,
}

/// Traversal accumulator. Discarded wholesale on error so no partial layout
/// can escape.
#[derive(Default)]
struct Walk {
    order: Vec<String>,
    rank: HashMap<String, usize>,
    dist: HashMap<String, f64>,
    ancestor_collapsed: HashMap<String, bool>,
    max_dist: f64,
}

impl Walk {
    fn add_node(&mut self, node: &str) -> Result<(), TreeError> {
        if node.is_empty() {
            return Err(TreeError::UnnamedNode);
        }
        if self.rank.contains_key(node) {
            return Err(TreeError::DuplicateName(node.to_string()));
        }
        self.rank.insert(node.to_string(), self.order.len());
        self.order.push(node.to_string());
        Ok(())
    }

    fn add_subtree(
        &mut self,
        tree: &Tree,
        collapsed: &CollapseState,
        node: &str,
        parent: Option<&str>,
    ) -> Result<(), TreeError> {
        let parent_dist = parent.and_then(|p| self.dist.get(p).copied()).unwrap_or(0.0);
        let dist = parent_dist + tree.branch_length(node);
        self.dist.insert(node.to_string(), dist);
        self.max_dist = self.max_dist.max(dist);

        let hidden = match parent {
            Some(p) => {
                self.ancestor_collapsed.get(p).copied().unwrap_or(false) || is_collapsed(collapsed, p)
            }
            None => false,
        };
        self.ancestor_collapsed.insert(node.to_string(), hidden);

        let kids = tree.children(node);
        if kids.len() == 2 {
            // Ladder ordering for binary splits: left subtree, then the node
            // itself, then the right subtree.
            self.add_subtree(tree, collapsed, &kids[0], Some(node))?;
            self.add_node(node)?;
            self.add_subtree(tree, collapsed, &kids[1], Some(node))?;
        } else {
            self.add_node(node)?;
            for kid in kids {
                self.add_subtree(tree, collapsed, kid, Some(node))?;
            }
        }
        Ok(())
    }
}

impl Layout {
    /// Compute a layout for the current collapse state.
    ///
    /// `has_row_data` holds the ids of nodes that carry an alignment row; a
    /// node occupies a visible row exactly when it is not hidden by an
    /// ancestor's collapse and it either carries alignment data or is itself
    /// a collapsed subtree shown as a single summary row.
    pub fn compute(
        tree: &Tree,
        collapsed: &CollapseState,
        has_row_data: &HashSet<String>,
        params: &LayoutParams,
    ) -> Result<Self, TreeError> {
        let mut walk = Walk::default();
        walk.add_subtree(tree, collapsed, tree.root(), None)?;

        let left_edge = params.node_handle_radius + params.stroke_width;
        let available = params.available_width();

        let mut nodes = Vec::with_capacity(walk.order.len());
        let mut index = HashMap::with_capacity(walk.order.len());
        let mut running_height = 0.0;

        for (rank, id) in walk.order.iter().enumerate() {
            let hidden = walk.ancestor_collapsed[id];
            let summary_row = is_collapsed(collapsed, id) && !hidden;
            let row_height = if hidden || !(has_row_data.contains(id) || summary_row) {
                0.0
            } else {
                params.generic_row_height
            };

            let dist = walk.dist[id];
            // Degenerate tree with every node at the root's distance: pin
            // everything to the left edge instead of dividing by zero.
            let x = if walk.max_dist > 0.0 {
                left_edge + available * dist / walk.max_dist
            } else {
                left_edge
            };
            let y = running_height + row_height / 2.0;
            running_height += row_height;

            index.insert(id.clone(), rank);
            nodes.push(PlacedNode {
                id: id.clone(),
                rank,
                dist_from_root: dist,
                ancestor_collapsed: hidden,
                x,
                y,
                row_height,
            });
        }

        Ok(Self {
            nodes,
            index,
            max_dist_from_root: walk.max_dist,
            total_height: running_height,
        })
    }

    /// All reachable nodes in rank order.
    pub fn nodes(&self) -> &[PlacedNode] {
        &self.nodes
    }

    pub fn get(&self, id: &str) -> Option<&PlacedNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn rank_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Nodes with a nonzero row height, in rank order. Alignment rows are
    /// displayed in exactly this order.
    pub fn visible_rows(&self) -> impl Iterator<Item = &PlacedNode> {
        self.nodes.iter().filter(|n| n.row_height > 0.0)
    }

    pub fn visible_row_count(&self) -> usize {
        self.visible_rows().count()
    }

    pub fn total_height(&self) -> f64 {
        self.total_height
    }

    pub fn max_dist_from_root(&self) -> f64 {
        self.max_dist_from_root
    }
}
