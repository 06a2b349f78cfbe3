//! Phylogenetic tree: model, layout, and drawing program.

pub mod layout;
pub mod model;
pub mod render;

pub use layout::{Layout, LayoutParams, PlacedNode};
pub use model::{Branch, Tree, TreeError};
pub use render::{Shape, TreeStyle, draw_commands, hit_test};

use std::collections::HashMap;

/// Per-node collapse toggles. Owned by the app layer; the tree core only
/// reads it. Nodes absent from the map are expanded.
pub type CollapseState = HashMap<String, bool>;

/// Whether a node is toggled collapsed.
pub fn is_collapsed(state: &CollapseState, node: &str) -> bool {
    state.get(node).copied().unwrap_or(false)
}
