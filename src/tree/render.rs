//! Tree drawing program and click hit testing.
//!
//! The renderer is pure geometry: it turns a layout into an ordered list of
//! shapes for the drawing surface, and resolves a click point to a node id.
//! Collapse toggling itself belongs to the app layer.

use super::layout::Layout;
use super::model::Tree;
use super::{CollapseState, is_collapsed};

/// Style inputs for the drawing program.
#[derive(Debug, Clone, Copy)]
pub struct TreeStyle {
    pub node_handle_radius: f64,
    /// Right edge of the tree panel; collapsed-row connectors run out to it.
    pub tree_width: f64,
}

/// One drawing instruction, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Short horizontal tick marking a leaf, vertically centered on its row.
    LeafTick { x: f64, y: f64, len: f64 },
    /// Solid elbow connector: vertical from `(x, y)` to `(x, child_y)`,
    /// then horizontal to `(child_x, child_y)`.
    Elbow {
        x: f64,
        y: f64,
        child_x: f64,
        child_y: f64,
    },
    /// Dashed connector from a collapsed node out to the panel edge,
    /// signaling a hidden subtree.
    CollapsedRow { x: f64, y: f64, x_end: f64 },
    /// Circular click handle on an internal node.
    Handle {
        x: f64,
        y: f64,
        radius: f64,
        collapsed: bool,
    },
}

/// Produce the deterministic drawing program for one render pass.
///
/// Connectors are emitted for every visible node in rank order, then all
/// handles, so handles always paint on top of branch lines.
pub fn draw_commands(
    tree: &Tree,
    layout: &Layout,
    collapsed: &CollapseState,
    style: &TreeStyle,
) -> Vec<Shape> {
    let mut shapes = Vec::new();

    for node in layout.nodes() {
        if node.ancestor_collapsed {
            continue;
        }
        if tree.is_leaf(&node.id) {
            shapes.push(Shape::LeafTick {
                x: node.x,
                y: node.y,
                len: 2.0 * style.node_handle_radius,
            });
        } else if !is_collapsed(collapsed, &node.id) {
            for kid in tree.children(&node.id) {
                if let Some(child) = layout.get(kid) {
                    shapes.push(Shape::Elbow {
                        x: node.x,
                        y: node.y,
                        child_x: child.x,
                        child_y: child.y,
                    });
                }
            }
        } else {
            shapes.push(Shape::CollapsedRow {
                x: node.x,
                y: node.y,
                x_end: style.tree_width,
            });
        }
    }

    for node in layout.nodes() {
        if node.ancestor_collapsed || tree.is_leaf(&node.id) {
            continue;
        }
        shapes.push(Shape::Handle {
            x: node.x,
            y: node.y,
            radius: style.node_handle_radius,
            collapsed: is_collapsed(collapsed, &node.id),
        });
    }

    shapes
}

/// Resolve a click at panel-local `(x, y)` to the node whose handle contains
/// it. Candidates are tested in rank order and the first hit wins; proximity
/// never breaks ties. Returns `None` when no handle contains the point.
pub fn hit_test<'a>(tree: &Tree, layout: &'a Layout, radius: f64, x: f64, y: f64) -> Option<&'a str> {
    let r2 = radius * radius;
    layout
        .nodes()
        .iter()
        .filter(|n| !n.ancestor_collapsed && !tree.is_leaf(&n.id))
        .find(|n| {
            let dx = x - n.x;
            let dy = y - n.y;
            dx * dx + dy * dy <= r2
        })
        .map(|n| n.id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::layout::LayoutParams;
    use crate::tree::model::Branch;
    use std::collections::HashSet;

    fn branch(parent: &str, child: &str, len: f64) -> Branch {
        Branch(parent.to_string(), child.to_string(), len)
    }

    fn presence(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn style() -> TreeStyle {
        TreeStyle {
            node_handle_radius: 4.0,
            tree_width: 200.0,
        }
    }

    fn two_leaf_fixture(collapsed: &CollapseState) -> (Tree, Layout) {
        let tree =
            Tree::from_branches("R", &[branch("R", "A", 1.0), branch("R", "B", 2.0)]).unwrap();
        let layout = Layout::compute(
            &tree,
            collapsed,
            &presence(&["A", "B"]),
            &LayoutParams::default(),
        )
        .unwrap();
        (tree, layout)
    }

    #[test]
    fn test_expanded_tree_shapes() {
        let collapsed = CollapseState::new();
        let (tree, layout) = two_leaf_fixture(&collapsed);
        let shapes = draw_commands(&tree, &layout, &collapsed, &style());

        let ticks = shapes
            .iter()
            .filter(|s| matches!(s, Shape::LeafTick { .. }))
            .count();
        let elbows = shapes
            .iter()
            .filter(|s| matches!(s, Shape::Elbow { .. }))
            .count();
        let handles = shapes
            .iter()
            .filter(|s| matches!(s, Shape::Handle { .. }))
            .count();
        let dashed = shapes
            .iter()
            .filter(|s| matches!(s, Shape::CollapsedRow { .. }))
            .count();

        assert_eq!(ticks, 2, "one tick per leaf");
        assert_eq!(elbows, 2, "one elbow per child of R");
        assert_eq!(handles, 1, "only internal nodes get handles");
        assert_eq!(dashed, 0);
    }

    #[test]
    fn test_elbow_geometry_matches_layout() {
        let collapsed = CollapseState::new();
        let (tree, layout) = two_leaf_fixture(&collapsed);
        let shapes = draw_commands(&tree, &layout, &collapsed, &style());

        let r = layout.get("R").unwrap();
        let a = layout.get("A").unwrap();
        assert!(shapes.contains(&Shape::Elbow {
            x: r.x,
            y: r.y,
            child_x: a.x,
            child_y: a.y,
        }));
    }

    #[test]
    fn test_collapsed_root_draws_single_dashed_row() {
        let mut collapsed = CollapseState::new();
        collapsed.insert("R".to_string(), true);
        let (tree, layout) = two_leaf_fixture(&collapsed);
        let shapes = draw_commands(&tree, &layout, &collapsed, &style());

        // Hidden leaves contribute no shapes at all.
        let connectors: Vec<&Shape> = shapes
            .iter()
            .filter(|s| !matches!(s, Shape::Handle { .. }))
            .collect();
        let r = layout.get("R").unwrap();
        assert_eq!(
            connectors,
            vec![&Shape::CollapsedRow {
                x: r.x,
                y: r.y,
                x_end: 200.0,
            }]
        );

        // The handle survives and is marked collapsed.
        assert!(shapes.iter().any(|s| matches!(
            s,
            Shape::Handle {
                collapsed: true,
                ..
            }
        )));
    }

    #[test]
    fn test_handles_paint_after_connectors() {
        let collapsed = CollapseState::new();
        let (tree, layout) = two_leaf_fixture(&collapsed);
        let shapes = draw_commands(&tree, &layout, &collapsed, &style());

        let first_handle = shapes
            .iter()
            .position(|s| matches!(s, Shape::Handle { .. }))
            .unwrap();
        let last_connector = shapes
            .iter()
            .rposition(|s| !matches!(s, Shape::Handle { .. }))
            .unwrap();
        assert!(last_connector < first_handle);
    }

    #[test]
    fn test_hit_test_inside_and_outside() {
        let collapsed = CollapseState::new();
        let (tree, layout) = two_leaf_fixture(&collapsed);
        let r = layout.get("R").unwrap();

        assert_eq!(hit_test(&tree, &layout, 4.0, r.x, r.y), Some("R"));
        assert_eq!(hit_test(&tree, &layout, 4.0, r.x + 3.9, r.y), Some("R"));
        assert_eq!(hit_test(&tree, &layout, 4.0, r.x + 10.0, r.y), None);

        // Leaves never expose handles.
        let a = layout.get("A").unwrap();
        assert_eq!(hit_test(&tree, &layout, 4.0, a.x, a.y), None);
    }

    #[test]
    fn test_hit_test_first_by_rank_on_overlap() {
        // A zero-length branch and no alignment rows leave R and P with
        // coincident handles; the lower rank must win.
        let tree = Tree::from_branches(
            "R",
            &[branch("R", "P", 0.0), branch("P", "A", 1.0)],
        )
        .unwrap();
        let layout = Layout::compute(
            &tree,
            &CollapseState::new(),
            &HashSet::new(),
            &LayoutParams::default(),
        )
        .unwrap();

        let p = layout.get("P").unwrap();
        let r = layout.get("R").unwrap();
        assert_eq!((p.x, p.y), (r.x, r.y), "fixture requires coincident handles");
        assert!(r.rank < p.rank);

        assert_eq!(hit_test(&tree, &layout, 4.0, p.x, p.y), Some("R"));
    }

    #[test]
    fn test_hidden_internal_node_not_clickable() {
        let tree = Tree::from_branches(
            "R",
            &[
                branch("R", "P", 1.0),
                branch("R", "L", 1.0),
                branch("P", "A", 1.0),
                branch("P", "B", 1.0),
            ],
        )
        .unwrap();
        let mut collapsed = CollapseState::new();
        collapsed.insert("R".to_string(), true);
        let layout = Layout::compute(
            &tree,
            &collapsed,
            &presence(&["A", "B", "L"]),
            &LayoutParams::default(),
        )
        .unwrap();

        let p = layout.get("P").unwrap();
        assert!(p.ancestor_collapsed);
        assert_eq!(hit_test(&tree, &layout, 4.0, p.x, p.y), None);
    }
}
