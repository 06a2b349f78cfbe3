//! Tree structure built from a flat branch list.
//!
//! Nodes are identified by their names; children are stored as ordered lists
//! of ids rather than references, so the structure is a plain arena keyed by
//! string id.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("All nodes must be named")]
    UnnamedNode,
    #[error("All node names must be unique (duplicate '{0}')")]
    DuplicateName(String),
    #[error("Root '{0}' cannot have an incoming branch")]
    RootHasParent(String),
    #[error("Branch refers to parent '{0}' that is never defined")]
    DanglingParent(String),
    #[error("Negative branch length {1} on '{0}'")]
    NegativeBranchLength(String, f64),
}

/// A parent-child edge carrying an evolutionary distance.
///
/// Serialized as a `[parent, child, length]` triple, matching the dataset
/// file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch(pub String, pub String, pub f64);

impl Branch {
    pub fn parent(&self) -> &str {
        &self.0
    }

    pub fn child(&self) -> &str {
        &self.1
    }

    pub fn length(&self) -> f64 {
        self.2
    }
}

/// A rooted tree: root id plus children-adjacency and branch-length tables.
///
/// Immutable once constructed. Name uniqueness is not checked here; it is
/// enforced during layout traversal, where reachability and traversal order
/// are known.
#[derive(Debug, Clone)]
pub struct Tree {
    root: String,
    children: HashMap<String, Vec<String>>,
    branch_length: HashMap<String, f64>,
}

impl Tree {
    /// Build the node table from a root id and an ordered branch list.
    pub fn from_branches(root: impl Into<String>, branches: &[Branch]) -> Result<Self, TreeError> {
        let root = root.into();
        if root.is_empty() {
            return Err(TreeError::UnnamedNode);
        }

        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        let mut branch_length: HashMap<String, f64> = HashMap::new();
        children.insert(root.clone(), Vec::new());
        branch_length.insert(root.clone(), 0.0);

        for branch in branches {
            let (parent, child, len) = (branch.parent(), branch.child(), branch.length());
            if parent.is_empty() || child.is_empty() {
                return Err(TreeError::UnnamedNode);
            }
            if child == root {
                return Err(TreeError::RootHasParent(root));
            }
            if len < 0.0 {
                return Err(TreeError::NegativeBranchLength(child.to_string(), len));
            }
            children.entry(parent.to_string()).or_default().push(child.to_string());
            children.entry(child.to_string()).or_default();
            branch_length.insert(child.to_string(), len);
        }

        // Every parent must be the root or appear as some branch's child.
        // Checked after the loop so branch order does not matter.
        for branch in branches {
            let parent = branch.parent();
            if parent != root && !branch_length.contains_key(parent) {
                return Err(TreeError::DanglingParent(parent.to_string()));
            }
        }

        Ok(Self {
            root,
            children,
            branch_length,
        })
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Ordered children of a node; empty for leaves and unknown ids.
    pub fn children(&self, node: &str) -> &[String] {
        self.children.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distance from a node to its parent. The root's is 0.
    pub fn branch_length(&self, node: &str) -> f64 {
        self.branch_length.get(node).copied().unwrap_or(0.0)
    }

    pub fn is_leaf(&self, node: &str) -> bool {
        self.children(node).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch(parent: &str, child: &str, len: f64) -> Branch {
        Branch(parent.to_string(), child.to_string(), len)
    }

    #[test]
    fn test_build_simple_tree() {
        let tree = Tree::from_branches(
            "R",
            &[branch("R", "A", 1.0), branch("R", "B", 2.0)],
        )
        .unwrap();

        assert_eq!(tree.root(), "R");
        assert_eq!(tree.children("R"), &["A", "B"]);
        assert!(tree.is_leaf("A"));
        assert!(tree.is_leaf("B"));
        assert_eq!(tree.branch_length("R"), 0.0);
        assert_eq!(tree.branch_length("A"), 1.0);
        assert_eq!(tree.branch_length("B"), 2.0);
    }

    #[test]
    fn test_children_preserve_branch_order() {
        let tree = Tree::from_branches(
            "R",
            &[
                branch("R", "C", 1.0),
                branch("R", "A", 1.0),
                branch("R", "B", 1.0),
            ],
        )
        .unwrap();
        assert_eq!(tree.children("R"), &["C", "A", "B"]);
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = Tree::from_branches("R", &[branch("R", "", 1.0)]);
        assert!(matches!(result, Err(TreeError::UnnamedNode)));

        let result = Tree::from_branches("", &[]);
        assert!(matches!(result, Err(TreeError::UnnamedNode)));
    }

    #[test]
    fn test_root_with_incoming_branch_rejected() {
        let result =
            Tree::from_branches("R", &[branch("R", "A", 1.0), branch("A", "R", 1.0)]);
        assert!(matches!(result, Err(TreeError::RootHasParent(_))));
    }

    #[test]
    fn test_dangling_parent_rejected() {
        let result = Tree::from_branches("R", &[branch("ghost", "A", 1.0)]);
        assert!(matches!(result, Err(TreeError::DanglingParent(name)) if name == "ghost"));
    }

    #[test]
    fn test_parent_defined_by_later_branch() {
        // "A" is used as a parent before the branch that defines it.
        let tree =
            Tree::from_branches("R", &[branch("A", "B", 1.0), branch("R", "A", 1.0)]);
        assert!(tree.is_ok());
    }

    #[test]
    fn test_negative_branch_length_rejected() {
        let result = Tree::from_branches("R", &[branch("R", "A", -0.5)]);
        assert!(matches!(result, Err(TreeError::NegativeBranchLength(_, _))));
    }
}
