use std::ops::Index;

use serde::{Deserialize, Serialize};

use oram_types::{LeafId, NodeIndex};

/// Root-to-leaf sequence of nodes named by one leaf.
///
/// Indexed by depth: `path[0]` is the root and `path[height]` is the leaf's
/// node. Always holds exactly `height + 1` nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreePath {
    leaf: LeafId,
    nodes: Vec<NodeIndex>,
}

impl TreePath {
    pub(crate) fn new(leaf: LeafId, nodes: Vec<NodeIndex>) -> Self {
        Self { leaf, nodes }
    }

    /// The leaf this path ends at.
    pub fn leaf(&self) -> LeafId {
        self.leaf
    }

    /// Node at the given depth, `None` below the leaf.
    pub fn at_depth(&self, depth: usize) -> Option<NodeIndex> {
        self.nodes.get(depth).copied()
    }

    /// The leaf's absolute node index.
    pub fn leaf_node(&self) -> NodeIndex {
        // Non-empty by construction: every path contains at least the root.
        self.nodes[self.nodes.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.nodes.contains(&node)
    }

    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    /// Nodes from the root down to the leaf.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NodeIndex> + '_ {
        self.nodes.iter().copied()
    }

    /// `(depth, node)` pairs from the leaf up to the root. This is the order
    /// eviction fills buckets in.
    pub fn leaf_to_root(&self) -> impl Iterator<Item = (usize, NodeIndex)> + '_ {
        self.nodes.iter().copied().enumerate().rev()
    }
}

impl Index<usize> for TreePath {
    type Output = NodeIndex;

    fn index(&self, depth: usize) -> &NodeIndex {
        &self.nodes[depth]
    }
}

impl From<TreePath> for Vec<NodeIndex> {
    fn from(path: TreePath) -> Self {
        path.nodes
    }
}
