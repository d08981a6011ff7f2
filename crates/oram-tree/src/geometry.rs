use serde::{Deserialize, Serialize};

use oram_types::{LeafId, NodeIndex};

use crate::error::{TreeError, TreeResult};
use crate::path::TreePath;

/// Shape of the complete binary tree backing a store.
///
/// For `N` blocks the height is `ceil(log2(N)) - 1`, so the tree has
/// `2^height` leaves and `2^(height+1) - 1` nodes. Nodes are numbered in heap
/// order: root `0`, children of `i` at `2i + 1` and `2i + 2`, leaves occupying
/// the last `2^height` indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeGeometry {
    height: usize,
}

impl TreeGeometry {
    /// Tallest tree whose node count still fits in a `usize`.
    pub const MAX_HEIGHT: usize = usize::BITS as usize - 2;

    /// Geometry for a store holding `block_count` blocks.
    pub fn for_block_count(block_count: usize) -> TreeResult<Self> {
        if block_count < 2 {
            return Err(TreeError::TooFewBlocks(block_count));
        }
        let height = ceil_log2(block_count) - 1;
        if height > Self::MAX_HEIGHT {
            return Err(TreeError::TooManyBlocks(block_count));
        }
        Ok(Self { height })
    }

    /// Geometry with an explicit height.
    pub fn with_height(height: usize) -> TreeResult<Self> {
        if height > Self::MAX_HEIGHT {
            return Err(TreeError::OutOfRange {
                what: "height",
                index: height,
                limit: Self::MAX_HEIGHT,
            });
        }
        Ok(Self { height })
    }

    /// Depth of the leaves; the root is at depth 0.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of nodes (= buckets) in the tree.
    pub fn total_nodes(&self) -> usize {
        (1usize << (self.height + 1)) - 1
    }

    /// Number of leaves (= distinct paths).
    pub fn total_leaves(&self) -> usize {
        1usize << self.height
    }

    /// Number of nodes on every root-to-leaf path.
    pub fn path_len(&self) -> usize {
        self.height + 1
    }

    /// Absolute node index of a leaf: `2^height + leaf - 1`.
    pub fn leaf_index(&self, leaf: LeafId) -> TreeResult<NodeIndex> {
        self.check_leaf(leaf)?;
        Ok(NodeIndex::new(self.total_leaves() + leaf.index() - 1))
    }

    /// Inverse of [`leaf_index`](Self::leaf_index) for nodes on the last level.
    pub fn leaf_of(&self, node: NodeIndex) -> TreeResult<LeafId> {
        self.check_node(node)?;
        let first_leaf = self.total_leaves() - 1;
        if node.index() < first_leaf {
            return Err(TreeError::OutOfRange {
                what: "leaf node",
                index: node.index(),
                limit: first_leaf,
            });
        }
        Ok(LeafId::new(node.index() - first_leaf))
    }

    /// Parent of a node: `floor((node - 1) / 2)`.
    pub fn parent(&self, node: NodeIndex) -> TreeResult<NodeIndex> {
        self.check_node(node)?;
        if node.is_root() {
            return Err(TreeError::RootHasNoParent);
        }
        Ok(NodeIndex::new((node.index() - 1) / 2))
    }

    /// Depth of a node; the root is 0, leaves are at `height`.
    pub fn depth(&self, node: NodeIndex) -> TreeResult<usize> {
        self.check_node(node)?;
        Ok(floor_log2(node.index() + 1))
    }

    /// The root-to-leaf path named by `leaf`.
    ///
    /// Built by ascending from the leaf through its parents and reversing into
    /// depth order.
    pub fn path(&self, leaf: LeafId) -> TreeResult<TreePath> {
        let mut node = self.leaf_index(leaf)?;
        let mut nodes = Vec::with_capacity(self.path_len());
        nodes.push(node);
        while !node.is_root() {
            node = self.parent(node)?;
            nodes.push(node);
        }
        nodes.reverse();
        Ok(TreePath::new(leaf, nodes))
    }

    /// `path(leaf)[depth]` without materializing the path.
    pub fn node_at_depth(&self, leaf: LeafId, depth: usize) -> TreeResult<NodeIndex> {
        let leaf_node = self.leaf_index(leaf)?;
        if depth > self.height {
            return Err(TreeError::OutOfRange {
                what: "depth",
                index: depth,
                limit: self.height,
            });
        }
        // In 1-based heap numbering an ancestor k levels up is a right shift by k.
        let ancestor = ((leaf_node.index() + 1) >> (self.height - depth)) - 1;
        Ok(NodeIndex::new(ancestor))
    }

    /// Whether `node` lies on the path named by `leaf`.
    pub fn is_on_path(&self, node: NodeIndex, leaf: LeafId) -> TreeResult<bool> {
        let depth = self.depth(node)?;
        Ok(self.node_at_depth(leaf, depth)? == node)
    }

    fn check_leaf(&self, leaf: LeafId) -> TreeResult<()> {
        if leaf.index() >= self.total_leaves() {
            return Err(TreeError::OutOfRange {
                what: "leaf",
                index: leaf.index(),
                limit: self.total_leaves(),
            });
        }
        Ok(())
    }

    fn check_node(&self, node: NodeIndex) -> TreeResult<()> {
        if node.index() >= self.total_nodes() {
            return Err(TreeError::OutOfRange {
                what: "node",
                index: node.index(),
                limit: self.total_nodes(),
            });
        }
        Ok(())
    }
}

fn floor_log2(n: usize) -> usize {
    (usize::BITS - 1 - n.leading_zeros()) as usize
}

fn ceil_log2(n: usize) -> usize {
    (usize::BITS - (n - 1).leading_zeros()) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn geometry(blocks: usize) -> TreeGeometry {
        TreeGeometry::for_block_count(blocks).unwrap()
    }

    // -----------------------------------------------------------------------
    // Height and counts
    // -----------------------------------------------------------------------

    #[test]
    fn height_from_block_count() {
        assert_eq!(geometry(2).height(), 0);
        assert_eq!(geometry(3).height(), 1);
        assert_eq!(geometry(4).height(), 1);
        assert_eq!(geometry(5).height(), 2);
        assert_eq!(geometry(8).height(), 2);
        assert_eq!(geometry(10).height(), 3);
        assert_eq!(geometry(16).height(), 3);
        assert_eq!(geometry(17).height(), 4);
        assert_eq!(geometry(1024).height(), 9);
    }

    #[test]
    fn ten_blocks_shape() {
        let g = geometry(10);
        assert_eq!(g.total_leaves(), 8);
        assert_eq!(g.total_nodes(), 15);
        assert_eq!(g.path_len(), 4);
    }

    #[test]
    fn too_few_blocks_rejected() {
        assert_eq!(
            TreeGeometry::for_block_count(0),
            Err(TreeError::TooFewBlocks(0))
        );
        assert_eq!(
            TreeGeometry::for_block_count(1),
            Err(TreeError::TooFewBlocks(1))
        );
    }

    #[test]
    fn explicit_height_bounds() {
        assert_eq!(TreeGeometry::with_height(3).unwrap(), geometry(10));
        assert!(TreeGeometry::with_height(TreeGeometry::MAX_HEIGHT + 1).is_err());
    }

    // -----------------------------------------------------------------------
    // Leaf and parent mapping
    // -----------------------------------------------------------------------

    #[test]
    fn leaf_index_maps_to_last_level() {
        let g = geometry(10);
        assert_eq!(g.leaf_index(LeafId::new(0)).unwrap(), NodeIndex::new(7));
        assert_eq!(g.leaf_index(LeafId::new(7)).unwrap(), NodeIndex::new(14));
        assert!(matches!(
            g.leaf_index(LeafId::new(8)),
            Err(TreeError::OutOfRange { what: "leaf", index: 8, limit: 8 })
        ));
    }

    #[test]
    fn leaf_of_inverts_leaf_index() {
        let g = geometry(10);
        for leaf in 0..g.total_leaves() {
            let node = g.leaf_index(LeafId::new(leaf)).unwrap();
            assert_eq!(g.leaf_of(node).unwrap(), LeafId::new(leaf));
        }
        assert!(g.leaf_of(NodeIndex::new(3)).is_err());
    }

    #[test]
    fn parent_lookup() {
        let g = geometry(10);
        assert_eq!(g.parent(NodeIndex::new(1)).unwrap(), NodeIndex::ROOT);
        assert_eq!(g.parent(NodeIndex::new(2)).unwrap(), NodeIndex::ROOT);
        assert_eq!(g.parent(NodeIndex::new(8)).unwrap(), NodeIndex::new(3));
        assert_eq!(g.parent(NodeIndex::new(14)).unwrap(), NodeIndex::new(6));
    }

    #[test]
    fn root_has_no_parent() {
        let g = geometry(10);
        assert_eq!(g.parent(NodeIndex::ROOT), Err(TreeError::RootHasNoParent));
    }

    #[test]
    fn parent_of_out_of_tree_node_fails() {
        let g = geometry(10);
        assert!(matches!(
            g.parent(NodeIndex::new(15)),
            Err(TreeError::OutOfRange { what: "node", .. })
        ));
    }

    #[test]
    fn depth_of_nodes() {
        let g = geometry(10);
        assert_eq!(g.depth(NodeIndex::ROOT).unwrap(), 0);
        assert_eq!(g.depth(NodeIndex::new(2)).unwrap(), 1);
        assert_eq!(g.depth(NodeIndex::new(3)).unwrap(), 2);
        assert_eq!(g.depth(NodeIndex::new(6)).unwrap(), 2);
        assert_eq!(g.depth(NodeIndex::new(14)).unwrap(), 3);
    }

    // -----------------------------------------------------------------------
    // Paths
    // -----------------------------------------------------------------------

    #[test]
    fn path_for_known_leaves() {
        let g = geometry(10);
        let path = g.path(LeafId::new(0)).unwrap();
        assert_eq!(
            path.nodes(),
            &[0, 1, 3, 7].map(NodeIndex::new)
        );
        let path = g.path(LeafId::new(5)).unwrap();
        assert_eq!(
            path.nodes(),
            &[0, 2, 5, 12].map(NodeIndex::new)
        );
        assert_eq!(path.leaf(), LeafId::new(5));
        assert_eq!(path.leaf_node(), NodeIndex::new(12));
    }

    #[test]
    fn height_zero_tree_is_a_single_bucket() {
        let g = geometry(2);
        assert_eq!(g.total_nodes(), 1);
        assert_eq!(g.total_leaves(), 1);
        let path = g.path(LeafId::new(0)).unwrap();
        assert_eq!(path.nodes(), &[NodeIndex::ROOT]);
    }

    #[test]
    fn leaf_to_root_order() {
        let g = geometry(10);
        let path = g.path(LeafId::new(3)).unwrap();
        let order: Vec<(usize, usize)> = path
            .leaf_to_root()
            .map(|(d, n)| (d, n.index()))
            .collect();
        assert_eq!(order, vec![(3, 10), (2, 4), (1, 1), (0, 0)]);
    }

    #[test]
    fn node_at_depth_out_of_range() {
        let g = geometry(10);
        assert!(matches!(
            g.node_at_depth(LeafId::new(0), 4),
            Err(TreeError::OutOfRange { what: "depth", .. })
        ));
    }

    #[test]
    fn path_serde_roundtrip() {
        let g = geometry(10);
        let path = g.path(LeafId::new(6)).unwrap();
        let json = serde_json::to_string(&path).unwrap();
        let parsed: TreePath = serde_json::from_str(&json).unwrap();
        assert_eq!(path, parsed);
    }

    proptest! {
        #[test]
        fn path_shape_holds_for_every_leaf(blocks in 2usize..5000, pick in any::<usize>()) {
            let g = geometry(blocks);
            let leaf = LeafId::new(pick % g.total_leaves());
            let path = g.path(leaf).unwrap();
            prop_assert_eq!(path.len(), g.height() + 1);
            prop_assert_eq!(path[0], NodeIndex::ROOT);
            prop_assert_eq!(path[g.height()], g.leaf_index(leaf).unwrap());
            for depth in 0..path.len() {
                prop_assert_eq!(g.node_at_depth(leaf, depth).unwrap(), path[depth]);
                prop_assert_eq!(g.depth(path[depth]).unwrap(), depth);
                prop_assert!(g.is_on_path(path[depth], leaf).unwrap());
            }
        }

        #[test]
        fn every_node_is_on_some_path(blocks in 2usize..600, node in any::<usize>()) {
            let g = geometry(blocks);
            let node = NodeIndex::new(node % g.total_nodes());
            let on_paths = (0..g.total_leaves())
                .filter(|&l| g.is_on_path(node, LeafId::new(l)).unwrap())
                .count();
            let depth = g.depth(node).unwrap();
            prop_assert_eq!(on_paths, 1usize << (g.height() - depth));
        }
    }
}
