use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical identifier of a stored block.
///
/// Real block ids are dense in `[0, N)` where `N` is the number of blocks the
/// store was built with. There is no reserved "empty" id; vacancy is
/// expressed with [`Slot::Vacant`](crate::Slot::Vacant).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(usize);

impl BlockId {
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// The id as a dense array index.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

impl From<usize> for BlockId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

/// Zero-based leaf number, `0..2^height`.
///
/// A leaf number names a root-to-leaf path. Convert it to the absolute node
/// index of the leaf with the tree geometry, never by hand.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeafId(usize);

impl LeafId {
    pub const fn new(leaf: usize) -> Self {
        Self(leaf)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for LeafId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LeafId({})", self.0)
    }
}

impl fmt::Display for LeafId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "leaf:{}", self.0)
    }
}

impl From<usize> for LeafId {
    fn from(leaf: usize) -> Self {
        Self(leaf)
    }
}

/// Absolute node index in a complete binary tree laid out in heap order.
///
/// Node `0` is the root; the children of node `i` are `2i + 1` and `2i + 2`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// The root node.
    pub const ROOT: NodeIndex = NodeIndex(0);

    pub const fn new(node: usize) -> Self {
        Self(node)
    }

    pub const fn index(self) -> usize {
        self.0
    }

    /// Returns `true` for the root node.
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeIndex({})", self.0)
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl From<usize> for NodeIndex {
    fn from(node: usize) -> Self {
        Self(node)
    }
}
