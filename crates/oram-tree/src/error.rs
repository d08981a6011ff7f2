/// Errors from tree addressing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// A leaf number, node index or depth fell outside the tree.
    #[error("{what} {index} out of range (limit {limit})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        limit: usize,
    },

    /// The root has no parent.
    #[error("the root node has no parent")]
    RootHasNoParent,

    /// A tree needs at least two blocks to have a non-negative height.
    #[error("block count {0} is too small: at least 2 blocks are required")]
    TooFewBlocks(usize),

    /// The requested tree would not be addressable with `usize` node indices.
    #[error("block count {0} is too large to address")]
    TooManyBlocks(usize),
}

/// Result alias for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
