use oram_types::{BlockId, LeafId, NodeIndex};

/// Errors from the store containers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No entry exists for the block id.
    #[error("unknown block: {0}")]
    UnknownBlock(BlockId),

    /// A bucket already holds as many blocks as it can.
    #[error("bucket {node} is full (capacity {capacity})")]
    CapacityExceeded { node: NodeIndex, capacity: usize },

    /// A node index outside the bucket tree.
    #[error("node {node} out of range ({total} buckets)")]
    NodeOutOfRange { node: NodeIndex, total: usize },

    /// A leaf outside `[0, total_leaves)`.
    #[error("{leaf} out of range ({total} leaves)")]
    LeafOutOfRange { leaf: LeafId, total: usize },

    /// Buckets must be able to hold at least one block.
    #[error("bucket capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),

    /// Backend-specific failure of a block store implementation.
    #[error("block store backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
