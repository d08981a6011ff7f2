use oram_store::StoreError;
use oram_tree::TreeError;
use oram_types::{BlockId, NodeIndex, TypeError};

/// Errors from the access engine.
///
/// `InvalidArgument` and `UnknownBlock` are raised before any state changes
/// and can be corrected by the caller. `CapacityExceeded`, `BlockNotFound`
/// and `IntegrityViolation` mean an internal invariant is broken; they poison
/// the engine (see [`is_integrity_failure`](Self::is_integrity_failure)).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OramError {
    /// Malformed operation, block id outside `[0, N)`, or bad configuration.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Leaf, node or depth outside the tree.
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// The position map has no entry for the block.
    #[error("unknown block: {0}")]
    UnknownBlock(BlockId),

    /// A bucket was offered more blocks than it can hold.
    #[error("bucket {node} over capacity {capacity}")]
    CapacityExceeded { node: NodeIndex, capacity: usize },

    /// A read found its block neither on the path nor in the stash.
    #[error("block {0} not found on its path or in the stash")]
    BlockNotFound(BlockId),

    /// The payload cipher rejected a payload.
    #[error("cipher failure on block {block}: {reason}")]
    Cipher { block: BlockId, reason: String },

    /// The block store backend failed.
    #[error("block store backend error: {0}")]
    Backend(String),

    /// The post-access audit found broken invariants.
    #[error("integrity audit failed with {count} violation(s), first: {first}")]
    IntegrityViolation { count: usize, first: String },

    /// An earlier access hit an integrity failure; the store is unusable.
    #[error("store is poisoned by an earlier integrity failure")]
    Poisoned,
}

impl OramError {
    /// Returns `true` for errors that signal a broken internal invariant.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            OramError::CapacityExceeded { .. }
                | OramError::BlockNotFound(_)
                | OramError::IntegrityViolation { .. }
                | OramError::Poisoned
        )
    }
}

impl From<TreeError> for OramError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::TooFewBlocks(_) | TreeError::TooManyBlocks(_) => {
                OramError::InvalidArgument(err.to_string())
            }
            TreeError::OutOfRange { .. } | TreeError::RootHasNoParent => {
                OramError::OutOfRange(err.to_string())
            }
        }
    }
}

impl From<StoreError> for OramError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownBlock(id) => OramError::UnknownBlock(id),
            StoreError::CapacityExceeded { node, capacity } => {
                OramError::CapacityExceeded { node, capacity }
            }
            StoreError::NodeOutOfRange { .. } | StoreError::LeafOutOfRange { .. } => {
                OramError::OutOfRange(err.to_string())
            }
            StoreError::InvalidCapacity(_) => OramError::InvalidArgument(err.to_string()),
            StoreError::Backend(reason) => OramError::Backend(reason),
        }
    }
}

impl From<TypeError> for OramError {
    fn from(err: TypeError) -> Self {
        OramError::InvalidArgument(err.to_string())
    }
}

/// Result alias for engine operations.
pub type OramResult<T> = Result<T, OramError>;
