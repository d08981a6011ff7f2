//! Tree addressing for the Path ORAM block store.
//!
//! Pure arithmetic over a complete binary tree in heap layout. The tree
//! height is fixed from the block count once, and every query after that is
//! side-effect free.
//!
//! - [`TreeGeometry`] -- height, node/leaf counts, leaf-to-node mapping,
//!   parent lookup and path enumeration
//! - [`TreePath`] -- the root-to-leaf node sequence named by a leaf

pub mod error;
pub mod geometry;
pub mod path;

pub use error::{TreeError, TreeResult};
pub use geometry::TreeGeometry;
pub use path::TreePath;
