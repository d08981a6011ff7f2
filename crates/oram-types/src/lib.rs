//! Foundation types for the Path ORAM block store.
//!
//! This crate provides the identifier and operation types shared by every
//! other ORAM crate. Blocks, leaves and tree nodes are all plain integers at
//! heart, but each gets its own newtype so that a leaf number can never be
//! passed where an absolute node index is expected.
//!
//! # Key Types
//!
//! - [`BlockId`] — Logical block identifier in `[0, N)`
//! - [`LeafId`] — Relative leaf number in `[0, 2^height)`
//! - [`NodeIndex`] — Absolute node index in the complete binary tree (root = 0)
//! - [`Slot`] — One bucket slot: vacant or holding a block
//! - [`Op`] / [`OpCode`] — Read or write request
//! - [`Response`] — Result of a completed access

pub mod error;
pub mod ids;
pub mod op;
pub mod slot;

pub use error::TypeError;
pub use ids::{BlockId, LeafId, NodeIndex};
pub use op::{Op, OpCode, Response};
pub use slot::Slot;
