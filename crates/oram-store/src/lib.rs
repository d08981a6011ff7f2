//! State containers for the Path ORAM block store.
//!
//! Each container owns one slice of the store's state and knows nothing
//! about the others; the access engine is the only thing that mutates more
//! than one of them per call. Blocks are referenced by [`BlockId`] alone, so
//! no container ever holds a reference into another.
//!
//! # Containers
//!
//! - [`BlockStore`] / [`InMemoryBlockStore`] -- authoritative block id to
//!   payload mapping
//! - [`BucketStore`] -- the physical tree of fixed-capacity buckets
//! - [`PositionMap`] -- block id to currently assigned leaf
//! - [`Stash`] -- insertion-ordered holding area for blocks in flight
//!
//! # Design Rules
//!
//! 1. A bucket never holds more than its capacity; `place` refuses instead.
//! 2. The stash and buckets store block ids, never a vacancy marker.
//! 3. Randomness is always passed in by the caller; no container owns a
//!    generator.
//!
//! [`BlockId`]: oram_types::BlockId

pub mod bucket;
pub mod error;
pub mod memory;
pub mod position;
pub mod stash;
pub mod traits;

pub use bucket::{Bucket, BucketStore};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryBlockStore;
pub use position::PositionMap;
pub use stash::Stash;
pub use traits::BlockStore;
