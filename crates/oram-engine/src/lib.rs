//! Path ORAM access engine.
//!
//! [`PathOram`] owns every piece of store state (block store, bucket tree,
//! position map, stash and the randomness source) and runs each logical
//! access as one transaction:
//!
//! 1. **Locate** the block's current leaf.
//! 2. **Reassign** the block to a fresh uniformly random leaf.
//! 3. **Read** the old leaf's path into the stash.
//! 4. **Answer** the read, or apply the write.
//! 5. **Evict** stash blocks back onto the path, deepest bucket first.
//!
//! Because the path read in step 3 is always for a leaf drawn uniformly at
//! random (and never revealed before), the sequence of physical paths an
//! observer sees is independent of which blocks are accessed.
//!
//! # Example
//!
//! ```
//! use oram_engine::{OramConfig, PathOram};
//! use oram_types::BlockId;
//!
//! let values = vec![0, 11, 22, 33, 44, 55, 66, 77, 88, 99];
//! let mut oram = PathOram::new(values, OramConfig::seeded(1)).unwrap();
//!
//! oram.write(BlockId::new(2), 200).unwrap();
//! assert_eq!(oram.read(BlockId::new(2)).unwrap(), 200);
//! assert_eq!(oram.read(BlockId::new(5)).unwrap(), 55);
//! ```
//!
//! # Design Rules
//!
//! 1. Arguments are validated before any state changes; a rejected call
//!    leaves the store untouched and consumes no randomness.
//! 2. A broken internal invariant is never retried or masked. The access
//!    fails, the engine is poisoned, and every later access is refused.
//! 3. The randomness source is passed in (or seeded from config), never
//!    global. The same seed and the same calls reproduce the same store.

pub mod audit;
pub mod cipher;
pub mod config;
pub mod engine;
pub mod error;
pub mod stats;

pub use audit::{IntegrityAuditor, IntegrityReport, Violation, ViolationKind};
pub use cipher::{CipherError, PayloadCipher, Plaintext};
pub use config::OramConfig;
pub use engine::PathOram;
pub use error::{OramError, OramResult};
pub use stats::AccessStats;
