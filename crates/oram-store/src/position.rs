use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use oram_types::{BlockId, LeafId};

use crate::error::{StoreError, StoreResult};

/// Block id to currently assigned leaf.
///
/// Dense over `[0, block_count)`. An entry is `None` only before the store
/// has finished its initial placement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionMap {
    leaves: Vec<Option<LeafId>>,
    total_leaves: usize,
}

impl PositionMap {
    /// An empty map for `block_count` blocks over `total_leaves` leaves.
    pub fn new(block_count: usize, total_leaves: usize) -> Self {
        Self {
            leaves: vec![None; block_count],
            total_leaves,
        }
    }

    /// Number of block ids the map covers.
    pub fn block_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn total_leaves(&self) -> usize {
        self.total_leaves
    }

    /// Number of blocks with an assigned leaf.
    pub fn len(&self) -> usize {
        self.leaves.iter().filter(|l| l.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once every block has a leaf.
    pub fn is_complete(&self) -> bool {
        self.leaves.iter().all(Option::is_some)
    }

    /// Current leaf of `id`.
    pub fn get(&self, id: BlockId) -> StoreResult<LeafId> {
        self.leaves
            .get(id.index())
            .copied()
            .flatten()
            .ok_or(StoreError::UnknownBlock(id))
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.get(id).is_ok()
    }

    /// Set the leaf of `id` explicitly.
    pub fn assign(&mut self, id: BlockId, leaf: LeafId) -> StoreResult<()> {
        if leaf.index() >= self.total_leaves {
            return Err(StoreError::LeafOutOfRange {
                leaf,
                total: self.total_leaves,
            });
        }
        let entry = self
            .leaves
            .get_mut(id.index())
            .ok_or(StoreError::UnknownBlock(id))?;
        *entry = Some(leaf);
        Ok(())
    }

    /// Draw a uniform leaf from `rng`, assign it to `id`, and return it.
    ///
    /// Fails with `UnknownBlock` before drawing if `id` has no entry yet, so
    /// a rejected call consumes no randomness.
    pub fn reassign<R: Rng>(&mut self, id: BlockId, rng: &mut R) -> StoreResult<LeafId> {
        self.get(id)?;
        let leaf = Self::draw(self.total_leaves, rng);
        self.leaves[id.index()] = Some(leaf);
        Ok(leaf)
    }

    /// A uniform leaf in `[0, total_leaves)`.
    pub fn draw<R: Rng>(total_leaves: usize, rng: &mut R) -> LeafId {
        LeafId::new(rng.gen_range(0..total_leaves))
    }

    /// Assigned `(block, leaf)` pairs in block id order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, LeafId)> + '_ {
        self.leaves
            .iter()
            .enumerate()
            .filter_map(|(i, leaf)| leaf.map(|l| (BlockId::new(i), l)))
    }

    /// Ordered copy of every assignment.
    pub fn snapshot(&self) -> BTreeMap<BlockId, LeafId> {
        self.iter().collect()
    }
}
