use oram_types::BlockId;

use crate::error::StoreResult;

/// Authoritative block id to payload mapping.
///
/// This is the store a production deployment would keep encrypted and
/// off-host. Implementations must satisfy:
/// - Every id in `[0, len())` has a payload once the store is built.
/// - `update` replaces the payload in place; ids are never added or removed.
/// - Errors are returned, never swallowed.
pub trait BlockStore<V> {
    /// Number of blocks held.
    fn len(&self) -> usize;

    /// Returns `true` if the store holds no blocks.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read a block's payload.
    fn get(&self, id: BlockId) -> StoreResult<V>;

    /// Replace a block's payload.
    fn update(&mut self, id: BlockId, value: V) -> StoreResult<()>;

    /// All payloads in block id order.
    ///
    /// Default implementation calls `get()` for each id.
    fn snapshot(&self) -> StoreResult<Vec<V>> {
        (0..self.len()).map(|i| self.get(BlockId::new(i))).collect()
    }
}
