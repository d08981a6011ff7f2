use oram_types::BlockId;

use crate::error::{StoreError, StoreResult};
use crate::traits::BlockStore;

/// In-memory, `Vec`-backed block store.
///
/// Block `i` lives at index `i`. Payloads are cloned on read.
#[derive(Clone, PartialEq, Eq)]
pub struct InMemoryBlockStore<V> {
    blocks: Vec<V>,
}

impl<V> InMemoryBlockStore<V> {
    /// Build a store whose block ids are the positions of `values`.
    pub fn new(values: Vec<V>) -> Self {
        Self { blocks: values }
    }

    /// Borrow a payload without cloning.
    pub fn peek(&self, id: BlockId) -> Option<&V> {
        self.blocks.get(id.index())
    }

    /// Iterate `(id, payload)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &V)> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(i, v)| (BlockId::new(i), v))
    }

    pub fn into_inner(self) -> Vec<V> {
        self.blocks
    }
}

impl<V> FromIterator<V> for InMemoryBlockStore<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<V: Clone> BlockStore<V> for InMemoryBlockStore<V> {
    fn len(&self) -> usize {
        self.blocks.len()
    }

    fn get(&self, id: BlockId) -> StoreResult<V> {
        self.blocks
            .get(id.index())
            .cloned()
            .ok_or(StoreError::UnknownBlock(id))
    }

    fn update(&mut self, id: BlockId, value: V) -> StoreResult<()> {
        let slot = self
            .blocks
            .get_mut(id.index())
            .ok_or(StoreError::UnknownBlock(id))?;
        *slot = value;
        Ok(())
    }
}

impl<V> std::fmt::Debug for InMemoryBlockStore<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlockStore")
            .field("block_count", &self.blocks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InMemoryBlockStore<i64> {
        InMemoryBlockStore::new(vec![0, 11, 22, 33])
    }

    #[test]
    fn ids_follow_input_order() {
        let store = sample();
        assert_eq!(store.len(), 4);
        assert_eq!(store.get(BlockId::new(0)).unwrap(), 0);
        assert_eq!(store.get(BlockId::new(3)).unwrap(), 33);
    }

    #[test]
    fn update_replaces_in_place() {
        let mut store = sample();
        store.update(BlockId::new(2), 200).unwrap();
        assert_eq!(store.get(BlockId::new(2)).unwrap(), 200);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn unknown_block_errors() {
        let mut store = sample();
        assert_eq!(
            store.get(BlockId::new(4)),
            Err(StoreError::UnknownBlock(BlockId::new(4)))
        );
        assert_eq!(
            store.update(BlockId::new(9), 1),
            Err(StoreError::UnknownBlock(BlockId::new(9)))
        );
    }

    #[test]
    fn snapshot_in_id_order() {
        let mut store = sample();
        store.update(BlockId::new(1), -1).unwrap();
        assert_eq!(store.snapshot().unwrap(), vec![0, -1, 22, 33]);
    }

    #[test]
    fn collect_and_peek() {
        let store: InMemoryBlockStore<String> =
            ["a", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(store.peek(BlockId::new(1)).map(String::as_str), Some("b"));
        assert!(store.peek(BlockId::new(2)).is_none());
        assert_eq!(store.iter().count(), 2);
    }

    #[test]
    fn empty_store() {
        let store: InMemoryBlockStore<u8> = InMemoryBlockStore::new(vec![]);
        assert!(store.is_empty());
    }

    #[test]
    fn debug_format() {
        let debug = format!("{:?}", sample());
        assert!(debug.contains("InMemoryBlockStore"));
        assert!(debug.contains("block_count"));
    }
}
