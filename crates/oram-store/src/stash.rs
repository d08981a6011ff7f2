use oram_types::BlockId;

/// Holding area for blocks read off a path and not yet evicted.
///
/// Entries keep their insertion order; eviction scans them front to back.
/// Overwriting an existing entry keeps its original position.
#[derive(Clone, PartialEq, Eq)]
pub struct Stash<V> {
    entries: Vec<(BlockId, V)>,
}

impl<V> Stash<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of blocks in flight.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: BlockId) -> Option<usize> {
        self.entries.iter().position(|(b, _)| *b == id)
    }

    /// Insert or overwrite; returns the previous payload if there was one.
    pub fn insert(&mut self, id: BlockId, value: V) -> Option<V> {
        match self.position(id) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((id, value));
                None
            }
        }
    }

    /// Remove a block, preserving the order of the rest.
    pub fn remove(&mut self, id: BlockId) -> Option<V> {
        self.position(id).map(|i| self.entries.remove(i).1)
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.position(id).is_some()
    }

    pub fn lookup(&self, id: BlockId) -> Option<&V> {
        self.entries.iter().find(|(b, _)| *b == id).map(|(_, v)| v)
    }

    /// Block ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.entries.iter().map(|(b, _)| *b)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &V)> {
        self.entries.iter().map(|(b, v)| (*b, v))
    }
}

impl<V> Default for Stash<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for Stash<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stash")
            .field("ids", &self.ids().collect::<Vec<_>>())
            .finish()
    }
}
