use serde::{Deserialize, Serialize};

/// Running counters for a store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessStats {
    /// Completed reads.
    pub reads: u64,
    /// Completed writes.
    pub writes: u64,
    /// Largest stash size observed between accesses, including right after
    /// construction.
    pub peak_stash: usize,
    /// Blocks moved from the stash into buckets by eviction.
    pub blocks_evicted: u64,
}

impl AccessStats {
    /// Total completed accesses.
    pub fn accesses(&self) -> u64 {
        self.reads + self.writes
    }

    pub(crate) fn observe_stash(&mut self, size: usize) {
        self.peak_stash = self.peak_stash.max(size);
    }
}
