use serde::{Deserialize, Serialize};

use oram_tree::TreePath;
use oram_types::{BlockId, NodeIndex, Slot};

use crate::error::{StoreError, StoreResult};

/// The fixed-size slot set at one tree node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    slots: Vec<Slot>,
}

impl Bucket {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Slot::Vacant; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Real blocks held, in slot order.
    pub fn occupants(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.slots.iter().filter_map(Slot::block)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.occupants().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Slot::is_vacant)
    }

    pub fn is_full(&self) -> bool {
        !self.slots.iter().any(Slot::is_vacant)
    }

    fn insert(&mut self, id: BlockId) -> bool {
        match self.slots.iter_mut().find(|s| s.is_vacant()) {
            Some(slot) => {
                *slot = Slot::Occupied(id);
                true
            }
            None => false,
        }
    }

    fn drain(&mut self) -> impl Iterator<Item = BlockId> + '_ {
        self.slots.iter_mut().filter_map(Slot::take)
    }
}

/// The physical bucket tree, one [`Bucket`] per node in heap order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketStore {
    buckets: Vec<Bucket>,
    capacity: usize,
}

impl BucketStore {
    /// An all-vacant tree of `total_nodes` buckets, each holding `capacity`
    /// blocks.
    pub fn new(total_nodes: usize, capacity: usize) -> StoreResult<Self> {
        if capacity == 0 {
            return Err(StoreError::InvalidCapacity(capacity));
        }
        Ok(Self {
            buckets: vec![Bucket::with_capacity(capacity); total_nodes],
            capacity,
        })
    }

    /// Per-bucket capacity `Z`.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn bucket(&self, node: NodeIndex) -> StoreResult<&Bucket> {
        self.buckets
            .get(node.index())
            .ok_or(StoreError::NodeOutOfRange {
                node,
                total: self.buckets.len(),
            })
    }

    pub fn has_room(&self, node: NodeIndex) -> StoreResult<bool> {
        Ok(!self.bucket(node)?.is_full())
    }

    /// Put a block into the first vacant slot of `node`.
    ///
    /// A full bucket means a placement invariant is already broken; the
    /// caller must treat `CapacityExceeded` as an integrity failure.
    pub fn place(&mut self, node: NodeIndex, id: BlockId) -> StoreResult<()> {
        let total = self.buckets.len();
        let bucket = self
            .buckets
            .get_mut(node.index())
            .ok_or(StoreError::NodeOutOfRange { node, total })?;
        if bucket.insert(id) {
            Ok(())
        } else {
            Err(StoreError::CapacityExceeded {
                node,
                capacity: self.capacity,
            })
        }
    }

    /// Empty every bucket on `path`, root first, and return the real blocks
    /// found. Vacant slots are dropped.
    ///
    /// All nodes are checked before any bucket is touched, so a failed call
    /// leaves the tree unchanged.
    pub fn read_path(&mut self, path: &TreePath) -> StoreResult<Vec<BlockId>> {
        let total = self.buckets.len();
        if let Some(node) = path.iter().find(|n| n.index() >= total) {
            return Err(StoreError::NodeOutOfRange { node, total });
        }
        let mut found = Vec::with_capacity(path.len() * self.capacity);
        for node in path.iter() {
            found.extend(self.buckets[node.index()].drain());
        }
        Ok(found)
    }

    /// Every `(node, block)` pair currently resident, in node order.
    pub fn occupied(&self) -> impl Iterator<Item = (NodeIndex, BlockId)> + '_ {
        self.buckets.iter().enumerate().flat_map(|(i, bucket)| {
            bucket.occupants().map(move |id| (NodeIndex::new(i), id))
        })
    }

    /// Total number of resident blocks.
    pub fn occupancy(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }

    /// Per-node slot contents, in node order.
    pub fn snapshot(&self) -> Vec<Vec<Slot>> {
        self.buckets.iter().map(|b| b.slots.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oram_tree::TreeGeometry;
    use oram_types::LeafId;

    fn tree(capacity: usize) -> (TreeGeometry, BucketStore) {
        let geometry = TreeGeometry::for_block_count(10).unwrap();
        let store = BucketStore::new(geometry.total_nodes(), capacity).unwrap();
        (geometry, store)
    }

    fn b(i: usize) -> BlockId {
        BlockId::new(i)
    }

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    // -----------------------------------------------------------------------
    // Placement
    // -----------------------------------------------------------------------

    #[test]
    fn new_tree_is_vacant() {
        let (_, store) = tree(1);
        assert_eq!(store.len(), 15);
        assert_eq!(store.occupancy(), 0);
        assert!(store.bucket(n(0)).unwrap().is_empty());
    }

    #[test]
    fn zero_capacity_rejected() {
        assert_eq!(
            BucketStore::new(15, 0),
            Err(StoreError::InvalidCapacity(0))
        );
    }

    #[test]
    fn place_until_full() {
        let (_, mut store) = tree(2);
        store.place(n(3), b(1)).unwrap();
        assert!(store.has_room(n(3)).unwrap());
        store.place(n(3), b(2)).unwrap();
        assert!(!store.has_room(n(3)).unwrap());
        assert_eq!(
            store.place(n(3), b(4)),
            Err(StoreError::CapacityExceeded {
                node: n(3),
                capacity: 2
            })
        );
        let occupants: Vec<_> = store.bucket(n(3)).unwrap().occupants().collect();
        assert_eq!(occupants, vec![b(1), b(2)]);
    }

    #[test]
    fn place_out_of_range_node() {
        let (_, mut store) = tree(1);
        assert!(matches!(
            store.place(n(15), b(0)),
            Err(StoreError::NodeOutOfRange { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Path reads
    // -----------------------------------------------------------------------

    #[test]
    fn read_path_drains_only_that_path() {
        let (geometry, mut store) = tree(1);
        // leaf 0 path: 0, 1, 3, 7
        store.place(n(0), b(5)).unwrap();
        store.place(n(3), b(6)).unwrap();
        store.place(n(7), b(7)).unwrap();
        store.place(n(14), b(8)).unwrap();

        let path = geometry.path(LeafId::new(0)).unwrap();
        let found = store.read_path(&path).unwrap();
        assert_eq!(found, vec![b(5), b(6), b(7)]);

        for node in path.iter() {
            assert!(store.bucket(node).unwrap().is_empty());
        }
        // Off-path bucket untouched.
        assert_eq!(store.occupancy(), 1);
        assert_eq!(store.occupied().collect::<Vec<_>>(), vec![(n(14), b(8))]);
    }

    #[test]
    fn reading_twice_yields_nothing_new() {
        let (geometry, mut store) = tree(1);
        store.place(n(1), b(2)).unwrap();
        let path = geometry.path(LeafId::new(1)).unwrap();
        assert_eq!(store.read_path(&path).unwrap(), vec![b(2)]);
        assert!(store.read_path(&path).unwrap().is_empty());
    }

    #[test]
    fn read_path_rejects_foreign_path_without_mutation() {
        let (_, mut store) = tree(1);
        store.place(n(0), b(1)).unwrap();
        let taller = TreeGeometry::with_height(4).unwrap();
        let path = taller.path(LeafId::new(0)).unwrap();
        assert!(store.read_path(&path).is_err());
        assert_eq!(store.occupancy(), 1);
    }

    #[test]
    fn snapshot_reports_slots() {
        let (_, mut store) = tree(2);
        store.place(n(0), b(9)).unwrap();
        let snap = store.snapshot();
        assert_eq!(snap.len(), 15);
        assert_eq!(snap[0], vec![Slot::Occupied(b(9)), Slot::Vacant]);
        assert_eq!(snap[1], vec![Slot::Vacant, Slot::Vacant]);
    }

    #[test]
    fn serde_roundtrip() {
        let (_, mut store) = tree(1);
        store.place(n(4), b(3)).unwrap();
        let json = serde_json::to_string(&store).unwrap();
        let parsed: BucketStore = serde_json::from_str(&json).unwrap();
        assert_eq!(store, parsed);
    }
}
