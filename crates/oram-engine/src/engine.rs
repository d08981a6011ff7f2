use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::RngCore;
use tracing::{debug, error, info, warn};

use oram_store::{BlockStore, BucketStore, InMemoryBlockStore, PositionMap, Stash};
use oram_tree::{TreeGeometry, TreePath};
use oram_types::{BlockId, LeafId, NodeIndex, Op, OpCode, Response, Slot};

use crate::audit::{IntegrityAuditor, IntegrityReport};
use crate::cipher::{PayloadCipher, Plaintext};
use crate::config::OramConfig;
use crate::error::{OramError, OramResult};
use crate::stats::AccessStats;

/// A Path ORAM store over `N` fixed blocks.
///
/// Owns the block store `S`, the bucket tree, the position map, the stash
/// and the randomness source `R`. Blocks are referenced everywhere by
/// [`BlockId`] only.
///
/// Accesses take `&mut self`: one access runs to completion before the next
/// starts. Share a store between threads by wrapping the whole engine in a
/// `Mutex`.
pub struct PathOram<V, R = StdRng, S = InMemoryBlockStore<V>> {
    geometry: TreeGeometry,
    config: OramConfig,
    block_count: usize,
    store: S,
    positions: PositionMap,
    buckets: BucketStore,
    stash: Stash<V>,
    rng: R,
    cipher: Box<dyn PayloadCipher<V>>,
    stats: AccessStats,
    last_path: Option<TreePath>,
    poisoned: bool,
}

impl<V: Clone> PathOram<V> {
    /// Build a store from `values` (block `i` holds `values[i]`) using the
    /// randomness source described by `config`.
    pub fn new(values: Vec<V>, config: OramConfig) -> OramResult<Self> {
        let rng = config.rng();
        Self::with_rng(values, config, rng)
    }
}

impl<V: Clone, R: RngCore> PathOram<V, R> {
    /// Build a store with an explicit randomness source. `config.seed` is
    /// ignored.
    pub fn with_rng(values: Vec<V>, config: OramConfig, rng: R) -> OramResult<Self> {
        Self::with_cipher(values, config, rng, Box::new(Plaintext))
    }

    /// Build a store whose block store holds payloads sealed by `cipher`.
    pub fn with_cipher(
        values: Vec<V>,
        config: OramConfig,
        rng: R,
        cipher: Box<dyn PayloadCipher<V>>,
    ) -> OramResult<Self> {
        let sealed = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                let block = BlockId::new(i);
                cipher.seal(block, v).map_err(|e| OramError::Cipher {
                    block,
                    reason: e.0,
                })
            })
            .collect::<OramResult<Vec<V>>>()?;
        Self::from_parts(InMemoryBlockStore::new(sealed), config, rng, cipher)
    }
}

impl<V: Clone, R: RngCore, S: BlockStore<V>> PathOram<V, R, S> {
    /// Build a store over an existing block store whose payloads are already
    /// sealed by `cipher`.
    ///
    /// Every block gets a uniformly random leaf, drawn in block id order, and
    /// is placed in the deepest bucket on that leaf's path with room left.
    /// Blocks whose whole path is full start in the stash.
    pub fn from_parts(
        store: S,
        config: OramConfig,
        mut rng: R,
        cipher: Box<dyn PayloadCipher<V>>,
    ) -> OramResult<Self> {
        config.validate()?;
        let block_count = store.len();
        let geometry = TreeGeometry::for_block_count(block_count)?;
        let mut positions = PositionMap::new(block_count, geometry.total_leaves());
        let mut buckets = BucketStore::new(geometry.total_nodes(), config.bucket_capacity)?;
        let mut stash = Stash::new();

        for i in 0..block_count {
            let block = BlockId::new(i);
            let leaf = PositionMap::draw(geometry.total_leaves(), &mut rng);
            positions.assign(block, leaf)?;

            let path = geometry.path(leaf)?;
            let mut target = None;
            for (_, node) in path.leaf_to_root() {
                if buckets.has_room(node)? {
                    target = Some(node);
                    break;
                }
            }
            match target {
                Some(node) => buckets.place(node, block)?,
                None => {
                    let payload = open(cipher.as_ref(), block, store.get(block)?)?;
                    stash.insert(block, payload);
                }
            }
        }

        let mut stats = AccessStats::default();
        stats.observe_stash(stash.size());
        info!(
            blocks = block_count,
            height = geometry.height(),
            buckets = geometry.total_nodes(),
            capacity = config.bucket_capacity,
            stash = stash.size(),
            "path ORAM initialized"
        );

        Ok(Self {
            geometry,
            config,
            block_count,
            store,
            positions,
            buckets,
            stash,
            rng,
            cipher,
            stats,
            last_path: None,
            poisoned: false,
        })
    }

    // ---- Access ----

    /// Perform one logical access.
    ///
    /// Reads return [`Response::Value`] with the block's current payload;
    /// writes return [`Response::Written`]. A block id outside `[0, N)` is
    /// rejected with `InvalidArgument` before anything changes.
    pub fn access(&mut self, op: Op<V>, block: BlockId) -> OramResult<Response<V>> {
        if self.poisoned {
            return Err(OramError::Poisoned);
        }
        if block.index() >= self.block_count {
            return Err(OramError::InvalidArgument(format!(
                "block {block} outside [0, {})",
                self.block_count
            )));
        }
        let old_leaf = self.positions.get(block)?;
        let path = self.geometry.path(old_leaf)?;
        let code = op.code();
        let op = match op {
            Op::Read => Op::Read,
            Op::Write(value) => {
                let sealed = self.seal(block, value.clone())?;
                Op::Write((value, sealed))
            }
        };

        // Validation is done; everything below mutates state.
        let result = self
            .run(op, block, &path)
            .and_then(|response| self.post_access_audit().map(|()| response));
        match result {
            Ok(response) => {
                match code {
                    OpCode::Read => self.stats.reads += 1,
                    OpCode::Write => self.stats.writes += 1,
                }
                self.stats.observe_stash(self.stash.size());
                self.last_path = Some(path);
                Ok(response)
            }
            Err(err) => {
                error!(
                    op = %code,
                    block = %block,
                    error = %err,
                    "access failed mid-transaction; store poisoned"
                );
                self.poisoned = true;
                Err(err)
            }
        }
    }

    /// Read a block's payload.
    pub fn read(&mut self, block: BlockId) -> OramResult<V> {
        self.access(Op::Read, block)?
            .into_value()
            .ok_or(OramError::BlockNotFound(block))
    }

    /// Replace a block's payload.
    pub fn write(&mut self, block: BlockId, value: V) -> OramResult<()> {
        self.access(Op::Write(value), block).map(|_| ())
    }

    /// Access with the raw numeric encoding: `0` reads, `1` writes `value`.
    /// Any other code is `InvalidArgument`.
    pub fn access_code(&mut self, code: u8, block: usize, value: V) -> OramResult<Response<V>> {
        let code = OpCode::try_from(code)?;
        self.access(Op::from_code(code, value), BlockId::new(block))
    }

    fn run(
        &mut self,
        op: Op<(V, V)>,
        block: BlockId,
        path: &TreePath,
    ) -> OramResult<Response<V>> {
        let code = op.code();
        self.positions.reassign(block, &mut self.rng)?;

        let staged = self.buckets.read_path(path)?;
        for &id in &staged {
            let payload = open(self.cipher.as_ref(), id, self.store.get(id)?)?;
            self.stash.insert(id, payload);
        }

        let response = match op {
            Op::Read => {
                let value = self
                    .stash
                    .lookup(block)
                    .cloned()
                    .ok_or(OramError::BlockNotFound(block))?;
                Response::Value(value)
            }
            Op::Write((value, sealed)) => {
                self.stash.insert(block, value);
                self.store.update(block, sealed)?;
                Response::Written
            }
        };

        let evicted = self.evict(path)?;
        debug!(
            op = %code,
            block = %block,
            staged = staged.len(),
            evicted,
            stash = self.stash.size(),
            "access complete"
        );
        if let Some(threshold) = self.config.stash_warn_threshold {
            if self.stash.size() > threshold {
                warn!(
                    stash = self.stash.size(),
                    threshold, "stash above warning threshold"
                );
            }
        }
        Ok(response)
    }

    /// Write stash blocks back onto `path`, leaf first. Each bucket takes the
    /// earliest-inserted stash blocks whose current path passes through it,
    /// until it is full or none are left.
    fn evict(&mut self, path: &TreePath) -> OramResult<usize> {
        let mut evicted = 0;
        for (depth, node) in path.leaf_to_root() {
            while self.buckets.has_room(node)? {
                let Some(id) = self.first_eligible(node, depth)? else {
                    break;
                };
                self.buckets.place(node, id)?;
                self.stash.remove(id);
                evicted += 1;
            }
        }
        self.stats.blocks_evicted += evicted as u64;
        Ok(evicted)
    }

    fn first_eligible(&self, node: NodeIndex, depth: usize) -> OramResult<Option<BlockId>> {
        for id in self.stash.ids() {
            let leaf = self.positions.get(id)?;
            if self.geometry.node_at_depth(leaf, depth)? == node {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    fn post_access_audit(&self) -> OramResult<()> {
        if !self.config.audit_after_access {
            return Ok(());
        }
        let report = self.verify_integrity();
        match report.violations.first() {
            None => Ok(()),
            Some(first) => Err(OramError::IntegrityViolation {
                count: report.violations.len(),
                first: first.to_string(),
            }),
        }
    }

    fn seal(&self, block: BlockId, value: V) -> OramResult<V> {
        self.cipher.seal(block, value).map_err(|e| OramError::Cipher {
            block,
            reason: e.0,
        })
    }

    // ---- Geometry ----

    /// Tree height, fixed at construction.
    pub fn height(&self) -> usize {
        self.geometry.height()
    }

    pub fn total_nodes(&self) -> usize {
        self.geometry.total_nodes()
    }

    pub fn total_leaves(&self) -> usize {
        self.geometry.total_leaves()
    }

    pub fn geometry(&self) -> &TreeGeometry {
        &self.geometry
    }

    pub fn leaf_index(&self, leaf: LeafId) -> OramResult<NodeIndex> {
        Ok(self.geometry.leaf_index(leaf)?)
    }

    pub fn path(&self, leaf: LeafId) -> OramResult<TreePath> {
        Ok(self.geometry.path(leaf)?)
    }

    // ---- Diagnostics ----

    /// Number of real blocks `N`.
    pub fn block_count(&self) -> usize {
        self.block_count
    }

    pub fn bucket_capacity(&self) -> usize {
        self.buckets.capacity()
    }

    pub fn config(&self) -> &OramConfig {
        &self.config
    }

    pub fn position_map_snapshot(&self) -> BTreeMap<BlockId, LeafId> {
        self.positions.snapshot()
    }

    /// Per-node slot contents, in node order.
    pub fn bucket_snapshot(&self) -> Vec<Vec<Slot>> {
        self.buckets.snapshot()
    }

    /// Opened payloads of every block, in id order.
    pub fn data_snapshot(&self) -> OramResult<Vec<V>> {
        self.store
            .snapshot()?
            .into_iter()
            .enumerate()
            .map(|(i, sealed)| open(self.cipher.as_ref(), BlockId::new(i), sealed))
            .collect()
    }

    /// Blocks currently in flight. Sustained growth means eviction is failing
    /// to keep up with the bucket capacity.
    pub fn stash_size(&self) -> usize {
        self.stash.size()
    }

    /// Stash block ids in insertion order.
    pub fn stash_ids(&self) -> Vec<BlockId> {
        self.stash.ids().collect()
    }

    pub fn stats(&self) -> AccessStats {
        self.stats
    }

    /// Nodes touched by the most recent successful access: what an observer
    /// of the physical store sees.
    pub fn last_path(&self) -> Option<&TreePath> {
        self.last_path.as_ref()
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Audit every store-wide invariant.
    pub fn verify_integrity(&self) -> IntegrityReport {
        IntegrityAuditor::audit(
            &self.geometry,
            &self.positions,
            &self.buckets,
            &self.stash,
            self.block_count,
        )
    }
}

impl<V, R, S> std::fmt::Debug for PathOram<V, R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathOram")
            .field("block_count", &self.block_count)
            .field("height", &self.geometry.height())
            .field("bucket_capacity", &self.buckets.capacity())
            .field("stash_size", &self.stash.size())
            .field("poisoned", &self.poisoned)
            .finish()
    }
}

fn open<V>(cipher: &dyn PayloadCipher<V>, block: BlockId, sealed: V) -> OramResult<V> {
    cipher.open(block, sealed).map_err(|e| OramError::Cipher {
        block,
        reason: e.0,
    })
}
