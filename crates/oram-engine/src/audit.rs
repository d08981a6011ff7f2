use std::fmt;

use serde::{Deserialize, Serialize};

use oram_store::{BucketStore, PositionMap, Stash};
use oram_tree::TreeGeometry;
use oram_types::{BlockId, NodeIndex};

/// Result of a full integrity audit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub block_count: usize,
    /// Blocks found in buckets.
    pub resident: usize,
    /// Blocks found in the stash.
    pub stashed: usize,
    pub violations: Vec<Violation>,
}

impl IntegrityReport {
    /// Returns `true` if every invariant holds.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// One broken invariant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub block: BlockId,
    pub kind: ViolationKind,
    pub description: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} on {}: {}", self.kind, self.block, self.description)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// A real block has no position map entry.
    MissingPosition,
    /// A real block is in neither the buckets nor the stash.
    MissingBlock,
    /// A block appears in more than one place.
    DuplicateBlock,
    /// A resident block sits in a bucket off its assigned path.
    OffPath,
    /// A bucket or stash holds an id outside `[0, N)`.
    UnknownOccupant,
}

/// Checks the store-wide invariants:
/// - every block has exactly one position map entry;
/// - every block is in exactly one place, a bucket or the stash;
/// - every resident block lies on the path of its current leaf.
///
/// Bucket capacity needs no check: buckets have a fixed number of slots.
pub struct IntegrityAuditor;

impl IntegrityAuditor {
    pub fn audit<V>(
        geometry: &TreeGeometry,
        positions: &PositionMap,
        buckets: &BucketStore,
        stash: &Stash<V>,
        block_count: usize,
    ) -> IntegrityReport {
        let mut violations = Vec::new();
        let mut locations: Vec<Vec<Option<NodeIndex>>> = vec![Vec::new(); block_count];

        for i in 0..block_count {
            let id = BlockId::new(i);
            if positions.get(id).is_err() {
                violations.push(Violation {
                    block: id,
                    kind: ViolationKind::MissingPosition,
                    description: "no leaf assigned".into(),
                });
            }
        }

        let mut resident = 0;
        for (node, id) in buckets.occupied() {
            resident += 1;
            let Some(seen) = locations.get_mut(id.index()) else {
                violations.push(Violation {
                    block: id,
                    kind: ViolationKind::UnknownOccupant,
                    description: format!("found in bucket {node}"),
                });
                continue;
            };
            seen.push(Some(node));

            if let Ok(leaf) = positions.get(id) {
                let on_path = geometry.is_on_path(node, leaf).unwrap_or(false);
                if !on_path {
                    violations.push(Violation {
                        block: id,
                        kind: ViolationKind::OffPath,
                        description: format!("in bucket {node}, assigned to {leaf}"),
                    });
                }
            }
        }

        let mut stashed = 0;
        for id in stash.ids() {
            stashed += 1;
            match locations.get_mut(id.index()) {
                Some(seen) => seen.push(None),
                None => violations.push(Violation {
                    block: id,
                    kind: ViolationKind::UnknownOccupant,
                    description: "found in stash".into(),
                }),
            }
        }

        for (i, seen) in locations.iter().enumerate() {
            let id = BlockId::new(i);
            match seen.len() {
                0 => violations.push(Violation {
                    block: id,
                    kind: ViolationKind::MissingBlock,
                    description: "not in any bucket or the stash".into(),
                }),
                1 => {}
                n => violations.push(Violation {
                    block: id,
                    kind: ViolationKind::DuplicateBlock,
                    description: format!("found {n} times: {}", describe(seen)),
                }),
            }
        }

        IntegrityReport {
            block_count,
            resident,
            stashed,
            violations,
        }
    }
}

fn describe(seen: &[Option<NodeIndex>]) -> String {
    seen.iter()
        .map(|loc| match loc {
            Some(node) => node.to_string(),
            None => "stash".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
