use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::BlockId;

/// One slot of a bucket.
///
/// A vacant slot is a dummy: it occupies physical space but carries no real
/// block and is never staged into the stash.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    #[default]
    Vacant,
    Occupied(BlockId),
}

impl Slot {
    pub fn is_vacant(&self) -> bool {
        matches!(self, Slot::Vacant)
    }

    /// The resident block, if any.
    pub fn block(&self) -> Option<BlockId> {
        match self {
            Slot::Vacant => None,
            Slot::Occupied(id) => Some(*id),
        }
    }

    /// Empty the slot and return what it held.
    pub fn take(&mut self) -> Option<BlockId> {
        std::mem::take(self).block()
    }
}

impl From<Option<BlockId>> for Slot {
    fn from(block: Option<BlockId>) -> Self {
        match block {
            Some(id) => Slot::Occupied(id),
            None => Slot::Vacant,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Vacant => write!(f, "-"),
            Slot::Occupied(id) => write!(f, "{id}"),
        }
    }
}
