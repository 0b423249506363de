//! Trait interfaces between crates.
//!
//! - [`BlockIndex`] — read-only hash → block metadata lookup (the node's chain
//!   index implements it; checkpoint code consumes it)

use std::collections::HashMap;

use crate::types::{ChainPosition, Hash256};

/// Read-only view of the local block index.
///
/// Checkpoint queries treat an implementation as a point-in-time snapshot and
/// never keep a reference past the call.
pub trait BlockIndex {
    /// Look up a block by hash. Returns `None` if it is not in the index.
    fn lookup(&self, hash: &Hash256) -> Option<ChainPosition>;

    /// Check whether a block is present.
    ///
    /// Default implementation delegates to [`lookup`](Self::lookup).
    fn contains(&self, hash: &Hash256) -> bool {
        self.lookup(hash).is_some()
    }
}

impl BlockIndex for HashMap<Hash256, ChainPosition> {
    fn lookup(&self, hash: &Hash256) -> Option<ChainPosition> {
        self.get(hash).copied()
    }

    fn contains(&self, hash: &Hash256) -> bool {
        self.contains_key(hash)
    }
}

impl<T: BlockIndex + ?Sized> BlockIndex for &T {
    fn lookup(&self, hash: &Hash256) -> Option<ChainPosition> {
        (**self).lookup(hash)
    }

    fn contains(&self, hash: &Hash256) -> bool {
        (**self).contains(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashmap_index_lookup() {
        let pos = ChainPosition {
            hash: Hash256([3; 32]),
            height: 3,
            timestamp: 1_000,
            chain_tx: 9,
        };
        let mut map = HashMap::new();
        map.insert(pos.hash, pos);

        assert_eq!(map.lookup(&pos.hash), Some(pos));
        assert!(map.contains(&pos.hash));
        assert_eq!(map.lookup(&Hash256([4; 32])), None);
        assert!(!map.contains(&Hash256::ZERO));
    }

    #[test]
    fn reference_forwards_to_inner() {
        let map: HashMap<Hash256, ChainPosition> = HashMap::new();
        let by_ref = &map;
        assert!(!BlockIndex::contains(&by_ref, &Hash256([1; 32])));
    }
}
