//! In-memory block index.
//!
//! [`MemoryBlockIndex`] derives each block's height and cumulative
//! transaction count from its parent and tracks the best tip by height.
//! The node wraps it in a lock; it is not synchronised on its own.

use std::collections::HashMap;

use crate::error::ChainIndexError;
use crate::traits::BlockIndex;
use crate::types::{BlockMeta, ChainPosition, Hash256};

/// Hash → position map with best-tip tracking.
#[derive(Debug, Default, Clone)]
pub struct MemoryBlockIndex {
    /// Every connected block by hash.
    entries: HashMap<Hash256, ChainPosition>,
    /// Hash of the highest block. `None` until genesis is connected.
    tip: Option<Hash256>,
}

impl MemoryBlockIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blocks in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no blocks have been connected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the best tip, or `None` for an empty index.
    pub fn tip(&self) -> Option<ChainPosition> {
        self.tip.and_then(|hash| self.entries.get(&hash).copied())
    }

    /// Position of a block by hash.
    pub fn get(&self, hash: &Hash256) -> Option<&ChainPosition> {
        self.entries.get(hash)
    }

    /// Add a block to the index.
    ///
    /// A block with `prev_hash == Hash256::ZERO` is genesis and is only
    /// accepted into an empty index. Any other block must extend a known
    /// parent; it may fork off anywhere, not only the tip.
    ///
    /// # Errors
    ///
    /// - [`ChainIndexError::DuplicateBlock`] if the hash is already indexed
    /// - [`ChainIndexError::GenesisAlreadySet`] for a second genesis
    /// - [`ChainIndexError::UnknownParent`] if the parent is not indexed
    /// - [`ChainIndexError::TxCountOverflow`] if the cumulative count overflows
    pub fn connect(&mut self, meta: BlockMeta) -> Result<ChainPosition, ChainIndexError> {
        if self.entries.contains_key(&meta.hash) {
            return Err(ChainIndexError::DuplicateBlock(meta.hash));
        }

        let position = if meta.prev_hash.is_zero() {
            if !self.entries.is_empty() {
                return Err(ChainIndexError::GenesisAlreadySet);
            }
            ChainPosition {
                hash: meta.hash,
                height: 0,
                timestamp: meta.timestamp,
                chain_tx: meta.tx_count,
            }
        } else {
            let parent = self
                .entries
                .get(&meta.prev_hash)
                .ok_or(ChainIndexError::UnknownParent(meta.prev_hash))?;
            let chain_tx = parent
                .chain_tx
                .checked_add(meta.tx_count)
                .ok_or(ChainIndexError::TxCountOverflow(meta.hash))?;
            ChainPosition {
                hash: meta.hash,
                height: parent.height + 1,
                timestamp: meta.timestamp,
                chain_tx,
            }
        };

        self.entries.insert(meta.hash, position);
        let better = self.tip().is_none_or(|tip| position.height > tip.height);
        if better {
            self.tip = Some(meta.hash);
        }
        Ok(position)
    }
}

impl BlockIndex for MemoryBlockIndex {
    fn lookup(&self, hash: &Hash256) -> Option<ChainPosition> {
        self.entries.get(hash).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn h(seed: u8) -> Hash256 {
        Hash256([seed; 32])
    }

    fn meta(hash: u8, prev: Hash256, timestamp: u64, tx_count: u64) -> BlockMeta {
        BlockMeta {
            hash: h(hash),
            prev_hash: prev,
            timestamp,
            tx_count,
        }
    }

    #[test]
    fn new_index_is_empty() {
        let index = MemoryBlockIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.tip(), None);
    }

    #[test]
    fn connect_genesis() {
        let mut index = MemoryBlockIndex::new();
        let pos = index.connect(meta(1, Hash256::ZERO, 1_000, 1)).unwrap();
        assert_eq!(pos.height, 0);
        assert_eq!(pos.chain_tx, 1);
        assert_eq!(index.tip(), Some(pos));
        assert!(index.contains(&h(1)));
    }

    #[test]
    fn connect_accumulates_height_and_tx_count() {
        let mut index = MemoryBlockIndex::new();
        index.connect(meta(1, Hash256::ZERO, 1_000, 1)).unwrap();
        index.connect(meta(2, h(1), 1_060, 4)).unwrap();
        let pos = index.connect(meta(3, h(2), 1_120, 10)).unwrap();

        assert_eq!(pos.height, 2);
        assert_eq!(pos.chain_tx, 15);
        assert_eq!(pos.timestamp, 1_120);
        assert_eq!(index.tip().map(|t| t.hash), Some(h(3)));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn second_genesis_rejected() {
        let mut index = MemoryBlockIndex::new();
        index.connect(meta(1, Hash256::ZERO, 1_000, 1)).unwrap();
        let err = index.connect(meta(2, Hash256::ZERO, 1_000, 1)).unwrap_err();
        assert_eq!(err, ChainIndexError::GenesisAlreadySet);
    }

    #[test]
    fn unknown_parent_rejected() {
        let mut index = MemoryBlockIndex::new();
        let err = index.connect(meta(2, h(9), 1_000, 1)).unwrap_err();
        assert_eq!(err, ChainIndexError::UnknownParent(h(9)));
    }

    #[test]
    fn duplicate_rejected() {
        let mut index = MemoryBlockIndex::new();
        index.connect(meta(1, Hash256::ZERO, 1_000, 1)).unwrap();
        let err = index.connect(meta(1, Hash256::ZERO, 1_000, 1)).unwrap_err();
        assert_eq!(err, ChainIndexError::DuplicateBlock(h(1)));
    }

    #[test]
    fn fork_at_equal_height_keeps_first_tip() {
        let mut index = MemoryBlockIndex::new();
        index.connect(meta(1, Hash256::ZERO, 1_000, 1)).unwrap();
        index.connect(meta(2, h(1), 1_060, 1)).unwrap();
        index.connect(meta(3, h(1), 1_061, 1)).unwrap();
        assert_eq!(index.tip().map(|t| t.hash), Some(h(2)));

        // Extending the side branch makes it the best tip.
        index.connect(meta(4, h(3), 1_120, 1)).unwrap();
        assert_eq!(index.tip().map(|t| t.hash), Some(h(4)));
    }

    #[test]
    fn tx_count_overflow_rejected() {
        let mut index = MemoryBlockIndex::new();
        index.connect(meta(1, Hash256::ZERO, 1_000, u64::MAX)).unwrap();
        let err = index.connect(meta(2, h(1), 1_060, 1)).unwrap_err();
        assert_eq!(err, ChainIndexError::TxCountOverflow(h(2)));
    }

    // --- proptest ---

    proptest! {
        #[test]
        fn linear_chain_sums_tx_counts(counts in prop::collection::vec(0u64..10_000, 1..64)) {
            let mut index = MemoryBlockIndex::new();
            let mut prev = Hash256::ZERO;
            let mut total = 0u64;
            for (i, &tx_count) in counts.iter().enumerate() {
                let mut bytes = [0u8; 32];
                bytes[..8].copy_from_slice(&(i as u64 + 1).to_le_bytes());
                let hash = Hash256(bytes);
                let pos = index
                    .connect(BlockMeta { hash, prev_hash: prev, timestamp: i as u64, tx_count })
                    .unwrap();
                total += tx_count;
                prop_assert_eq!(pos.height, i as u64);
                prop_assert_eq!(pos.chain_tx, total);
                prev = hash;
            }
            prop_assert_eq!(index.tip().map(|t| t.hash), Some(prev));
        }
    }
}
