//! Shared test helpers for property and scenario tests.

use std::collections::HashMap;

use cali_consensus::CheckpointDataset;
use cali_core::types::{BlockMeta, ChainPosition, Hash256};

/// Simple hash from a seed byte.
pub fn hash(seed: u8) -> Hash256 {
    Hash256([seed; 32])
}

/// Candidate block summary.
pub fn block(hash: Hash256, prev_hash: Hash256, timestamp: u64, tx_count: u64) -> BlockMeta {
    BlockMeta {
        hash,
        prev_hash,
        timestamp,
        tx_count,
    }
}

/// Block index holding exactly the checkpoint blocks at `heights`.
///
/// Heights with no checkpoint in `dataset` are skipped.
pub fn index_with_checkpoints(
    dataset: &CheckpointDataset,
    heights: &[u64],
) -> HashMap<Hash256, ChainPosition> {
    heights
        .iter()
        .filter_map(|&height| {
            dataset.hash_at(height).map(|&hash| {
                (
                    hash,
                    ChainPosition {
                        hash,
                        height,
                        timestamp: 0,
                        chain_tx: height,
                    },
                )
            })
        })
        .collect()
}
