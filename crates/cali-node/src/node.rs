//! Block acceptance and sync status.
//!
//! The [`Node`] owns the local block index and consults the shared
//! [`CheckpointRegistry`] before any candidate block is indexed. A block that
//! conflicts with a checkpoint, or forks below the last indexed checkpoint,
//! is remembered as rejected so that everything built on it is discarded too.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info};

use cali_consensus::CheckpointRegistry;
use cali_core::block_index::MemoryBlockIndex;
use cali_core::error::{ChainIndexError, CheckpointError};
use cali_core::types::{BlockMeta, ChainPosition, Hash256};

use crate::config::NodeConfig;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error(transparent)] Checkpoint(#[from] CheckpointError),
    #[error(transparent)] ChainIndex(#[from] ChainIndexError),
    #[error("config: {0}")] Config(#[from] ::config::ConfigError),
    #[error("block {0} was previously rejected or builds on a rejected block")] BlockRejected(Hash256),
}

/// Snapshot reported by the status path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyncStatus {
    /// Height of the best tip, `None` before genesis.
    pub tip_height: Option<u64>,
    /// Estimated verification progress in `[0, 1]`.
    pub progress: f64,
    /// Highest enforced checkpoint height (0 when not enforced).
    pub highest_checkpoint: u64,
    /// Highest checkpoint block present in the local index.
    pub last_checkpoint: Option<ChainPosition>,
    /// Whether the tip is still below the highest checkpoint.
    pub initial_download: bool,
}

/// Local chain index gated by checkpoints.
pub struct Node {
    config: NodeConfig,
    checkpoints: Arc<CheckpointRegistry>,
    index: RwLock<MemoryBlockIndex>,
    /// Hashes permanently refused by the checkpoint gate.
    rejected: RwLock<HashSet<Hash256>>,
}

impl Node {
    /// Create a node, building the checkpoint registry for the configured
    /// network.
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        let registry = CheckpointRegistry::new(config.network_type, config.checkpoints)?;
        Ok(Self::with_registry(config, Arc::new(registry)))
    }

    /// Create a node around an existing registry.
    pub fn with_registry(config: NodeConfig, checkpoints: Arc<CheckpointRegistry>) -> Self {
        Self {
            config,
            checkpoints,
            index: RwLock::new(MemoryBlockIndex::new()),
            rejected: RwLock::new(HashSet::new()),
        }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Shared handle to the checkpoint registry.
    pub fn checkpoints(&self) -> &Arc<CheckpointRegistry> {
        &self.checkpoints
    }

    /// Validate a candidate block against checkpoints and index it.
    ///
    /// # Errors
    ///
    /// - [`NodeError::ChainIndex`] if the index refuses it (duplicate,
    ///   unknown parent); such blocks may be retried later
    /// - [`NodeError::BlockRejected`] if the block or its parent failed a
    ///   checkpoint before
    /// - [`NodeError::Checkpoint`] on a checkpoint mismatch or a fork below
    ///   the last checkpoint (the block is then rejected permanently)
    pub fn accept_block(&self, meta: BlockMeta) -> Result<ChainPosition, NodeError> {
        let mut index = self.index.write();
        if index.get(&meta.hash).is_some() {
            return Err(ChainIndexError::DuplicateBlock(meta.hash).into());
        }
        {
            // Only checkpoint failures are recorded; descendants are refused
            // through their parent link.
            let rejected = self.rejected.read();
            if rejected.contains(&meta.hash) || rejected.contains(&meta.prev_hash) {
                debug!(hash = %meta.hash, "discarding block on rejected chain");
                return Err(NodeError::BlockRejected(meta.hash));
            }
        }

        let height = if meta.prev_hash.is_zero() {
            0
        } else {
            index
                .get(&meta.prev_hash)
                .map(|parent| parent.height + 1)
                .ok_or(ChainIndexError::UnknownParent(meta.prev_hash))?
        };

        let verdict = self
            .checkpoints
            .check_block(height, &meta.hash)
            .and_then(|()| self.checkpoints.check_fork_height(height, &*index));
        if let Err(e) = verdict {
            self.rejected.write().insert(meta.hash);
            return Err(e.into());
        }

        let position = index.connect(meta)?;
        debug!(
            height = position.height,
            hash = %position.hash,
            chain_tx = position.chain_tx,
            "accepted block"
        );
        if self.checkpoints.active_dataset().hash_at(position.height) == Some(&position.hash) {
            info!(height = position.height, "reached checkpoint");
        }
        Ok(position)
    }

    /// Whether `hash` has been permanently rejected.
    pub fn is_rejected(&self, hash: &Hash256) -> bool {
        self.rejected.read().contains(hash)
    }

    /// Position of the best tip.
    pub fn tip(&self) -> Option<ChainPosition> {
        self.index.read().tip()
    }

    /// Position of an indexed block.
    pub fn lookup(&self, hash: &Hash256) -> Option<ChainPosition> {
        self.index.read().get(hash).copied()
    }

    /// Sync status at wall-clock time `now` (Unix seconds).
    pub fn sync_status(&self, now: u64) -> SyncStatus {
        let index = self.index.read();
        let tip = index.tip();
        SyncStatus {
            tip_height: tip.map(|t| t.height),
            progress: self.checkpoints.estimate_progress(tip.as_ref(), now),
            highest_checkpoint: self.checkpoints.highest_checkpoint_height(),
            last_checkpoint: self.checkpoints.find_last_checkpointed_block(&*index),
            initial_download: self
                .checkpoints
                .is_initial_block_download(tip.map_or(0, |t| t.height)),
        }
    }
}
