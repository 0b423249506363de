//! Header checkpoint verification.
//!
//! Pins known-good (height, hash) pairs so that any candidate chain that
//! disagrees with a pinned hash is rejected, and so that reorgs cannot unwind
//! past the last checkpoint the local index holds.
//!
//! # Attack vectors
//!
//! - **Long-range rewrite:** Without checkpoints an attacker with sufficient
//!   hash power could rewrite arbitrarily deep history. Forks below the last
//!   locally-present checkpoint are rejected outright.
//!
//! - **Checkpoint spoofing:** The checkpoint tables are compiled into the
//!   binary. An attacker would need to distribute a modified binary.
//!
//! # Usage
//!
//! Build one [`CheckpointRegistry`] at startup from the network selection and
//! the `checkpoints` configuration flag, then share it (it is immutable). The
//! block acceptance path calls [`CheckpointRegistry::check_block`] for every
//! candidate and [`CheckpointRegistry::check_fork_height`] before extending a
//! side branch. Testnet checkpoints are informational and never enforced.

use std::collections::BTreeMap;

use cali_core::constants::{
    NetworkType, MAINNET_CHECKPOINTS, MAINNET_LAST_CHECKPOINT_TIME,
    MAINNET_LAST_CHECKPOINT_TX_COUNT, MAINNET_TX_PER_DAY, TESTNET_CHECKPOINTS,
    TESTNET_LAST_CHECKPOINT_TIME, TESTNET_LAST_CHECKPOINT_TX_COUNT, TESTNET_TX_PER_DAY,
};
use cali_core::error::CheckpointError;
use cali_core::traits::BlockIndex;
use cali_core::types::{ChainPosition, Hash256};
use tracing::{debug, info, warn};

use crate::progress;

/// An immutable, network-scoped checkpoint table plus the statistics the
/// progress estimator projects from.
///
/// `last_checkpoint_time` and `last_checkpoint_tx_count` describe the block at
/// the highest height in the table. That is true by construction of the
/// compiled-in tables and is not checked.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointDataset {
    checkpoints: BTreeMap<u64, Hash256>,
    last_checkpoint_time: u64,
    last_checkpoint_tx_count: u64,
    tx_per_day: f64,
}

impl CheckpointDataset {
    /// Build a dataset from `(height, hash)` pairs in any order.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::ConflictingCheckpoint`] if one height is
    /// listed twice with different hashes. Exact repeats are harmless.
    pub fn from_list(
        list: impl IntoIterator<Item = (u64, Hash256)>,
        last_checkpoint_time: u64,
        last_checkpoint_tx_count: u64,
        tx_per_day: f64,
    ) -> Result<Self, CheckpointError> {
        let mut checkpoints = BTreeMap::new();
        for (height, hash) in list {
            if let Some(existing) = checkpoints.insert(height, hash) {
                if existing != hash {
                    return Err(CheckpointError::ConflictingCheckpoint(height));
                }
            }
        }
        Ok(Self {
            checkpoints,
            last_checkpoint_time,
            last_checkpoint_tx_count,
            tx_per_day,
        })
    }

    /// Like [`from_list`](Self::from_list) but parses hex hashes.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::InvalidHash`] for an unparsable hash, or
    /// [`CheckpointError::ConflictingCheckpoint`] as for `from_list`.
    pub fn from_hex_list(
        list: &[(u64, &str)],
        last_checkpoint_time: u64,
        last_checkpoint_tx_count: u64,
        tx_per_day: f64,
    ) -> Result<Self, CheckpointError> {
        let parsed = list
            .iter()
            .map(|&(height, hex)| {
                Hash256::from_hex(hex)
                    .map(|hash| (height, hash))
                    .map_err(|source| CheckpointError::InvalidHash { height, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_list(
            parsed,
            last_checkpoint_time,
            last_checkpoint_tx_count,
            tx_per_day,
        )
    }

    /// The compiled-in mainnet dataset.
    pub fn mainnet() -> Result<Self, CheckpointError> {
        Self::from_hex_list(
            MAINNET_CHECKPOINTS,
            MAINNET_LAST_CHECKPOINT_TIME,
            MAINNET_LAST_CHECKPOINT_TX_COUNT,
            MAINNET_TX_PER_DAY,
        )
    }

    /// The compiled-in testnet dataset.
    pub fn testnet() -> Result<Self, CheckpointError> {
        Self::from_hex_list(
            TESTNET_CHECKPOINTS,
            TESTNET_LAST_CHECKPOINT_TIME,
            TESTNET_LAST_CHECKPOINT_TX_COUNT,
            TESTNET_TX_PER_DAY,
        )
    }

    /// The compiled-in dataset for `network`.
    pub fn for_network(network: NetworkType) -> Result<Self, CheckpointError> {
        match network {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Testnet => Self::testnet(),
        }
    }

    /// The pinned hash at `height`, if any.
    pub fn hash_at(&self, height: u64) -> Option<&Hash256> {
        self.checkpoints.get(&height)
    }

    /// The highest checkpoint.
    pub fn last_checkpoint(&self) -> Option<(u64, &Hash256)> {
        self.checkpoints.last_key_value().map(|(h, hash)| (*h, hash))
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Checkpoints by ascending height.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (u64, &Hash256)> {
        self.checkpoints.iter().map(|(h, hash)| (*h, hash))
    }

    /// Checkpoints by descending height.
    pub fn iter_rev(&self) -> impl Iterator<Item = (u64, &Hash256)> {
        self.iter().rev()
    }

    /// Unix timestamp of the last checkpoint block.
    pub fn last_checkpoint_time(&self) -> u64 {
        self.last_checkpoint_time
    }

    /// Transactions from genesis up to and including the last checkpoint block.
    pub fn last_checkpoint_tx_count(&self) -> u64 {
        self.last_checkpoint_tx_count
    }

    /// Estimated transactions per day after the last checkpoint.
    pub fn tx_per_day(&self) -> f64 {
        self.tx_per_day
    }
}

/// The active checkpoint dataset plus the enforcement policy.
///
/// Every query is a total function: absence of data is "no opinion" (`true`),
/// `0` or `None`, never an error.
#[derive(Debug, Clone)]
pub struct CheckpointRegistry {
    dataset: CheckpointDataset,
    network: NetworkType,
    enabled: bool,
}

impl CheckpointRegistry {
    /// Build the registry for `network` from the compiled-in tables.
    ///
    /// `enabled` is the administrative `checkpoints` switch.
    pub fn new(network: NetworkType, enabled: bool) -> Result<Self, CheckpointError> {
        let dataset = CheckpointDataset::for_network(network)?;
        info!(
            ?network,
            enabled,
            checkpoints = dataset.len(),
            "checkpoint registry initialised"
        );
        Ok(Self::with_dataset(dataset, network, enabled))
    }

    /// Build a registry around an explicit dataset.
    pub fn with_dataset(dataset: CheckpointDataset, network: NetworkType, enabled: bool) -> Self {
        Self {
            dataset,
            network,
            enabled,
        }
    }

    /// The dataset for the selected network.
    pub fn active_dataset(&self) -> &CheckpointDataset {
        &self.dataset
    }

    pub fn network(&self) -> NetworkType {
        self.network
    }

    /// Whether checkpoints are enforced: enabled and on mainnet.
    pub fn enforcing(&self) -> bool {
        self.enabled && self.network == NetworkType::Mainnet
    }

    /// Whether `hash` is acceptable at `height`.
    ///
    /// `true` when checkpoints are not enforced or `height` has no checkpoint.
    pub fn is_hash_pinned_at(&self, height: u64, hash: &Hash256) -> bool {
        if !self.enforcing() {
            return true;
        }
        match self.dataset.hash_at(height) {
            Some(expected) => expected == hash,
            None => true,
        }
    }

    /// Gate for the block acceptance path.
    ///
    /// A mismatch is a permanent verdict on the candidate and on every block
    /// built on it.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::Mismatch`] when [`is_hash_pinned_at`](Self::is_hash_pinned_at)
    /// is `false`.
    pub fn check_block(&self, height: u64, hash: &Hash256) -> Result<(), CheckpointError> {
        if self.is_hash_pinned_at(height, hash) {
            return Ok(());
        }
        // is_hash_pinned_at only fails when a pinned hash exists.
        let expected = self.dataset.hash_at(height).copied().unwrap_or_default();
        warn!(
            height,
            got = %hash,
            expected = %expected,
            "block conflicts with checkpoint"
        );
        Err(CheckpointError::Mismatch {
            height,
            expected,
            got: *hash,
        })
    }

    /// Height of the highest checkpoint, or 0 when checkpoints are not
    /// enforced or there are none.
    pub fn highest_checkpoint_height(&self) -> u64 {
        if !self.enforcing() {
            return 0;
        }
        self.dataset.last_checkpoint().map_or(0, |(h, _)| h)
    }

    /// The highest checkpoint whose block the local index already holds.
    ///
    /// Scans from the highest checkpoint downwards. `None` when checkpoints
    /// are not enforced or no checkpoint block is indexed yet.
    pub fn find_last_checkpointed_block<I>(&self, index: &I) -> Option<ChainPosition>
    where
        I: BlockIndex + ?Sized,
    {
        if !self.enforcing() {
            return None;
        }
        self.dataset
            .iter_rev()
            .find_map(|(_, hash)| index.lookup(hash))
    }

    /// Reject a block at `height` that would fork below the last checkpoint
    /// present in `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::ForkBelowCheckpoint`] if `height` is lower
    /// than the last checkpointed block in the index.
    pub fn check_fork_height<I>(&self, height: u64, index: &I) -> Result<(), CheckpointError>
    where
        I: BlockIndex + ?Sized,
    {
        match self.find_last_checkpointed_block(index) {
            Some(checkpoint) if height < checkpoint.height => {
                warn!(
                    height,
                    checkpoint_height = checkpoint.height,
                    "forked chain older than last checkpoint"
                );
                Err(CheckpointError::ForkBelowCheckpoint {
                    height,
                    checkpoint_height: checkpoint.height,
                })
            }
            _ => Ok(()),
        }
    }

    /// Whether a chain whose tip is at `tip_height` is still catching up to
    /// the checkpointed history.
    pub fn is_initial_block_download(&self, tip_height: u64) -> bool {
        tip_height < self.highest_checkpoint_height()
    }

    /// Estimated verification progress at `position`, in `[0, 1]`.
    ///
    /// See [`progress::estimate_progress`].
    pub fn estimate_progress(&self, position: Option<&ChainPosition>, now: u64) -> f64 {
        let fraction = progress::estimate_progress(&self.dataset, position, now);
        debug!(
            height = ?position.map(|p| p.height),
            fraction, "estimated verification progress"
        );
        fraction
    }
}
