//! Error types for the Californiacoin checkpoint subsystem.
use thiserror::Error;

use crate::types::Hash256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashParseError {
    #[error("invalid hash length: expected 64 hex digits, got {0}")] InvalidLength(usize),
    #[error("invalid hex: {0}")] InvalidHex(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckpointError {
    #[error("checkpoint mismatch at height {height}: expected {expected}, got {got}")] Mismatch { height: u64, expected: Hash256, got: Hash256 },
    #[error("fork at height {height} is below last checkpoint at height {checkpoint_height}")] ForkBelowCheckpoint { height: u64, checkpoint_height: u64 },
    #[error("conflicting checkpoints at height {0}")] ConflictingCheckpoint(u64),
    #[error("invalid checkpoint hash at height {height}: {source}")] InvalidHash { height: u64, source: HashParseError },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainIndexError {
    #[error("unknown parent: {0}")] UnknownParent(Hash256),
    #[error("duplicate block: {0}")] DuplicateBlock(Hash256),
    #[error("genesis already set")] GenesisAlreadySet,
    #[error("cumulative transaction count overflow at {0}")] TxCountOverflow(Hash256),
}

#[derive(Error, Debug)]
pub enum CaliError {
    #[error(transparent)] HashParse(#[from] HashParseError),
    #[error(transparent)] Checkpoint(#[from] CheckpointError),
    #[error(transparent)] ChainIndex(#[from] ChainIndexError),
}
