//! # cali-consensus — Checkpoint enforcement and sync progress.
//!
//! - [`checkpoint::CheckpointDataset`] — a compiled-in, per-network checkpoint table
//! - [`checkpoint::CheckpointRegistry`] — the active table plus the enforcement policy
//! - [`progress`] — cost-weighted estimate of how far initial sync has got

pub mod checkpoint;
pub mod progress;

pub use checkpoint::{CheckpointDataset, CheckpointRegistry};
pub use progress::estimate_progress;
