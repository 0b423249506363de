//! Verification progress estimation.
//!
//! Work is counted per transaction: 1.0 for each transaction up to the last
//! checkpoint (cheap, no signature checks needed) and
//! [`SIGCHECK_VERIFICATION_FACTOR`] for each one after it. Transactions that
//! have not been seen yet are projected linearly from the dataset's
//! transactions-per-day estimate.
//!
//! A `now` earlier than the reference timestamp (clock skew) projects zero
//! future transactions rather than a negative count, so the result never
//! leaves `[0, 1]`.

use cali_core::constants::{SECONDS_PER_DAY, SIGCHECK_VERIFICATION_FACTOR};
use cali_core::types::ChainPosition;

use crate::checkpoint::CheckpointDataset;

/// Estimated fraction of verification work done at `position`.
///
/// Returns `0.0` when there is no chain yet or when there is no work at all.
pub fn estimate_progress(
    dataset: &CheckpointDataset,
    position: Option<&ChainPosition>,
    now: u64,
) -> f64 {
    estimate_progress_with(dataset, position, now, SIGCHECK_VERIFICATION_FACTOR)
}

/// Like [`estimate_progress`] but with an explicit verification cost factor.
pub fn estimate_progress_with(
    dataset: &CheckpointDataset,
    position: Option<&ChainPosition>,
    now: u64,
    factor: f64,
) -> f64 {
    let Some(position) = position else {
        return 0.0;
    };

    let checkpoint_tx = dataset.last_checkpoint_tx_count();
    let (work_before, work_after) = if position.chain_tx <= checkpoint_tx {
        let cheap_before = position.chain_tx as f64;
        let cheap_after = (checkpoint_tx - position.chain_tx) as f64;
        let expensive_after =
            projected_tx(dataset.last_checkpoint_time(), now, dataset.tx_per_day());
        (cheap_before, cheap_after + expensive_after * factor)
    } else {
        let cheap_before = checkpoint_tx as f64;
        let expensive_before = (position.chain_tx - checkpoint_tx) as f64;
        let expensive_after = projected_tx(position.timestamp, now, dataset.tx_per_day());
        (
            cheap_before + expensive_before * factor,
            expensive_after * factor,
        )
    };

    let total = work_before + work_after;
    if total <= 0.0 {
        return 0.0;
    }
    work_before / total
}

/// Transactions expected between `since` and `now` at `tx_per_day`.
fn projected_tx(since: u64, now: u64, tx_per_day: f64) -> f64 {
    let elapsed = now.saturating_sub(since) as f64;
    elapsed / SECONDS_PER_DAY as f64 * tx_per_day
}
