//! Criterion benchmarks for cali-consensus hot paths.
//!
//! Covers: checkpoint gate, last-checkpoint scan, and progress estimation.

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cali_consensus::CheckpointRegistry;
use cali_core::constants::{NetworkType, MAINNET_LAST_CHECKPOINT_TIME};
use cali_core::types::{ChainPosition, Hash256};

fn mainnet() -> CheckpointRegistry {
    CheckpointRegistry::new(NetworkType::Mainnet, true).expect("compiled-in checkpoints parse")
}

fn bench_check_block(c: &mut Criterion) {
    let registry = mainnet();
    let hash = Hash256([0x42; 32]);

    c.bench_function("is_hash_pinned_at", |b| {
        b.iter(|| registry.is_hash_pinned_at(black_box(1389), black_box(&hash)))
    });
}

fn bench_find_last_checkpointed_block(c: &mut Criterion) {
    let registry = mainnet();
    // Only the lowest checkpoint is indexed, so the scan walks the whole table.
    let (height, genesis) = registry
        .active_dataset()
        .iter()
        .next()
        .map(|(h, hash)| (h, *hash))
        .expect("mainnet has checkpoints");
    let mut index = HashMap::new();
    index.insert(
        genesis,
        ChainPosition {
            hash: genesis,
            height,
            timestamp: 0,
            chain_tx: 1,
        },
    );

    c.bench_function("find_last_checkpointed_block", |b| {
        b.iter(|| registry.find_last_checkpointed_block(black_box(&index)))
    });
}

fn bench_estimate_progress(c: &mut Criterion) {
    let registry = mainnet();
    let tip = ChainPosition {
        hash: Hash256([0x01; 32]),
        height: 30_000,
        timestamp: MAINNET_LAST_CHECKPOINT_TIME + 86_400,
        chain_tx: 40_000,
    };
    let now = MAINNET_LAST_CHECKPOINT_TIME + 30 * 86_400;

    c.bench_function("estimate_progress", |b| {
        b.iter(|| registry.estimate_progress(black_box(Some(&tip)), black_box(now)))
    });
}

criterion_group!(
    benches,
    bench_check_block,
    bench_find_last_checkpointed_block,
    bench_estimate_progress
);
criterion_main!(benches);
