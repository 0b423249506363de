//! Property and scenario tests for the Californiacoin checkpoint subsystem.
//!
//! The tests under `tests/` exercise checkpoint enforcement and progress
//! estimation across crate boundaries, including against the compiled-in
//! mainnet and testnet tables.

pub mod helpers;
