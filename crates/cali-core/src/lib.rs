//! # cali-core
//! Foundation types, compiled-in checkpoint tables and the chain index
//! contract for the Californiacoin checkpoint subsystem.

pub mod block_index;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
