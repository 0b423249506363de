//! # cali-node — Node-side wiring of the checkpoint subsystem.
//!
//! - [`config::NodeConfig`] — node configuration (defaults, TOML file, `CALI_*` env)
//! - [`node::Node`] — block acceptance gated by checkpoints, sync status reporting

pub mod config;
pub mod node;

pub use config::NodeConfig;
pub use node::{Node, NodeError, SyncStatus};
