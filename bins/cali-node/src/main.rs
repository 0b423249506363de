//! Californiacoin node binary.
//!
//! Loads configuration, builds the checkpoint registry for the selected
//! network, and reports verification progress on a fixed interval until
//! interrupted.

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use cali_core::constants::NetworkType;
use cali_node_lib::{Node, NodeConfig, SyncStatus};
use tracing::info;

/// Californiacoin node: checkpoint enforcement and sync status.
#[derive(Parser, Debug)]
#[command(
    name = "cali-node",
    version,
    about = "Californiacoin node with checkpoint enforcement and sync progress reporting"
)]
struct Args {
    /// Configuration file (TOML). Defaults to <data-dir>/cali.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Run on the test network. Its checkpoints are informational only.
    #[arg(long)]
    testnet: bool,

    /// Disable checkpoint enforcement
    #[arg(long)]
    no_checkpoints: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format ("text" or "json")
    #[arg(long)]
    log_format: Option<String>,

    /// Seconds between status reports
    #[arg(long)]
    status_interval: Option<u64>,
}

impl Args {
    /// Layer CLI flags over the file/environment configuration.
    fn into_config(self) -> anyhow::Result<NodeConfig> {
        let config_file = self.config.clone().unwrap_or_else(|| {
            let mut base = NodeConfig::default();
            if let Some(dir) = &self.data_dir {
                base.data_dir = dir.clone();
            }
            base.config_path()
        });

        let mut config = NodeConfig::load(Some(&config_file))
            .with_context(|| format!("failed to load configuration from {}", config_file.display()))?;

        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if self.testnet {
            config.network_type = NetworkType::Testnet;
        }
        if self.no_checkpoints {
            config.checkpoints = false;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(secs) = self.status_interval {
            config.status_interval_secs = secs;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Args::parse().into_config()?;

    init_logging(&config.log_level, &config.log_format);

    info!("Californiacoin node v{}", env!("CARGO_PKG_VERSION"));
    info!("network: {:?}", config.network_type);
    info!("data_dir: {:?}", config.network_dir());
    info!("checkpoints: {}", config.checkpoints);

    let node = Node::new(config.clone()).context("failed to start node")?;

    let dataset = node.checkpoints().active_dataset();
    if let Some((height, hash)) = dataset.last_checkpoint() {
        info!(
            "last checkpoint: height={} hash={} time={} tx={}",
            height,
            hash,
            format_time(dataset.last_checkpoint_time()),
            dataset.last_checkpoint_tx_count()
        );
    }
    info!(
        "enforcing: {} (highest enforced height {})",
        node.checkpoints().enforcing(),
        node.checkpoints().highest_checkpoint_height()
    );

    let mut ticker = tokio::time::interval(config.status_interval());

    info!("node running (Ctrl+C to stop)");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                report(&node.sync_status(unix_now()));
            }
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for Ctrl+C")?;
                info!("received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    info!("Californiacoin node shutdown complete");
    Ok(())
}

fn report(status: &SyncStatus) {
    info!(
        tip_height = ?status.tip_height,
        progress_pct = status.progress * 100.0,
        last_checkpoint = ?status.last_checkpoint.map(|c| c.height),
        initial_download = status.initial_download,
        "sync status"
    );
}

fn unix_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}

fn format_time(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
        .map_or_else(|| secs.to_string(), |t| t.to_rfc3339())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Pass `format = "json"` for structured JSON output. Any other value
/// defaults to human-readable text.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "cali-node",
            "--config",
            "/nonexistent/cali.toml",
            "--testnet",
            "--no-checkpoints",
            "--status-interval",
            "7",
        ]);
        let config = args.into_config().unwrap();
        assert_eq!(config.network_type, NetworkType::Testnet);
        assert!(!config.checkpoints);
        assert_eq!(config.status_interval_secs, 7);
    }

    #[test]
    fn format_time_renders_rfc3339() {
        assert_eq!(format_time(1_402_128_269), "2014-06-07T08:04:29+00:00");
    }
}
