//! live-nodes
//!
//! Starts a node registry against a running cluster and reports the live list
//! and the round-robin rotation until interrupted.
//!
//! ```text
//!   seeds / uri ──▶ NodeRegistry ──▶ next_node() ──▶ caller
//!                        ▲
//!                        │ every refresh interval
//!                        ▼
//!                 GET {scheme}://{node}:{port}/localnodes
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use live_nodes::config::loader::load_config;
use live_nodes::config::RegistryConfig;
use live_nodes::lifecycle::signals::wait_for_signal;
use live_nodes::observability::{logging, metrics};
use live_nodes::NodeRegistry;

#[derive(Parser)]
#[command(name = "live-nodes")]
#[command(about = "Track the live nodes of a cluster and rotate through them", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, conflicts_with = "uri")]
    config: Option<PathBuf>,

    /// Single seed node, e.g. http://10.0.0.1:8000.
    #[arg(short, long)]
    uri: Option<String>,

    /// Seconds between rotation reports.
    #[arg(short, long, default_value_t = 5)]
    report_secs: u64,

    /// Request path used when printing the next node URL.
    #[arg(short, long, default_value = "/")]
    path: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match (&cli.config, &cli.uri) {
        (Some(path), _) => load_config(path)?,
        (None, Some(uri)) => RegistryConfig::from_uri(uri)?,
        (None, None) => return Err("either --config or --uri is required".into()),
    };

    logging::init(&config.observability)?;
    tracing::info!("live-nodes v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let registry = NodeRegistry::start(config)?;

    let mut ticker = tokio::time::interval(Duration::from_secs(cli.report_secs.max(1)));
    let signal = wait_for_signal();
    tokio::pin!(signal);

    loop {
        tokio::select! {
            _ = &mut signal => break,
            _ = ticker.tick() => {
                tracing::info!(
                    live = ?registry.live_nodes(),
                    next = %registry.next_node_url(&cli.path),
                    "Rotation report"
                );
            }
        }
    }

    registry.stop();
    tracing::info!("Shutdown complete");
    Ok(())
}
