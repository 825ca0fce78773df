//! # counter-thing
//!
//! Serves the counter thing over HTTP. Settings come from an optional JSON
//! config file; command-line flags override it.

use anyhow::Context;
use clap::Parser;
use counter_thing::{ServerConfig, ThingServer};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "counter-thing")]
#[command(about = "A Web of Things counter with JSON/CBOR content negotiation")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    hostname: Option<String>,
    #[arg(short, long)]
    port: Option<u16>,
    /// Thing name, the first path segment of every resource
    #[arg(short, long)]
    name: Option<String>,
    /// Subscription polling interval in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,
    /// Write the expanded Thing Description here on startup
    #[arg(long)]
    description_out: Option<PathBuf>,
}

impl Cli {
    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(hostname) = self.hostname {
            config.hostname = hostname;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(name) = self.name {
            config.thing_name = name;
        }
        if let Some(ms) = self.poll_interval_ms {
            config.poll_interval_ms = ms;
        }
        if let Some(path) = self.description_out {
            config.description_path = Some(path);
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ServerConfig::load(path)
            .await
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => ServerConfig::default(),
    };
    let config = cli.apply(config);

    let server = ThingServer::new(config).context("Failed to build the thing")?;
    server.serve().await.context("Server error")?;
    Ok(())
}
