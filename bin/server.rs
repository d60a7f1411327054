// Cookbook - Web Server

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use cookbook::{api, load_seed, logging, Registry, ServerConfig};

#[derive(Parser)]
#[command(name = "cookbook-server", version, about = "HTTP API for the recipe registry")]
struct Args {
    /// Bind address (overrides COOKBOOK_ADDR)
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Seed file loaded before serving (overrides COOKBOOK_SEED)
    #[arg(long)]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args = Args::parse();
    let config = ServerConfig::from_env()?.with_overrides(args.addr, args.seed);

    let registry = Arc::new(Registry::new());
    if let Some(seed) = &config.seed_path {
        load_seed(&registry, seed)?;
    }

    let app = api::router(Arc::clone(&registry));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    tracing::info!(
        addr = %config.bind_addr,
        entries = registry.len(),
        version = cookbook::VERSION,
        "cookbook server listening"
    );

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
