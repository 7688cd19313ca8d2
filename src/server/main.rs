//! HTTP server for point-of-interest CRUD and radius search.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use poi_locator::api::{router, AppState};
use poi_locator::config::Config;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Point of interest server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides the config file
    #[arg(short, long)]
    listen: Option<String>,

    /// Store directory, overrides the config file
    #[arg(long)]
    store_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load_optional(args.config.as_ref())?;
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(path) = args.store_path {
        config.store.path = Some(path);
    }

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(config.logging.env_filter())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("POI Locator Server v{}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(config.store.open().context("Failed to open store")?);
    info!("Store ready with {} points of interest", store.len()?);
    info!("Distance metric: {:?}", config.search.metric);
    if config.cache.enabled {
        info!(
            "Response cache enabled (radius {}s, list {}s); results may lag writes by up to the TTL",
            config.cache.radius_ttl_secs, config.cache.list_ttl_secs
        );
    }

    let state = Arc::new(AppState::new(store, &config));
    let app = router(state);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen))?;
    axum::serve(listener, app).await?;

    Ok(())
}
