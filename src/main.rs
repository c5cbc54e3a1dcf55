//! emcache - An in-memory key/value cache with pluggable persistence
//!
//! Serves one cache partition over HTTP, restored from and dumped to a JSON
//! snapshot file.

use std::net::SocketAddr;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use emcache::api::{create_router, AppState};
use emcache::{CacheEngine, CacheOptions, Config, SharedStore};

/// Main entry point for the emcache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the shared store and the cache engine (starts the load,
///    the queue poller and the termination handlers)
/// 4. Create Axum router with all endpoints
/// 5. Start HTTP server on configured port
///
/// SIGINT/SIGTERM/SIGQUIT are handled by the engine, which dumps the store
/// and exits. If the server stops on its own the store is dumped with the
/// normal-exit reason.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emcache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting emcache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: name={}, file={}, sync_on_set={}, port={}",
        config.cache_name,
        config.cache_file.display(),
        config.sync_on_set,
        config.server_port
    );

    let store = SharedStore::process_wide();
    let cache = CacheEngine::new(CacheOptions::from_config(&config), store)?;

    let app = create_router(AppState::new(cache.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    let served = axum::serve(listener, app).await;
    if let Err(err) = &served {
        error!("Server stopped: {}", err);
    }

    cache.shutdown().await;
    info!("Server shutdown complete");

    served.map_err(Into::into)
}
