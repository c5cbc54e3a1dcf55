//! Initial Load Task

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::CacheEngine;
use crate::sink::Loader;

/// Spawns the one-time bulk load for `engine`.
///
/// Whatever the loader returns is handed to the engine, which treats errors
/// as an empty snapshot.
pub fn spawn_load_task(engine: CacheEngine, loader: Arc<dyn Loader>) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!("Loading cache '{}'", engine.name());
        let result = loader.load().await;
        engine.complete_load(result).await;
    })
}
