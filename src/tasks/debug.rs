//! Debug Watcher Task
//!
//! Periodically logs the whole store. Enabled through the `DEBUG` env var;
//! the engine aborts it on shutdown and on its first expiry.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::SharedStore;

/// Spawns a task that logs a pretty-printed snapshot of `store` every `interval`.
pub fn spawn_debug_watcher(store: SharedStore, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Debug watcher logging the store every {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let snapshot = store.snapshot().await;
            match serde_json::to_string_pretty(&snapshot) {
                Ok(json) => info!("Cache store:\n{}", json),
                Err(err) => warn!("Debug watcher could not encode the store: {}", err),
            }
        }
    })
}
