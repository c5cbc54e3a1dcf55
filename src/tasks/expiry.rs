//! Expiry Timer Task

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::cache::CacheEngine;

/// Spawns a one-shot timer that removes `key` from `engine` after `ttl`
/// and dumps the store.
///
/// The timer is independent of later writes to the same key; only the
/// returned handle can cancel it.
pub fn spawn_expiry_timer(engine: CacheEngine, key: String, ttl: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(ttl).await;
        engine.expire(&key).await;
    })
}
