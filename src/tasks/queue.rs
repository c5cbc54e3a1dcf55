//! Pending Queue Drain Task
//!
//! Polls an engine until its initial load resolved, then replays the writes
//! queued in the meantime and stops.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::CacheEngine;

/// Spawns the poller that drains `engine`'s pending queue exactly once.
///
/// # Arguments
/// * `engine` - Engine whose queue is drained
/// * `poll_interval` - Time between load-completion checks
///
/// # Returns
/// A JoinHandle that finishes once the engine is steady.
pub fn spawn_queue_drain_task(engine: CacheEngine, poll_interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(poll_interval).await;

            if engine.drain_pending().await {
                debug!("Cache '{}' is steady, queue poller stopping", engine.name());
                break;
            }
        }
    })
}
