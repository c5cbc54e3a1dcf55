//! Shared Store Module
//!
//! The partitioned key/value table shared by every engine that holds it.

use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::sink::Snapshot;

static PROCESS_STORE: OnceLock<SharedStore> = OnceLock::new();

// == Shared Store ==
/// Mapping from partition name to partition, behind a single-writer lock.
///
/// Clones share the same table. Engines only touch the partition named after
/// them; snapshots always cover every partition, so dumps are serialized
/// store-wide through [`SharedStore::lock_dumps`].
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    partitions: Arc<RwLock<Snapshot>>,
    dumps: Arc<Mutex<()>>,
}

impl SharedStore {
    // == Constructor ==
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide store, creating it on first use.
    pub fn process_wide() -> Self {
        PROCESS_STORE.get_or_init(SharedStore::new).clone()
    }

    // == Reads ==
    /// Returns a copy of the value stored under `key` in `partition`.
    pub async fn get(&self, partition: &str, key: &str) -> Option<Value> {
        let partitions = self.partitions.read().await;
        partitions.get(partition)?.get(key).cloned()
    }

    /// Returns the keys of `partition` in insertion order.
    pub async fn keys(&self, partition: &str) -> Vec<String> {
        let partitions = self.partitions.read().await;
        partitions
            .get(partition)
            .map(|p| p.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns a deep copy of every partition.
    pub async fn snapshot(&self) -> Snapshot {
        self.partitions.read().await.clone()
    }

    /// Returns the names of all partitions.
    pub async fn partition_names(&self) -> Vec<String> {
        self.partitions.read().await.keys().cloned().collect()
    }

    pub async fn partition_count(&self) -> usize {
        self.partitions.read().await.len()
    }

    /// Waits for the store's dump turn. Hold the guard across both the
    /// snapshot and the sink write.
    pub async fn lock_dumps(&self) -> MutexGuard<'_, ()> {
        self.dumps.lock().await
    }

    // == Writes ==
    /// Inserts or overwrites `key` in `partition`, creating the partition if needed.
    pub async fn upsert(&self, partition: &str, key: String, value: Value) {
        let mut partitions = self.partitions.write().await;
        partitions
            .entry(partition.to_string())
            .or_default()
            .insert(key, value);
    }

    /// Removes `key` from `partition`, returning the old value.
    pub async fn remove(&self, partition: &str, key: &str) -> Option<Value> {
        let mut partitions = self.partitions.write().await;
        partitions.get_mut(partition)?.shift_remove(key)
    }

    // == Restore ==
    /// Installs a loaded snapshot for `partition`.
    ///
    /// The named partition is replaced by its loaded contents (empty if the
    /// snapshot has none). Other loaded partitions are only inserted when the
    /// store does not hold them yet.
    pub async fn restore(&self, partition: &str, mut loaded: Snapshot) {
        let own = loaded.remove(partition).unwrap_or_default();
        let mut partitions = self.partitions.write().await;
        partitions.insert(partition.to_string(), own);
        for (name, contents) in loaded {
            partitions.entry(name).or_insert(contents);
        }
    }
}
