//! Integration Tests for the Cache Engine Lifecycle
//!
//! Drives engines end to end against file sinks in temporary directories:
//! load, queued writes, expiry, flush and shared stores.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use emcache::cache::Phase;
use emcache::error::SinkError;
use emcache::{CacheEngine, CacheOptions, DumpReason, Dumper, FileSink, SharedStore, Snapshot};
use serde_json::{json, Value};
use tempfile::TempDir;

// == Helper Functions ==

fn file_options(name: &str, dir: &TempDir) -> CacheOptions {
    let sink = FileSink::new(dir.path().join("caches"));
    CacheOptions::new(name)
        .loader(sink.clone())
        .dumper(sink)
        .handle_signals(false)
}

fn read_dump(dir: &TempDir) -> Value {
    let raw = std::fs::read_to_string(dir.path().join("caches")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[derive(Clone, Default)]
struct RecordingDumper {
    dumps: Arc<Mutex<Vec<(Option<DumpReason>, Snapshot)>>>,
}

#[async_trait]
impl Dumper for RecordingDumper {
    async fn dump(&self, reason: Option<DumpReason>, snapshot: &Snapshot) -> Result<(), SinkError> {
        self.dumps.lock().unwrap().push((reason, snapshot.clone()));
        Ok(())
    }
}

// == Scenarios ==

#[tokio::test]
async fn test_queued_set_then_expiring_set() {
    let dir = tempfile::tempdir().unwrap();
    let engine = CacheEngine::new(file_options("p", &dir), SharedStore::new()).unwrap();

    // Queue poller has not run yet, so this is deferred
    engine.set("a", Some(json!({"v": 1})), None).await;
    assert_eq!(engine.pending_len().await, 1);
    assert_ne!(engine.phase().await, Phase::Steady);

    engine.wait_until_steady().await;
    assert_eq!(engine.get("a").await, Some(json!({"v": 1})));

    engine.set("a", Some(json!({"v": 1})), Some(50)).await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(engine.get("a").await, None);

    // The expiry timer dumped the store after removing the key
    let dumped = read_dump(&dir);
    assert!(dumped["p"].get("a").is_none());
}

#[tokio::test]
async fn test_set_null_removes_key_from_stats() {
    let dir = tempfile::tempdir().unwrap();
    let engine = CacheEngine::new(file_options("p", &dir), SharedStore::new()).unwrap();
    engine.wait_until_steady().await;

    engine.set("b", Some(json!({"v": 2})), None).await;
    engine.set("b", None, None).await;

    assert_eq!(engine.get("b").await, None);
    let stats = engine.stats().await;
    assert_eq!(stats.key_count, 0);
    assert!(!stats.keys.contains(&"b".to_string()));
}

#[tokio::test]
async fn test_get_before_load_sees_empty_partition() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("caches"), r#"{"p":{"k":"persisted"}}"#).unwrap();

    let engine = CacheEngine::new(file_options("p", &dir), SharedStore::new()).unwrap();
    assert_eq!(engine.get("k").await, None);

    engine.wait_until_steady().await;
    assert_eq!(engine.get("k").await, Some(json!("persisted")));
}

#[tokio::test]
async fn test_corrupt_snapshot_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("caches"), "definitely not json").unwrap();

    let engine = CacheEngine::new(file_options("p", &dir), SharedStore::new()).unwrap();
    engine.wait_until_steady().await;

    assert!(engine.is_loaded().await);
    assert_eq!(engine.stats().await.key_count, 0);
}

#[tokio::test]
async fn test_flush_persists_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let engine = CacheEngine::new(file_options("products", &dir), SharedStore::new()).unwrap();
    engine.wait_until_steady().await;

    engine
        .set("AMZ-001", Some(json!({"name": "Amazon"})), None)
        .await
        .set("FK-002", Some(json!({"name": "Flipkart"})), None)
        .await
        .flush()
        .await;

    // The flush does not clear the partition
    assert_eq!(engine.stats().await.key_count, 2);

    let restarted =
        CacheEngine::new(file_options("products", &dir), SharedStore::new()).unwrap();
    restarted.wait_until_steady().await;
    assert_eq!(
        restarted.get("FK-002").await,
        Some(json!({"name": "Flipkart"}))
    );
    assert_eq!(restarted.stats().await.keys, vec!["AMZ-001", "FK-002"]);
}

#[tokio::test]
async fn test_shutdown_dump_keeps_foreign_partitions() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("caches"),
        r#"{"products":{"a":1},"orders":{"o":2}}"#,
    )
    .unwrap();

    let engine = CacheEngine::new(file_options("products", &dir), SharedStore::new()).unwrap();
    engine.wait_until_steady().await;
    engine.set("b", Some(json!(3)), None).await;
    engine.shutdown().await;

    let dumped = read_dump(&dir);
    assert_eq!(dumped["products"]["a"], 1);
    assert_eq!(dumped["products"]["b"], 3);
    assert_eq!(dumped["orders"]["o"], 2);
}

#[tokio::test]
async fn test_engines_share_one_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = SharedStore::new();
    let dumper = RecordingDumper::default();

    let products = CacheEngine::new(
        file_options("products", &dir).dumper(dumper.clone()),
        store.clone(),
    )
    .unwrap();
    let orders = CacheEngine::new(
        file_options("orders", &dir).dumper(dumper.clone()),
        store.clone(),
    )
    .unwrap();
    products.wait_until_steady().await;
    orders.wait_until_steady().await;

    products.set("k", Some(json!("product")), None).await;
    orders.set("k", Some(json!("order")), None).await;

    assert_eq!(products.get("k").await, Some(json!("product")));
    assert_eq!(orders.get("k").await, Some(json!("order")));
    assert_eq!(store.partition_count().await, 2);

    // A flush from one engine carries every partition
    orders.flush().await;
    let dumps = dumper.dumps.lock().unwrap();
    let (reason, snapshot) = &dumps[0];
    assert_eq!(*reason, None);
    assert_eq!(snapshot["products"]["k"], json!("product"));
    assert_eq!(snapshot["orders"]["k"], json!("order"));
}

#[tokio::test]
async fn test_sync_on_set_writes_file_every_set() {
    let dir = tempfile::tempdir().unwrap();
    let engine = CacheEngine::new(
        file_options("p", &dir).sync_on_set(true),
        SharedStore::new(),
    )
    .unwrap();
    engine.wait_until_steady().await;

    engine.set("a", Some(json!(1)), None).await;
    assert_eq!(read_dump(&dir)["p"]["a"], 1);

    engine.set("a", Some(json!(2)), None).await;
    assert_eq!(read_dump(&dir)["p"]["a"], 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_expiry_dumps_end_with_final_store() {
    let dir = tempfile::tempdir().unwrap();
    let engine = CacheEngine::new(file_options("p", &dir), SharedStore::new()).unwrap();
    engine.wait_until_steady().await;

    // Many timers fire together, each removing one key and dumping
    for i in 0..150 {
        engine
            .set(format!("k{i}"), Some(json!({"i": i, "pad": "x".repeat(256)})), Some(25))
            .await;
    }

    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while !engine.stats().await.keys.is_empty() {
        assert!(tokio::time::Instant::now() < deadline, "keys never expired");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    // Let the trailing dumps land
    tokio::time::sleep(Duration::from_millis(500)).await;

    let dumped = read_dump(&dir);
    assert_eq!(dumped["p"], json!({}));
}
