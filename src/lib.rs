//! emcache - An in-memory key/value cache with pluggable persistence
//!
//! Named partitions of a shared store with per-key TTL, restored from and
//! dumped to a sink (a JSON file by default).

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod sink;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheEngine, CacheOptions, SharedStore};
pub use config::Config;
pub use sink::{DumpReason, Dumper, FileSink, Loader, Snapshot};
