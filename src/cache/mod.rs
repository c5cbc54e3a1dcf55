//! Cache Module
//!
//! Provides the partitioned in-memory cache engine with per-key TTL and a
//! pending queue for writes issued before the initial load.

mod engine;
mod entry;
mod options;
mod queue;
mod stats;
mod store;


// Re-export public types
pub use engine::{CacheEngine, Phase};
pub use entry::{current_timestamp_ms, ExpiryRecord};
pub use options::{CacheOptions, DEFAULT_QUEUE_POLL_INTERVAL};
pub use queue::{Command, PendingQueue};
pub use stats::{CacheStats, ExpiryStat};
pub use store::SharedStore;
