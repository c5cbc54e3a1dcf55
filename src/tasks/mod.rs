//! Background Tasks Module
//!
//! Contains the background work a cache engine starts at construction.
//!
//! # Tasks
//! - Load: Runs the initial bulk load and installs its result
//! - Queue drain: Polls until the load resolved, then replays queued writes
//! - Expiry: One-shot timer per set with a TTL
//! - Signals: Dumps and exits on SIGINT/SIGTERM/SIGQUIT
//! - Debug watcher: Periodically logs the whole store

mod debug;
mod expiry;
mod load;
mod queue;
mod signals;

pub use debug::spawn_debug_watcher;
pub use expiry::spawn_expiry_timer;
pub use load::spawn_load_task;
pub use queue::spawn_queue_drain_task;
pub use signals::{spawn_signal_task, wait_for_termination};
