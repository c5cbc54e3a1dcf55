//! Engine Options Module
//!
//! Construction parameters for a cache engine.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::sink::{Dumper, FileSink, Loader};

/// Default pending-queue poll interval.
pub const DEFAULT_QUEUE_POLL_INTERVAL: Duration = Duration::from_millis(100);

// == Cache Options ==
/// Everything a [`CacheEngine`](crate::cache::CacheEngine) is built from.
///
/// Loader and dumper default to a [`FileSink`] at `./caches`.
#[derive(Clone)]
pub struct CacheOptions {
    /// Partition name, mandatory
    pub name: String,
    /// Source of the initial bulk load
    pub loader: Arc<dyn Loader>,
    /// Target of every dump
    pub dumper: Arc<dyn Dumper>,
    /// Dump after every applied set
    pub sync_on_set: bool,
    /// Abort a key's earlier expiry timer when the key is set again
    pub cancel_prior_timer_on_overwrite: bool,
    /// Dump and exit on SIGINT/SIGTERM/SIGQUIT
    pub handle_signals: bool,
    /// How often the pending queue checks for load completion
    pub queue_poll_interval: Duration,
    /// Log the whole store at this interval when set
    pub debug_interval: Option<Duration>,
}

impl CacheOptions {
    // == Constructor ==
    /// Options for partition `name` with file-backed sinks and default policies.
    pub fn new(name: impl Into<String>) -> Self {
        let sink = Arc::new(FileSink::default());
        Self {
            name: name.into(),
            loader: sink.clone(),
            dumper: sink,
            sync_on_set: false,
            cancel_prior_timer_on_overwrite: false,
            handle_signals: true,
            queue_poll_interval: DEFAULT_QUEUE_POLL_INTERVAL,
            debug_interval: None,
        }
    }

    /// Options derived from the environment configuration.
    pub fn from_config(config: &Config) -> Self {
        let sink = Arc::new(FileSink::new(&config.cache_file));
        Self {
            name: config.cache_name.clone(),
            loader: sink.clone(),
            dumper: sink,
            sync_on_set: config.sync_on_set,
            cancel_prior_timer_on_overwrite: config.cancel_prior_timer_on_overwrite,
            handle_signals: true,
            queue_poll_interval: Duration::from_millis(config.queue_poll_interval_ms),
            debug_interval: config
                .debug
                .then(|| Duration::from_millis(config.debug_interval_ms)),
        }
    }

    // == Builders ==
    pub fn loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loader = Arc::new(loader);
        self
    }

    pub fn dumper(mut self, dumper: impl Dumper + 'static) -> Self {
        self.dumper = Arc::new(dumper);
        self
    }

    pub fn sync_on_set(mut self, enabled: bool) -> Self {
        self.sync_on_set = enabled;
        self
    }

    pub fn cancel_prior_timer_on_overwrite(mut self, enabled: bool) -> Self {
        self.cancel_prior_timer_on_overwrite = enabled;
        self
    }

    pub fn handle_signals(mut self, enabled: bool) -> Self {
        self.handle_signals = enabled;
        self
    }

    pub fn queue_poll_interval(mut self, interval: Duration) -> Self {
        self.queue_poll_interval = interval;
        self
    }

    pub fn debug_interval(mut self, interval: Option<Duration>) -> Self {
        self.debug_interval = interval;
        self
    }
}

impl fmt::Debug for CacheOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheOptions")
            .field("name", &self.name)
            .field("sync_on_set", &self.sync_on_set)
            .field(
                "cancel_prior_timer_on_overwrite",
                &self.cancel_prior_timer_on_overwrite,
            )
            .field("handle_signals", &self.handle_signals)
            .field("queue_poll_interval", &self.queue_poll_interval)
            .field("debug_interval", &self.debug_interval)
            .finish_non_exhaustive()
    }
}
