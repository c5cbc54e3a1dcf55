//! Cache Engine Module
//!
//! One named partition of a [`SharedStore`] with per-key TTL, a pending queue
//! for writes issued before the initial load, and dumps to a sink.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::{
    current_timestamp_ms, CacheOptions, CacheStats, Command, ExpiryRecord, PendingQueue,
    SharedStore,
};
use crate::error::{CacheError, Result, SinkError};
use crate::sink::{DumpReason, Dumper, Snapshot, TerminationSignal};
use crate::tasks;

/// Poll interval used by [`CacheEngine::wait_until_steady`].
const STEADY_POLL_INTERVAL: Duration = Duration::from_millis(5);

// == Phase ==
/// Lifecycle phase of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Initial load in flight; writes are queued
    Loading,
    /// Load resolved; queued writes not replayed yet
    Loaded,
    /// Queue replayed; writes apply immediately
    Steady,
}

#[derive(Debug)]
struct EngineState {
    phase: Phase,
    pending: PendingQueue,
    expiries: HashMap<String, ExpiryRecord>,
    /// Latest expiry timer per key, only tracked when prior timers get cancelled
    timers: HashMap<String, JoinHandle<()>>,
}

struct EngineInner {
    name: String,
    init_timestamp: u64,
    store: SharedStore,
    dumper: Arc<dyn Dumper>,
    sync_on_set: bool,
    cancel_prior_timer_on_overwrite: bool,
    state: Mutex<EngineState>,
    /// Store logger, stopped on shutdown and on the first expiry
    debug_watcher: Option<JoinHandle<()>>,
}

// == Cache Engine ==
/// Handle to a cache engine. Clones refer to the same engine.
#[derive(Clone)]
pub struct CacheEngine {
    inner: Arc<EngineInner>,
}

impl CacheEngine {
    // == Constructor ==
    /// Creates an engine for `options.name` on `store` and starts its
    /// background work: the initial load, the queue poller and, depending on
    /// the options, signal handling and the debug watcher.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// `CacheError::Config` if the partition name is empty.
    pub fn new(options: CacheOptions, store: SharedStore) -> Result<Self> {
        if options.name.is_empty() {
            return Err(CacheError::Config(
                "Invalid invocation. Cache name is mandatory".to_string(),
            ));
        }

        let debug_watcher = options
            .debug_interval
            .map(|interval| tasks::spawn_debug_watcher(store.clone(), interval));

        let engine = Self {
            inner: Arc::new(EngineInner {
                name: options.name,
                init_timestamp: current_timestamp_ms(),
                store,
                dumper: options.dumper,
                sync_on_set: options.sync_on_set,
                cancel_prior_timer_on_overwrite: options.cancel_prior_timer_on_overwrite,
                state: Mutex::new(EngineState {
                    phase: Phase::Loading,
                    pending: PendingQueue::new(),
                    expiries: HashMap::new(),
                    timers: HashMap::new(),
                }),
                debug_watcher,
            }),
        };

        tasks::spawn_load_task(engine.clone(), options.loader);
        tasks::spawn_queue_drain_task(engine.clone(), options.queue_poll_interval);
        if options.handle_signals {
            tasks::spawn_signal_task(engine.clone());
        }

        info!("Cache '{}' created, loading from sink", engine.name());
        Ok(engine)
    }

    // == Accessors ==
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Construction time (Unix milliseconds).
    pub fn init_timestamp(&self) -> u64 {
        self.inner.init_timestamp
    }

    pub async fn phase(&self) -> Phase {
        self.inner.state.lock().await.phase
    }

    /// Returns true once the initial load has resolved.
    pub async fn is_loaded(&self) -> bool {
        self.phase().await != Phase::Loading
    }

    /// Number of writes waiting for the initial load.
    pub async fn pending_len(&self) -> usize {
        self.inner.state.lock().await.pending.len()
    }

    /// Returns true while the debug watcher is logging the store.
    pub fn debug_watcher_running(&self) -> bool {
        self.inner
            .debug_watcher
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Resolves once the load has completed and the pending queue was replayed.
    pub async fn wait_until_steady(&self) {
        while self.phase().await != Phase::Steady {
            tokio::time::sleep(STEADY_POLL_INTERVAL).await;
        }
    }

    // == Set ==
    /// Stores `value` under `key`, or removes `key` when `value` is `None`.
    ///
    /// A positive `ttl_ms` schedules removal that many milliseconds from now.
    /// Before the engine is steady the call is queued and replayed later.
    pub async fn set(
        &self,
        key: impl Into<String>,
        value: Option<Value>,
        ttl_ms: Option<u64>,
    ) -> &Self {
        let key = key.into();
        let mut state = self.inner.state.lock().await;

        if state.phase != Phase::Steady {
            debug!("Cache '{}' not loaded yet, queueing set of '{}'", self.name(), key);
            state.pending.push(Command::Set { key, value, ttl_ms });
            return self;
        }

        self.apply_set(&mut state, key, value, ttl_ms).await;
        self
    }

    // == Get ==
    /// Returns the value stored under `key`. Never queues.
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.inner.store.get(self.name(), key).await
    }

    // == Delete ==
    /// Removes `key`; same as `set(key, None, None)`.
    pub async fn delete(&self, key: impl Into<String>) -> &Self {
        self.set(key, None, None).await
    }

    // == Stats ==
    /// Returns the partition's keys and expiry metadata.
    pub async fn stats(&self) -> CacheStats {
        let state = self.inner.state.lock().await;
        let keys = self.inner.store.keys(self.name()).await;
        CacheStats::new(keys, &state.expiries, self.inner.init_timestamp)
    }

    // == Flush ==
    /// Dumps the whole store to the sink. Nothing is cleared.
    pub async fn flush(&self) -> &Self {
        self.dump(None).await;
        self
    }

    // == Shutdown ==
    /// Dumps the whole store with the normal-exit reason. Does not exit.
    pub async fn shutdown(&self) {
        info!("Cache '{}' shutting down", self.name());
        self.stop_debug_watcher();
        self.dump(Some(DumpReason::ProcessExit)).await;
    }

    // == Internals ==
    async fn apply_set(
        &self,
        state: &mut EngineState,
        key: String,
        value: Option<Value>,
        ttl_ms: Option<u64>,
    ) {
        match value {
            Some(value) => self.inner.store.upsert(self.name(), key.clone(), value).await,
            None => {
                self.inner.store.remove(self.name(), &key).await;
            }
        }

        let record = ExpiryRecord::new(ttl_ms);
        state.expiries.insert(key.clone(), record);

        if self.inner.cancel_prior_timer_on_overwrite {
            if let Some(prior) = state.timers.remove(&key) {
                prior.abort();
            }
        }

        if record.has_ttl() {
            let handle = tasks::spawn_expiry_timer(
                self.clone(),
                key.clone(),
                Duration::from_millis(record.ttl_ms),
            );
            if self.inner.cancel_prior_timer_on_overwrite {
                state.timers.insert(key.clone(), handle);
            }
        }

        debug!("Cache '{}' set '{}' (ttl: {}ms)", self.name(), key, record.ttl_ms);

        if self.inner.sync_on_set {
            self.dump(None).await;
        }
    }

    /// Installs the result of the initial load. Load failures leave the
    /// partition empty.
    pub(crate) async fn complete_load(&self, result: std::result::Result<Snapshot, SinkError>) {
        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(
                    "Cache '{}' failed to load, starting empty: {}",
                    self.name(),
                    err
                );
                Snapshot::new()
            }
        };

        let mut state = self.inner.state.lock().await;
        self.inner.store.restore(self.name(), snapshot).await;
        state.phase = Phase::Loaded;
        info!("Cache '{}' loaded", self.name());
    }

    /// Replays queued writes once the load has resolved.
    ///
    /// Returns true when the engine is steady and polling can stop.
    pub(crate) async fn drain_pending(&self) -> bool {
        let mut state = self.inner.state.lock().await;
        match state.phase {
            Phase::Loading => return false,
            Phase::Steady => return true,
            Phase::Loaded => {}
        }

        let commands = state.pending.take_all();
        let count = commands.len();
        for command in commands {
            match command {
                Command::Set { key, value, ttl_ms } => {
                    self.apply_set(&mut state, key, value, ttl_ms).await;
                }
            }
        }
        state.phase = Phase::Steady;

        if count > 0 {
            info!("Cache '{}' replayed {} queued command(s)", self.name(), count);
        }
        true
    }

    /// Removes an expired key and dumps.
    pub(crate) async fn expire(&self, key: &str) {
        if self.inner.store.remove(self.name(), key).await.is_some() {
            debug!("Cache '{}' expired '{}'", self.name(), key);
        }
        self.stop_debug_watcher();
        self.dump(None).await;
    }

    fn stop_debug_watcher(&self) {
        if let Some(handle) = &self.inner.debug_watcher {
            handle.abort();
        }
    }

    /// Dumps a snapshot of the whole store. A failing dumper ends the process.
    ///
    /// Dumps of every engine on the store run one at a time, so the last
    /// snapshot taken is the last one written.
    pub(crate) async fn dump(&self, reason: Option<DumpReason>) {
        let _turn = self.inner.store.lock_dumps().await;
        self.dump_locked(reason).await;
    }

    /// Dumps with the signal's reason and exits without releasing the dump
    /// lock, so no other dump can start or be cut off mid-write.
    pub(crate) async fn dump_and_exit(&self, signal: TerminationSignal) {
        let _turn = self.inner.store.lock_dumps().await;
        self.dump_locked(Some(DumpReason::Signal(signal))).await;
        std::process::exit(signal.exit_code());
    }

    async fn dump_locked(&self, reason: Option<DumpReason>) {
        let snapshot = self.inner.store.snapshot().await;
        if let Err(err) = self.inner.dumper.dump(reason, &snapshot).await {
            error!("Cache '{}' failed to dump: {}", self.name(), err);
            std::process::exit(1);
        }
    }
}
