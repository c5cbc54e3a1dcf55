//! Sink Module
//!
//! The load/dump boundary between the cache and whatever persists it.
//! A [`Loader`] restores the whole store once at engine construction, a
//! [`Dumper`] persists a snapshot of it on signals, timers, syncs and flushes.

mod file;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::SinkError;

pub use file::{FileSink, DEFAULT_CACHE_FILE};

// == Snapshot Types ==
/// Key/value contents of one named partition, in insertion order.
pub type Partition = Map<String, Value>;

/// Full copy of a shared store, keyed by partition name.
pub type Snapshot = BTreeMap<String, Partition>;

// == Termination Signal ==
/// Process signals that trigger a final dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationSignal {
    /// SIGINT / Ctrl+C
    Interrupt,
    /// SIGTERM
    Terminate,
    /// SIGQUIT
    Quit,
}

impl TerminationSignal {
    /// Conventional signal name, used as the dump reason tag.
    pub fn name(self) -> &'static str {
        match self {
            TerminationSignal::Interrupt => "SIGINT",
            TerminationSignal::Terminate => "SIGTERM",
            TerminationSignal::Quit => "SIGQUIT",
        }
    }

    /// Exit status used after the final dump. Only an interrupt exits cleanly.
    pub fn exit_code(self) -> i32 {
        match self {
            TerminationSignal::Interrupt => 0,
            TerminationSignal::Terminate | TerminationSignal::Quit => 1,
        }
    }
}

// == Dump Reason ==
/// Why a dump was triggered. Timer, sync-on-set and flush dumps carry no reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpReason {
    /// Normal process exit
    ProcessExit,
    /// A termination signal was received
    Signal(TerminationSignal),
}

impl DumpReason {
    /// Reason tag as handed to external sinks.
    pub fn tag(&self) -> &'static str {
        match self {
            DumpReason::ProcessExit => "processExit",
            DumpReason::Signal(signal) => signal.name(),
        }
    }
}

impl fmt::Display for DumpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// == Sink Traits ==
/// Restores a previously persisted store.
///
/// Errors are returned, not swallowed: the engine decides that a failed load
/// means an empty partition.
#[async_trait]
pub trait Loader: Send + Sync {
    async fn load(&self) -> Result<Snapshot, SinkError>;
}

/// Persists a snapshot of the whole store.
///
/// An error returned here is treated as fatal by the engine.
#[async_trait]
pub trait Dumper: Send + Sync {
    async fn dump(&self, reason: Option<DumpReason>, snapshot: &Snapshot) -> Result<(), SinkError>;
}
