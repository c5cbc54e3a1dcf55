//! File Sink
//!
//! Default sink: the whole store as one JSON document on local disk.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::debug;

use super::{DumpReason, Dumper, Loader, Snapshot};
use crate::error::SinkError;

/// Default snapshot location, relative to the working directory.
pub const DEFAULT_CACHE_FILE: &str = "./caches";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

// == File Sink ==
/// Loads and dumps the store as a JSON object keyed by partition name.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Creates a sink backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling of the target file, unique per process and per dump.
    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(self.path.file_name().unwrap_or_else(|| OsStr::new("caches")));
        name.push(format!(
            ".{}.{}.tmp",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        self.path.with_file_name(name)
    }
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_FILE)
    }
}

#[async_trait]
impl Loader for FileSink {
    async fn load(&self) -> Result<Snapshot, SinkError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
        debug!(
            "Loaded {} partition(s) from {}",
            snapshot.len(),
            self.path.display()
        );
        Ok(snapshot)
    }
}

#[async_trait]
impl Dumper for FileSink {
    /// Writes a temporary sibling and renames it over the target, so readers
    /// see either the previous document or the new one.
    async fn dump(&self, reason: Option<DumpReason>, snapshot: &Snapshot) -> Result<(), SinkError> {
        let encoded = serde_json::to_vec(snapshot)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, encoded).await?;
        if let Err(err) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(err.into());
        }
        debug!(
            "Dumped {} partition(s) to {} (reason: {})",
            snapshot.len(),
            self.path.display(),
            reason.map(|r| r.tag()).unwrap_or("none")
        );
        Ok(())
    }
}
