//! Expiry Record Module
//!
//! Per-key TTL bookkeeping kept by each cache engine.

use std::time::{SystemTime, UNIX_EPOCH};

// == Expiry Record ==
/// TTL metadata recorded for a key on every applied set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryRecord {
    /// TTL in milliseconds, 0 = no expiry
    pub ttl_ms: u64,
    /// Timestamp of the set call (Unix milliseconds)
    pub created_at: u64,
}

impl ExpiryRecord {
    // == Constructor ==
    /// Creates a record for a set happening now.
    ///
    /// Absent TTLs are stored as 0.
    pub fn new(ttl_ms: Option<u64>) -> Self {
        Self {
            ttl_ms: ttl_ms.unwrap_or(0),
            created_at: current_timestamp_ms(),
        }
    }

    /// Returns true if the key has a removal timer.
    pub fn has_ttl(&self) -> bool {
        self.ttl_ms > 0
    }

    // == Deadlines ==
    /// Deadline as reported in stats: measured from the engine's construction
    /// time, not from the set call.
    pub fn stats_expires_at(&self, init_timestamp: u64) -> u64 {
        init_timestamp.saturating_add(self.ttl_ms)
    }

    /// Deadline the removal timer actually fires at.
    pub fn actual_removal_deadline(&self) -> u64 {
        self.created_at.saturating_add(self.ttl_ms)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
