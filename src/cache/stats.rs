//! Cache Statistics Module
//!
//! Read-only view of a partition: its keys and their expiry metadata.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::cache::ExpiryRecord;

// == Expiry Stat ==
/// Expiry metadata reported for one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryStat {
    /// TTL in milliseconds
    pub ttl_millis: u64,
    /// Engine construction time + TTL
    pub stats_expires_at: u64,
    /// Set-call time + TTL, when the removal timer fires
    pub actual_removal_deadline: u64,
}

// == Cache Stats ==
/// Point-in-time statistics for one cache engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Number of keys currently in the partition
    pub key_count: usize,
    /// Keys currently in the partition, in insertion order
    pub keys: Vec<String>,
    /// Expiry metadata for every recorded key with a nonzero TTL
    pub expiries: BTreeMap<String, ExpiryStat>,
}

impl CacheStats {
    // == Constructor ==
    /// Builds stats from the partition's keys and the engine's expiry table.
    pub fn new(
        keys: Vec<String>,
        expiries: &HashMap<String, ExpiryRecord>,
        init_timestamp: u64,
    ) -> Self {
        let expiries = expiries
            .iter()
            .filter(|(_, record)| record.has_ttl())
            .map(|(key, record)| {
                (
                    key.clone(),
                    ExpiryStat {
                        ttl_millis: record.ttl_ms,
                        stats_expires_at: record.stats_expires_at(init_timestamp),
                        actual_removal_deadline: record.actual_removal_deadline(),
                    },
                )
            })
            .collect();

        Self {
            key_count: keys.len(),
            keys,
            expiries,
        }
    }
}
