//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Partition name served by the binary
    pub cache_name: String,
    /// Location of the JSON snapshot file
    pub cache_file: PathBuf,
    /// Dump to the sink after every applied set
    pub sync_on_set: bool,
    /// Abort a key's earlier expiry timer when the key is set again
    pub cancel_prior_timer_on_overwrite: bool,
    /// Pending-queue poll interval in milliseconds
    pub queue_poll_interval_ms: u64,
    /// Periodically log the whole store
    pub debug: bool,
    /// Debug watcher interval in milliseconds
    pub debug_interval_ms: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `EMCACHE_NAME` - Partition name (default: products)
    /// - `EMCACHE_FILE` - Snapshot file path (default: ./caches)
    /// - `EMCACHE_SYNC_ON_SET` - Dump after every set (default: false)
    /// - `EMCACHE_CANCEL_PRIOR_TIMER` - Cancel stale expiry timers (default: false)
    /// - `EMCACHE_QUEUE_POLL_MS` - Pending-queue poll interval (default: 100)
    /// - `DEBUG` - Any value enables the debug watcher
    /// - `EMCACHE_DEBUG_INTERVAL_MS` - Debug watcher interval (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_name: env::var("EMCACHE_NAME")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.cache_name),
            cache_file: env::var("EMCACHE_FILE")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_file),
            sync_on_set: env_flag("EMCACHE_SYNC_ON_SET").unwrap_or(defaults.sync_on_set),
            cancel_prior_timer_on_overwrite: env_flag("EMCACHE_CANCEL_PRIOR_TIMER")
                .unwrap_or(defaults.cancel_prior_timer_on_overwrite),
            queue_poll_interval_ms: env::var("EMCACHE_QUEUE_POLL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.queue_poll_interval_ms),
            debug: env::var_os("DEBUG").is_some(),
            debug_interval_ms: env::var("EMCACHE_DEBUG_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.debug_interval_ms),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }
}

/// Parses a boolean environment flag ("1"/"true"/"yes" and "0"/"false"/"no").
fn env_flag(name: &str) -> Option<bool> {
    let value = env::var(name).ok()?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_name: "products".to_string(),
            cache_file: PathBuf::from("./caches"),
            sync_on_set: false,
            cancel_prior_timer_on_overwrite: false,
            queue_poll_interval_ms: 100,
            debug: false,
            debug_interval_ms: 1000,
            server_port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_name, "products");
        assert_eq!(config.cache_file, PathBuf::from("./caches"));
        assert!(!config.sync_on_set);
        assert!(!config.cancel_prior_timer_on_overwrite);
        assert_eq!(config.queue_poll_interval_ms, 100);
        assert_eq!(config.debug_interval_ms, 1000);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("EMCACHE_NAME");
        env::remove_var("EMCACHE_FILE");
        env::remove_var("EMCACHE_SYNC_ON_SET");
        env::remove_var("EMCACHE_CANCEL_PRIOR_TIMER");
        env::remove_var("EMCACHE_QUEUE_POLL_MS");
        env::remove_var("EMCACHE_DEBUG_INTERVAL_MS");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert_eq!(config.cache_name, "products");
        assert_eq!(config.cache_file, PathBuf::from("./caches"));
        assert!(!config.sync_on_set);
        assert_eq!(config.queue_poll_interval_ms, 100);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_env_flag_parsing() {
        env::set_var("EMCACHE_TEST_FLAG_ON", "TRUE");
        env::set_var("EMCACHE_TEST_FLAG_OFF", "0");
        env::set_var("EMCACHE_TEST_FLAG_BAD", "maybe");

        assert_eq!(env_flag("EMCACHE_TEST_FLAG_ON"), Some(true));
        assert_eq!(env_flag("EMCACHE_TEST_FLAG_OFF"), Some(false));
        assert_eq!(env_flag("EMCACHE_TEST_FLAG_BAD"), None);
        assert_eq!(env_flag("EMCACHE_TEST_FLAG_MISSING"), None);
    }
}
