//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::persistence::{FsyncPolicy, DEFAULT_AOF_FILE};

/// Default TTL applied to every SET, live or replayed (one hour).
pub const DEFAULT_ENTRY_TTL: u64 = 3600;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Host the TCP listener binds to
    pub server_host: String,
    /// TCP server port
    pub server_port: u16,
    /// Path of the append-only command log
    pub aof_path: PathBuf,
    /// When appended records are synced to disk
    pub aof_fsync: FsyncPolicy,
    /// TTL in seconds for every stored entry, 0 = never expires
    pub entry_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Maximum number of concurrently served connections
    pub max_connections: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries, must be positive (default: 1000)
    /// - `SERVER_HOST` - Listen host (default: 0.0.0.0)
    /// - `SERVER_PORT` - TCP server port (default: 6379)
    /// - `AOF_PATH` - Persistence log path (default: cache.aof)
    /// - `AOF_FSYNC` - `always` or `no` (default: always)
    /// - `ENTRY_TTL` - TTL in seconds for stored keys (default: 3600)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `MAX_CONNECTIONS` - Concurrent connection limit (default: 1024)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries).max(1),
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            aof_path: env::var("AOF_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.aof_path),
            aof_fsync: env_or("AOF_FSYNC", defaults.aof_fsync),
            entry_ttl: env_or("ENTRY_TTL", defaults.entry_ttl),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval).max(1),
            max_connections: env_or("MAX_CONNECTIONS", defaults.max_connections).max(1),
        }
    }

    /// Address string the listener binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Entry TTL as a Duration, `Duration::ZERO` meaning no expiration.
    pub fn entry_ttl(&self) -> Duration {
        Duration::from_secs(self.entry_ttl)
    }

    /// Reaper interval as a Duration.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            server_host: "0.0.0.0".to_string(),
            server_port: 6379,
            aof_path: PathBuf::from(DEFAULT_AOF_FILE),
            aof_fsync: FsyncPolicy::Always,
            entry_ttl: DEFAULT_ENTRY_TTL,
            cleanup_interval: 60,
            max_connections: 1024,
        }
    }
}

/// Parses an environment variable, falling back to `default` when unset or invalid.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
