//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking, TTL
//! expiration and the append-only log.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::error::{CacheError, Result};
use crate::persistence::{AofWriter, LogRecord};

// == Sweep Outcome ==
/// Result of a [`CacheStore::remove_expired`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Entries removed because their TTL elapsed
    pub expired: usize,
    /// Entries evicted to get back under capacity
    pub evicted: usize,
}

// == Cache Store ==
/// Main cache storage with LRU eviction, TTL support and optional AOF journaling.
///
/// Every key in `entries` owns exactly one slot in `lru` and vice versa.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Append-only log receiving every non-replay SET
    aof: Option<AofWriter>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an in-memory-only CacheStore holding at most `max_entries`.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: HashMap::with_capacity(max_entries.min(1024)),
            lru: LruTracker::with_capacity(max_entries.min(1024)),
            stats: CacheStats::new(),
            max_entries,
            aof: None,
        }
    }

    /// Creates a CacheStore that journals SETs to `aof`.
    pub fn with_aof(max_entries: usize, aof: AofWriter) -> Self {
        let mut store = Self::new(max_entries);
        store.aof = Some(aof);
        store
    }

    // == Set ==
    /// Stores a key-value pair.
    ///
    /// If the key already exists, the value is overwritten, the TTL restarts and
    /// the entry becomes most recently used. A new key that takes the cache over
    /// capacity evicts the least recently used entry.
    ///
    /// Unless `is_replay` is set, the command is appended to the log before
    /// returning. A failed append is reported as [`CacheError::Persistence`];
    /// the in-memory write stays applied.
    ///
    /// # Arguments
    /// * `key` - The key to store, must be non-empty
    /// * `value` - The value to store
    /// * `ttl` - Time to live, `Duration::ZERO` for no expiration
    /// * `is_replay` - True when re-applying a record read from the log
    pub fn set(
        &mut self,
        key: String,
        value: String,
        ttl: Duration,
        is_replay: bool,
    ) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
        }

        let record = match (&self.aof, is_replay) {
            (Some(_), false) => Some(LogRecord::set(key.as_str(), value.as_str())),
            _ => None,
        };

        match self.entries.get_mut(&key) {
            Some(entry) => {
                entry.refresh(value, ttl);
                self.lru.touch(entry.slot);
            }
            None => {
                let slot = self.lru.push_front(key.clone());
                self.entries.insert(key, CacheEntry::new(value, ttl, slot));

                // Capacity can only be exceeded by the entry just inserted
                if self.entries.len() > self.max_entries {
                    self.evict_oldest();
                }
            }
        }

        self.stats.set_total_entries(self.entries.len());
        self.assert_consistent();

        if let (Some(record), Some(aof)) = (record, self.aof.as_mut()) {
            aof.append(&record).map_err(CacheError::Persistence)?;
        }

        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if found and not expired, marking the entry most
    /// recently used. Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired() {
            self.remove_entry(key);
            self.stats.record_expiration();
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            self.assert_consistent();
            return None;
        }

        let value = entry.value.clone();
        self.lru.touch(entry.slot);
        self.stats.record_hit();
        Some(value)
    }

    // == Remove Expired ==
    /// Removes every expired entry, then evicts down to capacity if needed.
    ///
    /// The recency list is walked from least to most recently used and each
    /// entry is checked against a single clock reading.
    pub fn remove_expired(&mut self) -> SweepOutcome {
        let now = Instant::now();
        let expired_keys: Vec<String> = self
            .lru
            .iter_oldest_first()
            .filter(|(_, key)| {
                self.entries
                    .get(*key)
                    .is_some_and(|entry| entry.is_expired_at(now))
            })
            .map(|(_, key)| key.to_string())
            .collect();

        let mut outcome = SweepOutcome {
            expired: expired_keys.len(),
            evicted: 0,
        };

        for key in expired_keys {
            self.remove_entry(&key);
            self.stats.record_expiration();
        }

        while self.entries.len() > self.max_entries {
            if !self.evict_oldest() {
                break;
            }
            outcome.evicted += 1;
        }

        self.stats.set_total_entries(self.entries.len());
        self.assert_consistent();
        outcome
    }

    // == Apply Replay ==
    /// Re-applies records read from the log, in order, without journaling them.
    ///
    /// Every replayed key gets `ttl`. Returns the number of records applied.
    pub fn apply_replay<I>(&mut self, records: I, ttl: Duration) -> Result<usize>
    where
        I: IntoIterator<Item = LogRecord>,
    {
        let mut applied = 0;
        for record in records {
            match record {
                LogRecord::Set { key, value } => self.set(key, value, ttl, true)?,
            }
            applied += 1;
        }
        Ok(applied)
    }

    // == Close Log ==
    /// Flushes and closes the append-only log, if any.
    ///
    /// Later SETs only update memory.
    pub fn close_log(&mut self) -> Result<()> {
        match self.aof.take() {
            Some(aof) => aof.close().map_err(CacheError::Persistence),
            None => Ok(()),
        }
    }

    /// Returns true while SETs are being journaled.
    #[cfg(test)]
    pub fn has_log(&self) -> bool {
        self.aof.is_some()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries the cache holds.
    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    /// Removes `key` from both the index and the recency list.
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(entry.slot);
        Some(entry)
    }

    /// Evicts the least recently used entry. Returns false if the cache is empty.
    fn evict_oldest(&mut self) -> bool {
        match self.lru.evict_oldest() {
            Some(key) => {
                self.entries.remove(&key);
                self.stats.record_eviction();
                debug!(key = %key, "evicted least recently used entry");
                true
            }
            None => false,
        }
    }

    fn assert_consistent(&self) {
        debug_assert_eq!(
            self.entries.len(),
            self.lru.len(),
            "index and recency list out of sync"
        );
        debug_assert!(
            self.entries.len() <= self.max_entries,
            "cache holds {} entries, capacity {}",
            self.entries.len(),
            self.max_entries
        );
    }
}
