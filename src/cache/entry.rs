//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Absolute expiration instant, None = no expiration
    pub expires_at: Option<Instant>,
    /// Position of this entry's key in the recency list
    pub(crate) slot: usize,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry linked to recency `slot`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Time to live, `Duration::ZERO` for no expiration
    /// * `slot` - Recency list slot holding the entry's key
    pub fn new(value: String, ttl: Duration, slot: usize) -> Self {
        Self {
            value,
            expires_at: expiry_after(ttl),
            slot,
        }
    }

    // == Refresh ==
    /// Overwrites the value and restarts the TTL in place.
    pub fn refresh(&mut self, value: String, ttl: Duration) {
        self.value = value;
        self.expires_at = expiry_after(ttl);
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiration instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Checks expiration against a caller-supplied clock reading.
    ///
    /// Used by sweeps so every entry is judged against the same instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Absolute expiration for a TTL starting now.
///
/// A zero TTL, or one too large to represent, never expires.
fn expiry_after(ttl: Duration) -> Option<Instant> {
    if ttl.is_zero() {
        None
    } else {
        Instant::now().checked_add(ttl)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new("test_value".to_string(), Duration::ZERO, 0);

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new("test_value".to_string(), Duration::from_secs(60), 3);

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.slot, 3);
        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value".to_string(), Duration::from_millis(1), 0);

        sleep(Duration::from_millis(5));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_refresh_resets_value_and_ttl() {
        let mut entry = CacheEntry::new("old".to_string(), Duration::from_millis(1), 0);
        sleep(Duration::from_millis(5));
        assert!(entry.is_expired());

        entry.refresh("new".to_string(), Duration::from_secs(60));

        assert_eq!(entry.value, "new");
        assert!(!entry.is_expired());

        entry.refresh("forever".to_string(), Duration::ZERO);
        assert!(entry.expires_at.is_none());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry {
            value: "test".to_string(),
            expires_at: Some(now),
            slot: 0,
        };

        // Entry should be expired when current time >= expires_at
        assert!(entry.is_expired_at(now), "Entry should be expired at boundary");
        assert!(!entry.is_expired_at(now - Duration::from_millis(1)));
    }

    #[test]
    fn test_huge_ttl_never_expires() {
        let entry = CacheEntry::new("v".to_string(), Duration::MAX, 0);
        assert!(entry.expires_at.is_none());
    }
}
