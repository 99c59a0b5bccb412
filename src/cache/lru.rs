//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.

// == Node ==
#[derive(Debug)]
struct Node {
    key: String,
    /// Neighbour towards the front (more recently used)
    prev: Option<usize>,
    /// Neighbour towards the back (less recently used)
    next: Option<usize>,
}

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Keys live in an arena-backed doubly linked list where:
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Each key is addressed by the slot index returned from [`LruTracker::push_front`],
/// which gives O(1) touch, removal and eviction. Freed slots are reused.
#[derive(Debug, Default)]
pub struct LruTracker {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty tracker with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    // == Push Front ==
    /// Inserts a key as the most recently used and returns its slot.
    pub fn push_front(&mut self, key: String) -> usize {
        let node = Node {
            key,
            prev: None,
            next: None,
        };

        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        self.link_front(slot);
        self.len += 1;
        slot
    }

    // == Touch ==
    /// Marks the key in `slot` as recently used (moves it to front).
    pub fn touch(&mut self, slot: usize) {
        if self.head == Some(slot) || self.node(slot).is_none() {
            return;
        }
        self.unlink(slot);
        self.link_front(slot);
    }

    // == Remove ==
    /// Removes the key in `slot` from the tracker and returns it.
    pub fn remove(&mut self, slot: usize) -> Option<String> {
        self.node(slot)?;
        self.unlink(slot);

        let node = self.slots[slot].take()?;
        self.free.push(slot);
        self.len -= 1;
        Some(node.key)
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    #[cfg(test)]
    pub fn peek_oldest(&self) -> Option<&str> {
        self.tail
            .and_then(|slot| self.node(slot))
            .map(|node| node.key.as_str())
    }

    // == Iterate ==
    /// Iterates `(slot, key)` pairs from least to most recently used.
    pub fn iter_oldest_first(&self) -> OldestFirst<'_> {
        OldestFirst {
            tracker: self,
            cursor: self.tail,
        }
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn node(&self, slot: usize) -> Option<&Node> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, slot: usize) -> Option<&mut Node> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Detaches `slot` from its neighbours, patching head/tail.
    fn unlink(&mut self, slot: usize) {
        let Some(node) = self.node_mut(slot) else {
            return;
        };
        let prev = node.prev.take();
        let next = node.next.take();

        match prev {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    /// Links a detached `slot` in as the new head.
    fn link_front(&mut self, slot: usize) {
        let old_head = self.head;
        let Some(node) = self.node_mut(slot) else {
            return;
        };
        node.prev = None;
        node.next = old_head;

        match old_head {
            Some(h) => {
                if let Some(node) = self.node_mut(h) {
                    node.prev = Some(slot);
                }
            }
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }
}

// == Oldest First Iterator ==
/// Iterator returned by [`LruTracker::iter_oldest_first`].
pub struct OldestFirst<'a> {
    tracker: &'a LruTracker,
    cursor: Option<usize>,
}

impl<'a> Iterator for OldestFirst<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let node = self.tracker.node(slot)?;
        self.cursor = node.prev;
        Some((slot, node.key.as_str()))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys_oldest_first(lru: &LruTracker) -> Vec<&str> {
        lru.iter_oldest_first().map(|(_, key)| key).collect()
    }

    #[test]
    fn test_lru_new() {
        let lru = LruTracker::new();
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
        assert_eq!(lru.peek_oldest(), None);
    }

    #[test]
    fn test_lru_push_front() {
        let mut lru = LruTracker::new();

        lru.push_front("key1".to_string());
        lru.push_front("key2".to_string());
        lru.push_front("key3".to_string());

        assert_eq!(lru.len(), 3);
        // key1 is oldest (added first)
        assert_eq!(lru.peek_oldest(), Some("key1"));
        assert_eq!(keys_oldest_first(&lru), vec!["key1", "key2", "key3"]);
    }

    #[test]
    fn test_lru_touch_existing_key() {
        let mut lru = LruTracker::new();

        let key1 = lru.push_front("key1".to_string());
        lru.push_front("key2".to_string());
        lru.push_front("key3".to_string());

        // Touch key1 again - should move to front
        lru.touch(key1);

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.peek_oldest(), Some("key2"));
        assert_eq!(keys_oldest_first(&lru), vec!["key2", "key3", "key1"]);
    }

    #[test]
    fn test_lru_touch_middle_and_head() {
        let mut lru = LruTracker::new();

        lru.push_front("a".to_string());
        let b = lru.push_front("b".to_string());
        let c = lru.push_front("c".to_string());

        lru.touch(b);
        assert_eq!(keys_oldest_first(&lru), vec!["a", "c", "b"]);

        // Touching the head is a no-op
        lru.touch(b);
        assert_eq!(keys_oldest_first(&lru), vec!["a", "c", "b"]);

        lru.touch(c);
        assert_eq!(keys_oldest_first(&lru), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_lru_evict_oldest() {
        let mut lru = LruTracker::new();

        lru.push_front("key1".to_string());
        lru.push_front("key2".to_string());
        lru.push_front("key3".to_string());

        assert_eq!(lru.evict_oldest(), Some("key1".to_string()));
        assert_eq!(lru.len(), 2);

        assert_eq!(lru.evict_oldest(), Some("key2".to_string()));
        assert_eq!(lru.evict_oldest(), Some("key3".to_string()));
        assert!(lru.is_empty());
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_lru_remove() {
        let mut lru = LruTracker::new();

        lru.push_front("key1".to_string());
        let key2 = lru.push_front("key2".to_string());
        lru.push_front("key3".to_string());

        assert_eq!(lru.remove(key2), Some("key2".to_string()));

        assert_eq!(lru.len(), 2);
        assert_eq!(keys_oldest_first(&lru), vec!["key1", "key3"]);

        // Removing a freed slot again does nothing
        assert_eq!(lru.remove(key2), None);
        assert_eq!(lru.len(), 2);
    }

    #[test]
    fn test_lru_remove_head_and_tail() {
        let mut lru = LruTracker::new();

        let a = lru.push_front("a".to_string());
        lru.push_front("b".to_string());
        let c = lru.push_front("c".to_string());

        lru.remove(c);
        assert_eq!(keys_oldest_first(&lru), vec!["a", "b"]);

        lru.remove(a);
        assert_eq!(keys_oldest_first(&lru), vec!["b"]);
        assert_eq!(lru.peek_oldest(), Some("b"));
    }

    #[test]
    fn test_lru_slots_are_reused() {
        let mut lru = LruTracker::with_capacity(2);

        let a = lru.push_front("a".to_string());
        lru.push_front("b".to_string());
        lru.remove(a);

        let c = lru.push_front("c".to_string());
        assert_eq!(c, a, "freed slot should be reused");
        assert_eq!(keys_oldest_first(&lru), vec!["b", "c"]);
    }

    #[test]
    fn test_lru_touch_freed_slot_is_ignored() {
        let mut lru = LruTracker::new();

        let a = lru.push_front("a".to_string());
        lru.push_front("b".to_string());
        lru.remove(a);

        lru.touch(a);
        lru.touch(42);

        assert_eq!(lru.len(), 1);
        assert_eq!(keys_oldest_first(&lru), vec!["b"]);
    }
}
