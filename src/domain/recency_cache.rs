use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// Bounded LRU set of recently-seen keys. `add` is a conditional insert: it
/// returns `true` iff the key was absent, and evicts the least-recently-added
/// key once `capacity` is exceeded. Used both per-collector (at-most-once
/// emission per source id) and at chain level (cross-collector dedup).
pub struct RecencyCache<K> {
    capacity: usize,
    order: VecDeque<K>,
    seen: HashSet<K>,
}

impl<K: Eq + Hash + Clone> RecencyCache<K> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RecencyCache capacity must be positive");
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }

    /// Returns true if `key` was not already present, inserting it. Evicts
    /// the oldest entry first if capacity would be exceeded.
    pub fn add(&mut self, key: K) -> bool {
        if self.seen.contains(&key) {
            return false;
        }
        if self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.seen.insert(key);
        true
    }

    pub fn contains(&self, key: &K) -> bool {
        self.seen.contains(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_returns_true_only_on_first_insert() {
        let mut cache: RecencyCache<String> = RecencyCache::new(4);
        assert!(cache.add("a".to_string()));
        assert!(!cache.add("a".to_string()));
    }

    #[test]
    fn capacity_plus_k_adds_leave_exactly_capacity_items_and_evict_oldest_first() {
        let mut cache: RecencyCache<i32> = RecencyCache::new(3);
        for i in 0..3 + 2 {
            cache.add(i);
        }
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(&0));
        assert!(!cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
        assert!(cache.contains(&4));
    }

    #[test]
    fn dedup_of_dedup_is_a_drop() {
        let mut cache: RecencyCache<&str> = RecencyCache::new(10);
        let first = cache.add("x");
        let second = cache.add("x");
        assert!(first);
        assert!(!second);
    }
}
