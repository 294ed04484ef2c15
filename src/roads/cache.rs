//! Time-bounded classification cache.
//!
//! T021: Create ClassificationCache with TTL reads
//! T022: Implement capacity bound and hit/miss statistics

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A cached on-road classification.
#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    /// The classification result
    on_road: bool,
    /// When the result was recorded
    recorded_at: Instant,
}

/// In-memory cache of on-road classifications keyed by rounded coordinate.
///
/// Entries are valid for reads while younger than the TTL; expired entries
/// are skipped lazily rather than swept. Growth is bounded by a fixed
/// capacity, evicting the stalest entry when full.
#[derive(Debug)]
pub struct ClassificationCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl ClassificationCache {
    /// Create a cache with the given TTL and entry capacity.
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a classification by rounded coordinate key.
    ///
    /// Returns the stored boolean for a fresh entry. An expired entry is
    /// treated as absent and counts as a miss.
    pub fn get(&mut self, key: &str) -> Option<bool> {
        match self.entries.get(key) {
            Some(entry) if entry.recorded_at.elapsed() < self.ttl => {
                self.hits += 1;
                Some(entry.on_road)
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a classification under the given key.
    ///
    /// Negative results are cached too. When the cache is full and the key
    /// is new, the stalest entry is evicted to make room.
    pub fn insert(&mut self, key: String, on_road: bool) {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            self.evict_stalest();
        }

        self.entries.insert(
            key,
            CacheEntry {
                on_road,
                recorded_at: Instant::now(),
            },
        );
    }

    /// Drop all entries and zero the hit/miss counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Current cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }

    fn evict_stalest(&mut self) {
        let stalest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.recorded_at)
            .map(|(key, _)| key.clone());

        if let Some(key) = stalest {
            self.entries.remove(&key);
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of entries currently held (fresh and expired)
    pub entries: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that fell through to the service
    pub misses: u64,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache, 0.0 when none were made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
