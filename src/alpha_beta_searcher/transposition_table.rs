//! Symmetry-aware transposition table with bounded, cost-ranked eviction.

use std::hash::{BuildHasherDefault, Hash};
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use log::debug;
use rustc_hash::FxHasher;

use super::bounds::Score;

/// What an earlier search proved about a position: its value lies in
/// `[lower_limit, upper_limit]`, and it took `nodes_searched` nodes to find
/// out. Equal limits mean the value is exact.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CacheEntry {
    pub lower_limit: Score,
    pub upper_limit: Score,
    pub nodes_searched: u64,
}

impl CacheEntry {
    pub fn new(lower_limit: Score, upper_limit: Score, nodes_searched: u64) -> Self {
        Self {
            lower_limit,
            upper_limit,
            nodes_searched,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.lower_limit == self.upper_limit
    }
}

pub const DEFAULT_CACHE_SIZE_MB: usize = 64;

/// Fraction of capacity kept by one shrink pass.
pub const SHRINK_RATE: f64 = 0.8;

const BYTES_PER_MEGABYTE: usize = 1024 * 1024;

type FxBuildHasher = BuildHasherDefault<FxHasher>;

pub struct TranspositionTable<K: Eq + Hash> {
    table: DashMap<K, CacheEntry, FxBuildHasher>,
    capacity: usize,
    hits: AtomicUsize,
    misses: AtomicUsize,
    stores: AtomicUsize,
    shrinks: AtomicUsize,
}

impl<K: Eq + Hash + Clone> Default for TranspositionTable<K> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE_MB)
    }
}

impl<K: Eq + Hash + Clone> TranspositionTable<K> {
    /// A table holding as many entries as fit in `size_mb` megabytes, and
    /// never fewer than one.
    pub fn new(size_mb: usize) -> Self {
        Self::with_capacity(size_mb * BYTES_PER_MEGABYTE / Self::bytes_per_entry())
    }

    /// A table holding at most `capacity` entries, at least one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_limit(capacity.max(1))
    }

    /// A table that never evicts.
    pub fn unbounded() -> Self {
        Self::with_limit(usize::MAX)
    }

    fn with_limit(capacity: usize) -> Self {
        Self {
            table: DashMap::with_hasher(FxBuildHasher::default()),
            capacity,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            stores: AtomicUsize::new(0),
            shrinks: AtomicUsize::new(0),
        }
    }

    /// Estimated size of one key-value pair.
    pub fn bytes_per_entry() -> usize {
        std::mem::size_of::<(K, CacheEntry)>().max(1)
    }

    /// Looks up each of `keys` in order (the position itself first, then its
    /// symmetric images) and returns the first hit. A miss yields a zeroed
    /// entry and `false`.
    pub fn probe(&self, keys: &[K]) -> (CacheEntry, bool) {
        for key in keys.iter() {
            if let Some(entry) = self.table.get(key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return (*entry, true);
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        (CacheEntry::default(), false)
    }

    /// Stores the envelope found for the exact position `key`, shrinking the
    /// table first if it is full.
    pub fn insert(&self, key: K, lower_limit: Score, upper_limit: Score, nodes_searched: u64) {
        debug_assert!(
            lower_limit <= upper_limit,
            "cache bounds out of order: {} > {}",
            lower_limit,
            upper_limit
        );

        if self.table.len() >= self.capacity && !self.table.contains_key(&key) {
            self.shrink();
        }

        self.table.insert(
            key,
            CacheEntry::new(lower_limit, upper_limit, nodes_searched),
        );
        self.stores.fetch_add(1, Ordering::Relaxed);
    }

    /// Keeps the `SHRINK_RATE` share of capacity whose entries were the most
    /// expensive to compute and drops the rest.
    pub fn shrink(&self) {
        let keep = (self.capacity as f64 * SHRINK_RATE) as usize;

        let mut entries: Vec<(K, CacheEntry)> = self
            .table
            .iter()
            .map(|item| (item.key().clone(), *item.value()))
            .collect();
        entries.sort_by(|(_, a), (_, b)| b.nodes_searched.cmp(&a.nodes_searched));
        let evicted = entries.len().saturating_sub(keep);
        entries.truncate(keep);

        self.table.clear();
        for (key, entry) in entries {
            self.table.insert(key, entry);
        }

        self.shrinks.fetch_add(1, Ordering::Relaxed);
        debug!(
            "transposition table shrunk: evicted {}, kept {}",
            evicted,
            self.table.len()
        );
    }

    pub fn clear(&self) {
        self.table.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.stores.store(0, Ordering::Relaxed);
        self.shrinks.store(0, Ordering::Relaxed);
    }

    pub fn get(&self, key: &K) -> Option<CacheEntry> {
        self.table.get(key).map(|entry| *entry)
    }

    pub fn size(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn stores(&self) -> usize {
        self.stores.load(Ordering::Relaxed)
    }

    pub fn shrinks(&self) -> usize {
        self.shrinks.load(Ordering::Relaxed)
    }
}
