//! Dedup caches: one per direction, one per stream
//!
//! The encoder keeps an [`EncodeCache`] so a repeated descriptor becomes a
//! short reference record; the decoder keeps a [`DecodeCache`] that mirrors
//! it so the reference can be resolved. Both are plain values owned by
//! whoever owns the stream. Sharing one across unrelated streams makes the
//! two ends disagree about what a reference means, so don't.
//!
//! Caches are unbounded unless built with [`DescriptorCache::with_capacity`].
//! A bounded cache evicts least-recently-used entries. The encoder and the
//! decoder perform the same lookups and insertions in the same order, so two
//! bounded caches of equal capacity evict the same entries and stay in step.

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::descriptor::FontDescriptor;
use crate::fingerprint::FingerprintKey;

/// Fingerprint-keyed store of owning descriptor copies
pub struct DescriptorCache {
    entries: LruCache<FingerprintKey, FontDescriptor>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

/// Cache consulted while writing one output stream
pub type EncodeCache = DescriptorCache;

/// Cache consulted while reading one input stream
pub type DecodeCache = DescriptorCache;

impl DescriptorCache {
    /// Create an unbounded cache
    pub fn new() -> Self {
        Self::from_lru(LruCache::unbounded())
    }

    /// Create a cache holding at most `capacity` descriptors
    ///
    /// A capacity of zero means unbounded.
    pub fn with_capacity(capacity: usize) -> Self {
        match NonZeroUsize::new(capacity) {
            Some(capacity) => Self::from_lru(LruCache::new(capacity)),
            None => Self::new(),
        }
    }

    fn from_lru(entries: LruCache<FingerprintKey, FontDescriptor>) -> Self {
        Self {
            entries,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Look up a descriptor and mark it recently used
    ///
    /// Returns an independent copy; the cached entry keeps its own stream.
    pub fn get(&mut self, key: &FingerprintKey) -> Option<FontDescriptor> {
        match self.entries.get(key) {
            Some(descriptor) => {
                self.hits += 1;
                Some(descriptor.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Like [`get`](Self::get), but an entry `accept` rejects counts as a miss
    ///
    /// A rejected entry is still marked recently used.
    pub fn get_matching(
        &mut self,
        key: &FingerprintKey,
        accept: impl FnOnce(&FontDescriptor) -> bool,
    ) -> Option<FontDescriptor> {
        match self.entries.get(key) {
            Some(descriptor) if accept(descriptor) => {
                self.hits += 1;
                Some(descriptor.clone())
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    /// Borrow an entry without touching recency or statistics
    pub fn peek(&self, key: &FingerprintKey) -> Option<&FontDescriptor> {
        self.entries.peek(key)
    }

    pub fn contains(&self, key: &FingerprintKey) -> bool {
        self.entries.contains(key)
    }

    /// Store `descriptor` under `key`, replacing any previous entry
    pub fn insert(&mut self, key: FingerprintKey, descriptor: FontDescriptor) {
        let replacing = self.entries.contains(&key);
        if let Some((evicted, _)) = self.entries.push(key, descriptor) {
            if !replacing {
                self.evictions += 1;
                log::trace!("Evicted descriptor {evicted} from cache");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries, `None` when unbounded
    pub fn capacity(&self) -> Option<usize> {
        let cap = self.entries.cap().get();
        (cap != usize::MAX).then_some(cap)
    }

    /// Forget every entry; statistics are kept
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Snapshot of cache size and effectiveness
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            capacity: self.capacity(),
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
        }
    }
}

impl Default for DescriptorCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: Option<usize>,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
