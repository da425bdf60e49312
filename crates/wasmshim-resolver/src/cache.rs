//! Resolved content cache
#![allow(clippy::significant_drop_tightening)] // The guard spans check, resolve and insert

use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to resolve
    pub misses: u64,
    /// Versions currently cached
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Version identifier to content bytes, populated on first success
///
/// Entries are never evicted: archive content is immutable for the life of
/// the process. The lock is held while a miss is resolved, so each version
/// is decompressed at most once no matter how many callers race on it.
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: Mutex<HashMap<String, Bytes>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ContentCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached content for `version`, or run `resolve` and cache
    /// its result
    ///
    /// Failures are returned to the caller and leave the cache untouched.
    pub fn get_or_try_insert_with<E, F>(&self, version: &str, resolve: F) -> Result<Bytes, E>
    where
        F: FnOnce() -> Result<Bytes, E>,
    {
        let mut entries = self.entries.lock();
        if let Some(content) = entries.get(version) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(content.clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let content = resolve()?;
        entries.insert(version.to_string(), content.clone());
        Ok(content)
    }

    /// Cached content for `version`, without resolving
    pub fn get(&self, version: &str) -> Option<Bytes> {
        self.entries.lock().get(version).cloned()
    }

    /// Whether `version` is cached
    pub fn contains(&self, version: &str) -> bool {
        self.entries.lock().contains_key(version)
    }

    /// Number of cached versions
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing is cached yet
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Current counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_miss_then_hit() {
        let cache = ContentCache::new();
        let calls = AtomicUsize::new(0);
        let resolve = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ()>(Bytes::from_static(b"A"))
        };

        assert_eq!(cache.get_or_try_insert_with("v1", resolve).unwrap(), "A");
        assert_eq!(cache.get_or_try_insert_with("v1", resolve).unwrap(), "A");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let cache = ContentCache::new();
        let result: Result<Bytes, &str> = cache.get_or_try_insert_with("v1", || Err("boom"));
        assert_eq!(result.unwrap_err(), "boom");
        assert!(cache.is_empty());
        assert!(!cache.contains("v1"));
        assert_eq!(cache.get("v1"), None);
    }

    #[test]
    fn test_concurrent_callers_resolve_once() {
        let cache = Arc::new(ContentCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                std::thread::spawn(move || {
                    cache
                        .get_or_try_insert_with("v1", || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            Ok::<_, ()>(Bytes::from_static(b"shim"))
                        })
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "shim");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_empty_stats() {
        let stats = ContentCache::new().stats();
        assert_eq!(stats, CacheStats::default());
        assert!(stats.hit_rate().abs() < f64::EPSILON);
    }
}
