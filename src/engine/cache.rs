//! Compiled expression cache
//!
//! LRU keyed by expression text. Entries are shared as `Arc` so a hit
//! never holds the lock during evaluation.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;

use crate::error::Result;
use crate::xpath::{compile, CompiledExpr};

/// Hit/miss counters since construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

pub struct ExprCache {
    /// `None` when caching is disabled
    entries: Option<Mutex<LruCache<String, Arc<CompiledExpr>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ExprCache {
    /// A capacity of 0 disables caching; every lookup compiles.
    pub fn new(capacity: usize) -> Self {
        ExprCache {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cached expression for `xpath`, compiling it on a miss.
    ///
    /// Compile errors are returned and not cached.
    pub fn get_or_compile(&self, xpath: &str) -> Result<Arc<CompiledExpr>> {
        let Some(entries) = &self.entries else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return compile(xpath).map(Arc::new);
        };

        if let Some(expr) = lock(entries).get(xpath) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(xpath, "expression cache hit");
            return Ok(Arc::clone(expr));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(xpath, "expression cache miss");
        // compiled outside the lock; a racing miss just compiles twice
        let expr = Arc::new(compile(xpath)?);
        lock(entries).put(xpath.to_string(), Arc::clone(&expr));
        Ok(expr)
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| lock(entries).len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Some(entries) = &self.entries {
            lock(entries).clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// A panic mid-insert cannot leave the LRU inconsistent, so poisoning is
/// ignored.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
