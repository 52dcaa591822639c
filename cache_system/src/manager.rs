//! In-process TTL cache with per-key single flight
//!
//! Each key owns an async slot lock. A fill holds that lock across lookup,
//! the caller's fetch and the write-back, so concurrent requests for one key
//! run the fetch at most once while unrelated keys proceed in parallel.

use crate::clock::{Clock, SystemClock};
use crate::entry::CacheEntry;
use crate::errors::CacheError;
use chrono::{DateTime, TimeDelta, Utc};
use config::CacheConfig;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

type Slot<V> = Arc<Mutex<Option<CacheEntry<V>>>>;

/// Point-in-time counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub failures: u64,
    pub entries: usize,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    failures: AtomicU64,
}

/// Key → entry map with passive expiry
pub struct TtlCache<V> {
    slots: RwLock<HashMap<String, Slot<V>>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
    populated: AtomicUsize,
    counters: Counters,
}

impl<V> Debug for TtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot_count = match self.slots.try_read() {
            Ok(slots) => slots.len().to_string(),
            Err(_) => "locked".to_string(),
        };

        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("clock", &self.clock)
            .field("slots", &slot_count)
            .field("entries", &self.populated.load(Ordering::Relaxed))
            .finish()
    }
}

impl<V: Clone + Send> TtlCache<V> {
    /// Create a cache whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Result<Self, CacheError> {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a cache with the TTL from configuration
    pub fn from_config(config: &CacheConfig) -> Result<Self, CacheError> {
        Self::new(config.ttl_duration())
    }

    /// Create a cache driven by a custom clock
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self, CacheError> {
        let secs = ttl.as_secs();
        if ttl.is_zero() {
            return Err(CacheError::InvalidTtl(secs));
        }
        let ttl = TimeDelta::from_std(ttl).map_err(|_| CacheError::InvalidTtl(secs))?;

        Ok(Self {
            slots: RwLock::new(HashMap::new()),
            ttl,
            clock,
            populated: AtomicUsize::new(0),
            counters: Counters::default(),
        })
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Get or create the slot for `key`
    async fn slot(&self, key: &str) -> Slot<V> {
        if let Some(slot) = self.slots.read().await.get(key) {
            return Arc::clone(slot);
        }

        let mut slots = self.slots.write().await;
        Arc::clone(slots.entry(key.to_string()).or_default())
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Return the fresh value for `key`, or run `fetch` and store its result.
    ///
    /// The slot lock is held while `fetch` runs. A failed fetch leaves the
    /// slot exactly as it was and its error is returned unchanged.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = self.slot(key).await;
        let mut guard = slot.lock().await;

        if let Some(entry) = guard.as_ref() {
            if entry.is_fresh(self.clock.now()) {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(key, "cache hit");
                return Ok(entry.value.clone());
            }
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(key, stale = guard.is_some(), "cache miss");

        let value = match fetch().await {
            Ok(value) => value,
            Err(e) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };

        let expires_at = self.expiry_from(self.clock.now());
        if guard.replace(CacheEntry::new(value.clone(), expires_at)).is_none() {
            self.populated.fetch_add(1, Ordering::Relaxed);
        }

        Ok(value)
    }

    /// Fresh value for `key` without filling on miss
    pub async fn get(&self, key: &str) -> Option<V> {
        let slot = self.slots.read().await.get(key).cloned()?;
        let guard = slot.lock().await;
        guard
            .as_ref()
            .filter(|entry| entry.is_fresh(self.clock.now()))
            .map(|entry| entry.value.clone())
    }

    /// Stored entry for `key`, fresh or stale
    pub async fn entry(&self, key: &str) -> Option<CacheEntry<V>> {
        let slot = self.slots.read().await.get(key).cloned()?;
        let guard = slot.lock().await;
        guard.clone()
    }

    /// Store `value` under `key` with a new expiry, replacing any entry
    pub async fn insert(&self, key: &str, value: V) {
        let slot = self.slot(key).await;
        let mut guard = slot.lock().await;
        let expires_at = self.expiry_from(self.clock.now());
        if guard.replace(CacheEntry::new(value, expires_at)).is_none() {
            self.populated.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Drop stale and empty slots. Slots another task has checked out are kept.
    ///
    /// Never called automatically; returns the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut slots = self.slots.write().await;
        let mut removed = 0;

        slots.retain(|_, slot| {
            // handles are only cloned under the map lock, which is held here
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            let Ok(guard) = slot.try_lock() else {
                return true;
            };
            match guard.as_ref() {
                Some(entry) if entry.is_fresh(now) => true,
                Some(_) => {
                    removed += 1;
                    false
                }
                None => false,
            }
        });

        self.populated.fetch_sub(removed, Ordering::Relaxed);
        tracing::debug!(removed, remaining = slots.len(), "purged expired cache entries");
        removed
    }

    /// Number of stored entries, fresh or stale
    pub fn len(&self) -> usize {
        self.populated.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
