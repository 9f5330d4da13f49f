//! Time-bounded response cache for the fetch layer.
//!
//! The cache is an explicit value owned by whoever drives the fetches (one per
//! process run) and handed to the clients by reference. Time comes from a
//! [`Clock`] so expiry can be tested without sleeping.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

/// Default lifetime of a FRED response.
pub const FRED_TTL: Duration = Duration::from_secs(5 * 60);

/// Default lifetime of an FX response.
pub const FX_TTL: Duration = Duration::from_secs(60 * 60);

/// Source of "now" for expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        *offset += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Key/value cache whose entries expire `ttl` after insertion.
pub struct ResponseCache<V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, (Instant, V)>>,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fresh value for `key`, if any. Expired entries are evicted on lookup.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some((stored_at, value)) if now.duration_since(*stored_at) < self.ttl => {
                debug!(key, "cache hit");
                Some(value.clone())
            }
            Some(_) => {
                debug!(key, "cache entry expired");
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let key = key.into();
        debug!(key = %key, "cache insert");
        entries.insert(key, (now, value));
    }

    /// Return the cached value or compute, store and return a fresh one.
    ///
    /// Errors are not cached.
    pub fn get_or_try_insert<E>(
        &self,
        key: &str,
        fetch: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }
        let value = fetch()?;
        self.insert(key, value.clone());
        Ok(value)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with_clock(ttl_secs: u64) -> (ResponseCache<u32>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = ResponseCache::new(Duration::from_secs(ttl_secs), clock.clone());
        (cache, clock)
    }

    #[test]
    fn entries_expire_after_ttl() {
        let (cache, clock) = cache_with_clock(300);
        cache.insert("fred:CPIAUCSL:60", 7);
        assert_eq!(cache.get("fred:CPIAUCSL:60"), Some(7));

        clock.advance(Duration::from_secs(299));
        assert_eq!(cache.get("fred:CPIAUCSL:60"), Some(7));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get("fred:CPIAUCSL:60"), None);
        assert!(cache.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn get_or_try_insert_fetches_once() {
        let (cache, _clock) = cache_with_clock(60);
        let mut calls = 0;
        for _ in 0..3 {
            let v: Result<u32, String> = cache.get_or_try_insert("k", || {
                calls += 1;
                Ok(42)
            });
            assert_eq!(v, Ok(42));
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn errors_are_not_cached() {
        let (cache, _clock) = cache_with_clock(60);
        let failed: Result<u32, &str> = cache.get_or_try_insert("k", || Err("boom"));
        assert!(failed.is_err());
        assert!(cache.entries.lock().unwrap().is_empty());
        let ok: Result<u32, &str> = cache.get_or_try_insert("k", || Ok(1));
        assert_eq!(ok, Ok(1));
    }
}
